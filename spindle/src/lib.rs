///
/// # spindle — Worker thread runner
///
/// Library side of the `spindle` binary: configuration loading, the error
/// type, and the console demo that wires a `ThreadRegistry` together.
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use spindle::{default_config, run_demo};
/// use spindle_std_core::{AbortReporter, StdoutSink};
///
/// run_demo(&default_config(), Arc::new(AbortReporter), Arc::new(StdoutSink))?;
/// ```
///

pub mod config;
pub mod demo;
pub mod errors;

pub use config::{
    default_config, init_config, parse_config, parse_config_str, Config, MessageSpec,
    RuntimeConfig, ThreadConfig, CONFIG_FILE_NAME,
};
pub use demo::{run_demo, ConsoleWorker, TextMessage};
pub use errors::SpindleError;
