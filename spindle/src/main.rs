///
/// spindle CLI - Worker thread runner
///
/// Provides commands for running and checking thread configurations:
/// - spindle run [--config <file>]: Start every worker, post, shut down
/// - spindle check [file]: Validate a configuration without running it
/// - spindle init [dir]: Write a default spindle.toml
///

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use spindle::{
    default_config, init_config, parse_config, run_demo, Config, SpindleError, CONFIG_FILE_NAME,
};
use spindle_std_core::{fatal, AbortReporter, Fault, StdoutSink};

#[derive(Parser)]
#[command(name = "spindle")]
#[command(author, version, about = "Named worker threads with ordered message queues", long_about = None)]
struct Cli {
    /// Maximum log level written to stderr (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the configured worker threads
    Run {
        /// Configuration file (defaults to two hello-world workers)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate a configuration file
    Check {
        /// The file to check
        path: Option<PathBuf>,
    },

    /// Write a default spindle.toml
    Init {
        /// Target directory
        dir: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_max_level(cli.log_level)
        .init();

    match cli.command {
        Commands::Run { config } => {
            run_threads(config.as_deref());
        }
        Commands::Check { path } => {
            check_config(path.as_deref());
        }
        Commands::Init { dir } => {
            init(dir.as_deref());
        }
    }
}

fn load_or_exit(path: &Path) -> Config {
    match parse_config(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_threads(path: Option<&Path>) {
    let config = match path {
        Some(path) => load_or_exit(path),
        None => default_config(),
    };

    match run_demo(&config, Arc::new(AbortReporter), Arc::new(StdoutSink)) {
        Ok(()) => {}
        Err(e @ SpindleError::Thread(_)) => fatal(&Fault::new(e.to_string())),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn check_config(path: Option<&Path>) {
    let path = path.unwrap_or(Path::new(CONFIG_FILE_NAME));
    let config = load_or_exit(path);

    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    println!(
        "No errors in {} ({} threads, {} messages)",
        path.display(),
        config.threads.len(),
        config.message_count()
    );
}

fn init(dir: Option<&Path>) {
    let dir = dir.unwrap_or(Path::new("."));
    match init_config(dir) {
        Ok(path) => println!("Created {}", path.display()),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
