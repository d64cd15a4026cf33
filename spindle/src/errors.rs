///
/// spindle error types.
///
/// Configuration problems are ordinary errors reported to the user.
/// `Thread` wraps a contract violation from the thread runtime, which the
/// binary treats as fatal.
///

use std::path::PathBuf;
use thiserror::Error;

use spindle_std_threads::ThreadError;

#[derive(Debug, Error)]
pub enum SpindleError {
    #[error("Config not found at {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Failed to parse config at {path}: {reason}")]
    ConfigParse { path: PathBuf, reason: String },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Config already exists at {path}")]
    ConfigExists { path: PathBuf },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Thread(#[from] ThreadError),
}

impl SpindleError {
    /// True for errors that signal a programming error rather than bad input
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, SpindleError::Thread(_))
    }
}
