///
/// # Configuration
///
/// `spindle.toml` describes the threads to run and the messages each one
/// receives, in posting order.
///
/// ```toml
/// [runtime]
/// queue_capacity = 10000   # optional, unbounded when absent
/// linger_ms = 0            # pause between posting and shutdown
///
/// [[threads]]
/// name = "WorkerThread1"
/// messages = ["Hello world!"]
///
/// [[threads]]
/// name = "WorkerThread2"
/// messages = [{ text = "Hello world!", tag = 1025 }]
/// ```
///
/// A plain string is posted with `Tag::THREAD_MSG`; a table may carry an
/// explicit numeric tag. Tags are not checked here: posting a reserved tag,
/// or one the worker does not handle, is a contract violation at run time.
///

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use spindle_std_threads::Tag;

use crate::errors::SpindleError;

pub const CONFIG_FILE_NAME: &str = "spindle.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub threads: Vec<ThreadConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub queue_capacity: Option<usize>,
    #[serde(default)]
    pub linger_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ThreadConfig {
    pub name: String,
    #[serde(default)]
    pub messages: Vec<MessageSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MessageSpec {
    Text(String),
    Tagged {
        text: String,
        #[serde(default = "default_tag")]
        tag: u32,
    },
}

fn default_tag() -> u32 {
    Tag::THREAD_MSG.raw()
}

impl MessageSpec {
    pub fn text(&self) -> &str {
        match self {
            MessageSpec::Text(text) | MessageSpec::Tagged { text, .. } => text,
        }
    }

    pub fn tag(&self) -> Tag {
        match self {
            MessageSpec::Text(_) => Tag::THREAD_MSG,
            MessageSpec::Tagged { tag, .. } => Tag::new(*tag),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), SpindleError> {
        if self.threads.is_empty() {
            return Err(SpindleError::InvalidConfig(
                "at least one [[threads]] entry is required".to_string(),
            ));
        }
        if self.runtime.queue_capacity == Some(0) {
            return Err(SpindleError::InvalidConfig(
                "queue_capacity must be greater than zero".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for thread in &self.threads {
            if thread.name.trim().is_empty() {
                return Err(SpindleError::InvalidConfig(
                    "thread names must not be empty".to_string(),
                ));
            }
            if !seen.insert(thread.name.as_str()) {
                return Err(SpindleError::InvalidConfig(format!(
                    "duplicate thread name '{}'",
                    thread.name
                )));
            }
        }
        Ok(())
    }

    pub fn message_count(&self) -> usize {
        self.threads.iter().map(|t| t.messages.len()).sum()
    }
}

pub fn parse_config(path: &Path) -> Result<Config, SpindleError> {
    if !path.exists() {
        return Err(SpindleError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| SpindleError::ConfigParse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

pub fn parse_config_str(content: &str) -> Result<Config, SpindleError> {
    Ok(toml::from_str(content)?)
}

/// Two workers, one greeting each
pub fn default_config() -> Config {
    Config {
        runtime: RuntimeConfig::default(),
        threads: ["WorkerThread1", "WorkerThread2"]
            .into_iter()
            .map(|name| ThreadConfig {
                name: name.to_string(),
                messages: vec![MessageSpec::Text("Hello world!".to_string())],
            })
            .collect(),
    }
}

pub fn default_config_toml() -> String {
    r#"[runtime]
# queue_capacity = 10000
linger_ms = 0

[[threads]]
name = "WorkerThread1"
messages = ["Hello world!"]

[[threads]]
name = "WorkerThread2"
messages = ["Hello world!"]
"#
    .to_string()
}

/// Write a default `spindle.toml` into `dir`, creating it if needed
pub fn init_config(dir: &Path) -> Result<PathBuf, SpindleError> {
    std::fs::create_dir_all(dir)?;

    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() {
        return Err(SpindleError::ConfigExists { path });
    }
    std::fs::write(&path, default_config_toml())?;
    Ok(path)
}
