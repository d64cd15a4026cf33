///
/// Thread runtime error types.
///
/// Every variant is a contract violation or a lifecycle failure; none of
/// them is meant to be retried.
///

use thiserror::Error;

use crate::message::Tag;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThreadError {
    #[error("Thread '{name}' has already been created")]
    AlreadyCreated { name: String },

    #[error("Thread '{name}' was never created")]
    NotCreated { name: String },

    #[error("Tag {tag} is reserved and cannot be posted to '{name}'")]
    ReservedTag { name: String, tag: Tag },

    #[error("Thread '{name}' received unexpected tag {tag}")]
    UnexpectedTag { name: String, tag: Tag },

    #[error("Message queue of '{name}' is full ({capacity} messages)")]
    QueueFull { name: String, capacity: usize },

    #[error("Thread '{name}' is exiting and no longer accepts messages")]
    Exited { name: String },

    #[error("Thread '{name}' exited before starting and dropped {dropped} queued message(s)")]
    NotStarted { name: String, dropped: usize },

    #[error("Failed to spawn thread '{name}': {reason}")]
    SpawnFailed { name: String, reason: String },

    #[error("Thread '{name}' panicked: {message}")]
    Panicked { name: String, message: String },
}

impl ThreadError {
    pub fn unexpected_tag(name: &str, tag: Tag) -> Self {
        ThreadError::UnexpectedTag {
            name: name.to_string(),
            tag,
        }
    }

    /// Name of the thread the error is about
    pub fn thread_name(&self) -> &str {
        match self {
            ThreadError::AlreadyCreated { name }
            | ThreadError::NotCreated { name }
            | ThreadError::ReservedTag { name, .. }
            | ThreadError::UnexpectedTag { name, .. }
            | ThreadError::QueueFull { name, .. }
            | ThreadError::Exited { name }
            | ThreadError::NotStarted { name, .. }
            | ThreadError::SpawnFailed { name, .. }
            | ThreadError::Panicked { name, .. } => name,
        }
    }
}
