//! Error types for channel operations

use thiserror::Error;

/// Result type for channel operations
pub type Result<T> = std::result::Result<T, ChannelError>;

/// Errors that can occur during channel operations
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Read attempted before the channel holds a defined value
    #[error("channel is empty")]
    EmptyChannel,

    /// Update batch violates the channel's shape or type contract
    #[error("invalid channel update: {0}")]
    InvalidUpdate(String),

    /// Failure inside a user-supplied resource factory
    #[error("resource factory error: {0}")]
    Resource(#[from] Box<dyn std::error::Error + Send + Sync>),

    /// Snapshot (de)serialization error
    #[error("snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl ChannelError {
    /// Build an `InvalidUpdate` error from any message.
    pub fn invalid_update(message: impl Into<String>) -> Self {
        Self::InvalidUpdate(message.into())
    }

    /// Whether this is the "not ready yet" error an engine may recover from.
    pub fn is_empty_channel(&self) -> bool {
        matches!(self, Self::EmptyChannel)
    }

    /// Whether this is a malformed-update error.
    pub fn is_invalid_update(&self) -> bool {
        matches!(self, Self::InvalidUpdate(_))
    }
}
