//! Error types for the record feed.

use thiserror::Error;

/// Main error type for feed operations.
///
/// The in-memory feed has a deliberately small failure surface: appends and
/// fan-out cannot fail, so errors only arise when standing the feed up with
/// an unusable configuration.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for feed operations.
pub type Result<T> = std::result::Result<T, FeedError>;
