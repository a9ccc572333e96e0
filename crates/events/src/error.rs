use thiserror::Error;

/// Failures while connecting to or reading from a change feed.
#[derive(Debug, Error)]
pub enum ChangeFeedError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Malformed change notification on '{channel}': {reason}")]
    Decode { channel: String, reason: String },

    #[error("No watched collection listens on channel '{0}'")]
    UnknownChannel(String),
}
