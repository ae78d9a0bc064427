//! Error handling types and utilities.

use thiserror::Error;

/// A specialized Result type for shard and index operations.
pub type Result<T, E = ShardError> = std::result::Result<T, E>;

/// Error raised while loading or decoding a single shard.
///
/// Failures are always scoped to one shard: a bad shard must not prevent
/// queries that only touch other shards from succeeding.
#[derive(Debug, Error)]
pub enum ShardError {
    /// The requested key is not part of the published shard set.
    ///
    /// Callers answering a query may treat this as zero matches for that
    /// shard; it is not a defect in the index.
    #[error("no shard '{key}' in the published set")]
    ShardNotFound { key: String },

    /// The shard resource exists but failed structural decode.
    ///
    /// Indicates a defect in the generated index; never silently ignored.
    #[error("shard '{key}' is malformed: {reason}")]
    MalformedShard { key: String, reason: String },

    /// Reading the shard resource failed even though the key is known.
    #[error("failed to read shard '{key}'")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

impl ShardError {
    /// Shorthand for constructing a [`ShardError::MalformedShard`].
    pub fn malformed(key: &str, reason: impl Into<String>) -> Self {
        Self::MalformedShard {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    /// The shard key this error is scoped to.
    pub fn key(&self) -> &str {
        match self {
            Self::ShardNotFound { key }
            | Self::MalformedShard { key, .. }
            | Self::Io { key, .. } => key,
        }
    }
}
