//! Error taxonomy shared by every fixture-generation stage.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for fixture-generation operations.
pub type Result<T> = std::result::Result<T, FixtureError>;

/// Errors raised while encoding, hashing, signing or persisting fixtures.
///
/// Every variant is fatal for the record being built. Whether the batch moves
/// on to the next index is decided by the scenario, not here.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// A value does not fit the target byte width or limb budget.
    #[error("encoding overflow: {0}")]
    EncodingOverflow(String),

    /// A private key is outside `[1, n-1]` for the curve order `n`.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// A supplied value is outside the domain of the operation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A Merkle leaf index beyond the tree capacity.
    #[error("leaf index {index} out of range for tree with {capacity} leaves")]
    IndexOutOfRange { index: usize, capacity: usize },

    /// The proof / verifying-key artifact is absent or unparsable.
    #[error("missing artifact {}: {reason}", path.display())]
    MissingArtifact { path: PathBuf, reason: String },

    /// Writing an output artifact failed.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FixtureError {
    pub fn overflow(msg: impl Into<String>) -> Self {
        Self::EncodingOverflow(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn invalid_key(msg: impl Into<String>) -> Self {
        Self::InvalidKey(msg.into())
    }

    pub fn missing_artifact(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::MissingArtifact {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
