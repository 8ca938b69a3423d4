//! Graph snapshot error types.

use thiserror::Error;

/// Errors that can occur while encoding or decoding a [`MachineGraph`](super::MachineGraph)
#[derive(Debug, Error)]
pub enum GraphError {
    /// Encoding to JSON failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Decoding from JSON failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Snapshot was written by an incompatible version
    #[error("Unsupported graph version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}
