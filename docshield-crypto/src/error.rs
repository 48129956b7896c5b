//! Error types for content encryption.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors raised by the cipher engine and the envelope codec.
///
/// All of these are local and deterministic: retrying the same call with the
/// same inputs yields the same error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("secure random source unavailable: {0}")]
    EntropyUnavailable(String),

    #[error("invalid key material: expected {expected} bytes, got {actual}")]
    InvalidKeyMaterial { expected: usize, actual: usize },

    #[error("invalid key encoding: {0}")]
    InvalidKeyEncoding(String),

    /// The GCM tag did not verify. Covers tampering, a wrong key and a
    /// wrong nonce alike; the cipher cannot tell them apart.
    #[error("authentication failed (wrong key or tampered data)")]
    AuthenticationFailed,

    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("encryption failed: {0}")]
    Encryption(String),
}
