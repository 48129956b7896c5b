//! Key custody error types.

use docshield_crypto::CryptoError;
use thiserror::Error;

/// Result type for custody operations.
pub type CustodyResult<T> = Result<T, CustodyError>;

/// Errors that can occur while protecting, opening or revoking a document.
///
/// Three families matter to callers:
/// - policy rejections from the key service (expected outcomes),
/// - transport and server faults (the only ones worth retrying),
/// - local crypto failures (deterministic, never retried).
#[derive(Debug, Error)]
pub enum CustodyError {
    #[error("protection rejected: {0}")]
    ProtectionRejected(String),

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("revocation rejected: {0}")]
    RevocationRejected(String),

    #[error("key service error ({status}): {reason}")]
    Service { status: u16, reason: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("unexpected key service response: {0}")]
    UnexpectedResponse(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl CustodyError {
    /// True for decisions made by the key service's policy engine.
    pub fn is_policy_rejection(&self) -> bool {
        matches!(
            self,
            Self::ProtectionRejected(_) | Self::AccessDenied(_) | Self::RevocationRejected(_)
        )
    }

    /// True for connectivity, timeout and server-side faults.
    ///
    /// These are the only errors a caller may choose to retry; the client
    /// itself never does.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Service { .. })
    }

    /// True when the content itself failed verification: the envelope was
    /// malformed or its GCM tag did not match the granted key.
    pub fn is_integrity_failure(&self) -> bool {
        matches!(
            self,
            Self::Crypto(CryptoError::AuthenticationFailed | CryptoError::MalformedEnvelope(_))
        )
    }
}
