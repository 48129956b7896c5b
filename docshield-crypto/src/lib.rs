//! Content encryption layer for DocShield.
//!
//! Provides the local half of envelope encryption:
//! - AES-256-GCM sealing with a fresh 96-bit nonce per call
//! - Per-document content keys that zeroize on drop
//! - A base64 codec so envelopes can travel inside JSON
//!
//! # Architecture
//!
//! Document content never leaves the client in plaintext. Each document gets
//! its own [`ContentKey`]; the key is exported exactly once, handed to the
//! remote key service for custody, and dropped. Opening the document later
//! requires asking the service for the key again.

mod cipher;
pub mod codec;
mod error;
mod key;

pub use cipher::{open, seal, Envelope, NONCE_SIZE, TAG_SIZE};
pub use codec::{decode, encode, encode_bytes, EncodedEnvelope};
pub use error::{CryptoError, CryptoResult};
pub use key::{ContentKey, ExportedKey, KEY_SIZE};
