//! Per-document content keys.
//!
//! A [`ContentKey`] lives only for the duration of one protect or access
//! operation. It is wiped from memory on drop and never implements
//! `Serialize`, so the only way bytes leave it is [`ContentKey::export`].

use crate::error::{CryptoError, CryptoResult};
use base64::{engine::general_purpose::STANDARD, Engine};
use rand::rngs::OsRng;
use rand::TryRngCore;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Size of an AES-256 key in bytes.
pub const KEY_SIZE: usize = 32;

/// A 256-bit symmetric key for AES-256-GCM.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ContentKey {
    bytes: [u8; KEY_SIZE],
}

impl ContentKey {
    /// Generates a fresh key from the operating system CSPRNG.
    pub fn generate() -> CryptoResult<Self> {
        let mut bytes = [0u8; KEY_SIZE];
        fill_random(&mut bytes)?;
        Ok(Self { bytes })
    }

    /// Reconstructs a key from raw bytes received from the key service.
    pub fn import(bytes: &[u8]) -> CryptoResult<Self> {
        if bytes.len() != KEY_SIZE {
            return Err(CryptoError::InvalidKeyMaterial {
                expected: KEY_SIZE,
                actual: bytes.len(),
            });
        }

        let mut key = Self {
            bytes: [0u8; KEY_SIZE],
        };
        key.bytes.copy_from_slice(bytes);
        Ok(key)
    }

    /// Decodes base64 key material and imports it.
    pub fn import_base64(encoded: &str) -> CryptoResult<Self> {
        let raw = Zeroizing::new(
            STANDARD
                .decode(encoded.trim())
                .map_err(|e| CryptoError::InvalidKeyEncoding(e.to_string()))?,
        );
        Self::import(&raw)
    }

    /// Copies the raw key material out for transport.
    ///
    /// The returned value is sensitive. Hand it to the key service and let it
    /// drop; it is zeroized when it goes out of scope.
    pub fn export(&self) -> ExportedKey {
        ExportedKey { bytes: self.bytes }
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for ContentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ContentKey([REDACTED])")
    }
}

/// Raw key bytes in transit to the key service.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ExportedKey {
    bytes: [u8; KEY_SIZE],
}

impl ExportedKey {
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }

    /// Base64 form used in JSON request bodies.
    pub fn to_base64(&self) -> Zeroizing<String> {
        Zeroizing::new(STANDARD.encode(&self.bytes))
    }
}

impl std::fmt::Debug for ExportedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ExportedKey([REDACTED])")
    }
}

/// Fills `buf` from the OS random source, mapping failure to
/// [`CryptoError::EntropyUnavailable`].
pub(crate) fn fill_random(buf: &mut [u8]) -> CryptoResult<()> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|e| CryptoError::EntropyUnavailable(e.to_string()))
}
