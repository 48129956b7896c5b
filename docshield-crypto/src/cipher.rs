//! AES-256-GCM sealing and opening of document content.

use crate::error::{CryptoError, CryptoResult};
use crate::key::{fill_random, ContentKey};
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};

/// Size of a GCM nonce in bytes (96 bits).
pub const NONCE_SIZE: usize = 12;

/// Size of the GCM authentication tag appended to every ciphertext.
pub const TAG_SIZE: usize = 16;

/// Encrypted document content.
///
/// `ciphertext` carries the 16-byte GCM tag at its end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    pub ciphertext: Vec<u8>,
    pub nonce: [u8; NONCE_SIZE],
}

fn cipher_for(key: &ContentKey) -> Aes256Gcm {
    Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()))
}

fn generate_nonce() -> CryptoResult<[u8; NONCE_SIZE]> {
    let mut nonce = [0u8; NONCE_SIZE];
    fill_random(&mut nonce)?;
    Ok(nonce)
}

/// Encrypts `plaintext` under `key` with a freshly generated nonce.
///
/// No variant accepts a caller-supplied nonce.
pub fn seal(plaintext: &[u8], key: &ContentKey) -> CryptoResult<Envelope> {
    let nonce = generate_nonce()?;

    let ciphertext = cipher_for(key)
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|e| CryptoError::Encryption(format!("AES-GCM seal failed: {e}")))?;

    Ok(Envelope { ciphertext, nonce })
}

/// Decrypts and authenticates an envelope.
///
/// Fails with [`CryptoError::AuthenticationFailed`] whenever the tag does not
/// verify; no plaintext is ever returned in that case.
pub fn open(envelope: &Envelope, key: &ContentKey) -> CryptoResult<Vec<u8>> {
    if envelope.ciphertext.len() < TAG_SIZE {
        return Err(CryptoError::AuthenticationFailed);
    }

    cipher_for(key)
        .decrypt(
            Nonce::from_slice(&envelope.nonce),
            envelope.ciphertext.as_slice(),
        )
        .map_err(|_| CryptoError::AuthenticationFailed)
}
