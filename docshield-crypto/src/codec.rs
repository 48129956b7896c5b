//! Text encoding of envelopes for JSON transport and storage.
//!
//! Both fields use standard padded base64. Decoding validates shape as well
//! as alphabet, so a decoded [`Envelope`] always has a 12-byte nonce and a
//! ciphertext long enough to carry a tag.

use crate::cipher::{Envelope, NONCE_SIZE, TAG_SIZE};
use crate::error::{CryptoError, CryptoResult};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

/// Transport form of an [`Envelope`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedEnvelope {
    pub ciphertext: String,
    pub nonce: String,
}

pub fn encode(envelope: &Envelope) -> EncodedEnvelope {
    EncodedEnvelope {
        ciphertext: encode_bytes(&envelope.ciphertext),
        nonce: encode_bytes(&envelope.nonce),
    }
}

pub fn decode(encoded: &EncodedEnvelope) -> CryptoResult<Envelope> {
    let nonce_bytes = decode_field("nonce", &encoded.nonce)?;
    if nonce_bytes.len() != NONCE_SIZE {
        return Err(CryptoError::MalformedEnvelope(format!(
            "nonce must be {NONCE_SIZE} bytes, got {}",
            nonce_bytes.len()
        )));
    }

    let ciphertext = decode_field("ciphertext", &encoded.ciphertext)?;
    if ciphertext.len() < TAG_SIZE {
        return Err(CryptoError::MalformedEnvelope(format!(
            "ciphertext shorter than the {TAG_SIZE}-byte tag ({} bytes)",
            ciphertext.len()
        )));
    }

    let mut nonce = [0u8; NONCE_SIZE];
    nonce.copy_from_slice(&nonce_bytes);
    Ok(Envelope { ciphertext, nonce })
}

/// Base64-encodes a single binary field.
pub fn encode_bytes(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

fn decode_field(name: &str, text: &str) -> CryptoResult<Vec<u8>> {
    STANDARD
        .decode(text)
        .map_err(|e| CryptoError::MalformedEnvelope(format!("{name}: {e}")))
}
