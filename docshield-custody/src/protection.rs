//! Document protection workflow.
//!
//! Encrypts content locally, then transfers custody of the content key to
//! the key service. The steps run strictly in order and the key never
//! outlives the call: it is zeroized on return, on error, and when the
//! future is dropped mid-flight.

use crate::api_client::KeyServiceClient;
use crate::error::CustodyResult;
use crate::types::*;
use docshield_crypto::{encode, seal, ContentKey};
use std::sync::Arc;
use tracing::{debug, info};

/// Protects documents and manages their lifecycle from the owner's side.
pub struct DocumentProtector {
    custody: Arc<KeyServiceClient>,
}

impl DocumentProtector {
    pub fn new(custody: Arc<KeyServiceClient>) -> Self {
        Self { custody }
    }

    /// Encrypts `content` and registers its key with the key service.
    ///
    /// If the service rejects the request the ciphertext produced here is
    /// unrecoverable, so nothing is returned and the caller keeps the
    /// plaintext it started with.
    pub async fn protect(
        &self,
        content: &[u8],
        metadata: &DocumentMetadata,
        policy: &Policy,
        user_email: &str,
    ) -> CustodyResult<ProtectedDocument> {
        let key = ContentKey::generate()?;
        let envelope = seal(content, &key)?;

        let receipt = {
            let exported = key.export();
            self.custody
                .protect(&exported, &envelope.nonce, metadata, policy, user_email)
                .await?
        };
        drop(key);
        debug!("content key for {} released after custody transfer", receipt.doc_id);

        info!(
            "protected {} as {} ({} bytes)",
            metadata.document_name,
            receipt.doc_id,
            content.len()
        );

        Ok(ProtectedDocument {
            doc_id: receipt.doc_id,
            envelope: encode(&envelope),
            policy: receipt.policy,
        })
    }

    /// Invalidates all future access to a document.
    pub async fn revoke(&self, doc_id: &str, user_email: &str) -> CustodyResult<()> {
        self.custody.revoke(doc_id, user_email).await
    }
}
