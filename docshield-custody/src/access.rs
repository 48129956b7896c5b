//! Document access workflow.
//!
//! Asks the key service for the document key, then decrypts locally. A
//! refusal from the service stops the workflow before any decryption is
//! attempted. An integrity failure after a successful grant is reported as
//! a crypto error, not as a denial.

use crate::api_client::KeyServiceClient;
use crate::error::CustodyResult;
use crate::types::*;
use docshield_crypto::{decode, open, EncodedEnvelope};
use std::sync::Arc;
use tracing::{debug, warn};

/// Opens protected documents on behalf of a user.
pub struct DocumentAccessor {
    custody: Arc<KeyServiceClient>,
}

impl DocumentAccessor {
    pub fn new(custody: Arc<KeyServiceClient>) -> Self {
        Self { custody }
    }

    /// Recovers the plaintext of `envelope` if the service grants access.
    pub async fn open(
        &self,
        doc_id: &str,
        envelope: &EncodedEnvelope,
        user_email: &str,
        auth_method: AuthMethod,
    ) -> CustodyResult<OpenedDocument> {
        let grant = self
            .custody
            .request_access(doc_id, user_email, auth_method)
            .await?;

        let content = {
            let key = grant.content_key()?;
            let sealed = decode(envelope)?;
            open(&sealed, &key).inspect_err(|_| {
                warn!("document {doc_id}: content failed integrity check after access was granted");
            })?
        };
        debug!("opened document {doc_id} ({} bytes)", content.len());

        Ok(OpenedDocument {
            content,
            rights: grant.rights,
            classification: grant.classification,
            document_name: grant.document_name,
            watermark: grant.watermark,
        })
    }
}
