//! HTTP client for the remote key service.
//!
//! Implements the three custody exchanges: protect, access and revoke. Every
//! call is a single request/response with the tenant id in the body. Nothing
//! is retried here, including on 401, so a key operation is never silently
//! duplicated.

use crate::config::KeyServiceConfig;
use crate::error::{CustodyError, CustodyResult};
use crate::types::*;
use docshield_crypto::{encode_bytes, ExportedKey, NONCE_SIZE};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

/// The three remote operations, each with its own endpoint and rejection kind.
#[derive(Clone, Copy, Debug)]
enum Operation {
    Protect,
    Access,
    Revoke,
}

impl Operation {
    fn path(self) -> &'static str {
        match self {
            Self::Protect => "/keys/protect",
            Self::Access => "/keys/access",
            Self::Revoke => "/keys/revoke",
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Protect => "protect",
            Self::Access => "access",
            Self::Revoke => "revoke",
        }
    }

    fn rejection(self, reason: String) -> CustodyError {
        match self {
            Self::Protect => CustodyError::ProtectionRejected(reason),
            Self::Access => CustodyError::AccessDenied(reason),
            Self::Revoke => CustodyError::RevocationRejected(reason),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProtectBody<'a> {
    dek: &'a str,
    iv: &'a str,
    document_name: &'a str,
    classification: &'a str,
    policy: &'a Policy,
    tenant_id: &'a str,
    user_email: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProtectReply {
    doc_id: String,
    #[serde(default)]
    policy: Option<Policy>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AccessBody<'a> {
    doc_id: &'a str,
    tenant_id: &'a str,
    user_email: &'a str,
    auth_method: AuthMethod,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccessReply {
    dek: String,
    #[serde(default)]
    rights: BTreeSet<Right>,
    classification: String,
    document_name: String,
    #[serde(default)]
    watermark: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RevokeBody<'a> {
    doc_id: &'a str,
    tenant_id: &'a str,
    user_email: &'a str,
}

#[derive(Deserialize)]
struct RevokeReply {
    success: bool,
}

#[derive(Deserialize)]
struct ErrorReply {
    error: String,
}

/// Client for the key custody service.
pub struct KeyServiceClient {
    client: Client,
    config: KeyServiceConfig,
}

impl KeyServiceClient {
    pub fn new(config: KeyServiceConfig) -> CustodyResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| CustodyError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &KeyServiceConfig {
        &self.config
    }

    // ── Protect ──

    /// Registers a new document and hands its key to the service.
    ///
    /// After this returns the caller should drop `key`; custody has moved to
    /// the service and the local copy is no longer needed.
    pub async fn protect(
        &self,
        key: &ExportedKey,
        nonce: &[u8; NONCE_SIZE],
        metadata: &DocumentMetadata,
        policy: &Policy,
        user_email: &str,
    ) -> CustodyResult<ProtectReceipt> {
        let dek = key.to_base64();
        let iv = encode_bytes(nonce);

        let body = ProtectBody {
            dek: &dek,
            iv: &iv,
            document_name: &metadata.document_name,
            classification: &metadata.classification,
            policy,
            tenant_id: &self.config.tenant_id,
            user_email,
        };

        let reply: ProtectReply = self.post(Operation::Protect, &body).await?;
        if reply.doc_id.trim().is_empty() {
            return Err(CustodyError::UnexpectedResponse(
                "protect reply: empty docId".to_string(),
            ));
        }
        info!(
            "document {} registered with key service ({})",
            reply.doc_id, metadata.classification
        );

        Ok(ProtectReceipt {
            doc_id: reply.doc_id,
            policy: reply.policy.unwrap_or_else(|| policy.clone()),
        })
    }

    // ── Access ──

    /// Asks the service to evaluate entitlement and release the key.
    ///
    /// A policy refusal surfaces as [`CustodyError::AccessDenied`] with the
    /// service's reason; connectivity problems stay [`CustodyError::Transport`].
    pub async fn request_access(
        &self,
        doc_id: &str,
        user_email: &str,
        auth_method: AuthMethod,
    ) -> CustodyResult<AccessGrant> {
        let body = AccessBody {
            doc_id,
            tenant_id: &self.config.tenant_id,
            user_email,
            auth_method,
        };

        let reply: AccessReply = self.post(Operation::Access, &body).await?;
        debug!("access granted for document {doc_id}");

        Ok(AccessGrant {
            key_material: Zeroizing::new(reply.dek),
            rights: reply.rights,
            classification: reply.classification,
            document_name: reply.document_name,
            watermark: reply.watermark,
        })
    }

    // ── Revoke ──

    pub async fn revoke(&self, doc_id: &str, user_email: &str) -> CustodyResult<()> {
        let body = RevokeBody {
            doc_id,
            tenant_id: &self.config.tenant_id,
            user_email,
        };

        let reply: RevokeReply = self.post(Operation::Revoke, &body).await?;
        if !reply.success {
            warn!("key service declined revocation of document {doc_id}");
            return Err(CustodyError::RevocationRejected(
                "key service reported revocation failure".to_string(),
            ));
        }

        info!("revoked access to document {doc_id}");
        Ok(())
    }

    /// Sends one POST and classifies the response.
    ///
    /// 2xx parses the body, 4xx becomes the operation's rejection. 5xx, 408,
    /// 429 and unfollowed 3xx become [`CustodyError::Service`]. The `error`
    /// field of the body is kept intact.
    async fn post<B, R>(&self, op: Operation, body: &B) -> CustodyResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.config.base_url(), op.path());
        debug!("POST {}", op.path());

        let resp = self.client.post(&url).json(body).send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;

        if status.is_success() {
            return serde_json::from_slice(&bytes).map_err(|e| {
                CustodyError::UnexpectedResponse(format!("{} reply: {e}", op.name()))
            });
        }

        let reason = rejection_reason(status, &bytes);
        if is_service_fault(status) {
            warn!("key service {} failed with {status}: {reason}", op.name());
            return Err(CustodyError::Service {
                status: status.as_u16(),
                reason,
            });
        }

        warn!("key service rejected {} ({status}): {reason}", op.name());
        Err(op.rejection(reason))
    }
}

/// Statuses that say nothing about policy: server faults, gateway timeouts,
/// throttling and redirects (which are never followed).
fn is_service_fault(status: StatusCode) -> bool {
    status.is_server_error()
        || status.is_redirection()
        || status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
}

/// Extracts the human-readable reason from a non-2xx response.
///
/// Prefers the JSON `error` field, then the raw body, then the status line.
fn rejection_reason(status: StatusCode, body: &[u8]) -> String {
    if let Ok(reply) = serde_json::from_slice::<ErrorReply>(body) {
        return reply.error;
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if !text.is_empty() {
        return text.to_string();
    }

    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string())
}
