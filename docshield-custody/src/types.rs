//! Shared types for key custody operations.

use chrono::{DateTime, Utc};
use docshield_crypto::{ContentKey, CryptoResult, EncodedEnvelope};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use zeroize::Zeroizing;

/// A capability the key service may grant on a document.
///
/// Unknown strings from the service are kept verbatim in [`Right::Other`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Right {
    View,
    Edit,
    Print,
    Copy,
    Forward,
    Download,
    Other(String),
}

impl Right {
    pub fn as_str(&self) -> &str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
            Self::Print => "print",
            Self::Copy => "copy",
            Self::Forward => "forward",
            Self::Download => "download",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for Right {
    fn from(s: String) -> Self {
        match s.as_str() {
            "view" => Self::View,
            "edit" => Self::Edit,
            "print" => Self::Print,
            "copy" => Self::Copy,
            "forward" => Self::Forward,
            "download" => Self::Download,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for Right {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<Right> for String {
    fn from(right: Right) -> Self {
        match right {
            Right::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Right {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access policy attached to a document at protect time.
///
/// The client never evaluates this. It is sent to the key service, echoed
/// back, and shown to users; only the service decides who gets the key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    #[serde(default)]
    pub allowed_domains: BTreeSet<String>,
    #[serde(default)]
    pub allowed_emails: BTreeSet<String>,
    #[serde(default)]
    pub rights: BTreeSet<Right>,
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
}

impl Policy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow_domain(mut self, domain: impl Into<String>) -> Self {
        self.allowed_domains.insert(domain.into());
        self
    }

    pub fn allow_email(mut self, email: impl Into<String>) -> Self {
        self.allowed_emails.insert(email.into());
        self
    }

    pub fn grant(mut self, right: impl Into<Right>) -> Self {
        self.rights.insert(right.into());
        self
    }

    pub fn expires_at(mut self, expiry: DateTime<Utc>) -> Self {
        self.expiry = Some(expiry);
        self
    }
}

/// How the requesting user authenticated to the host application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    Password,
    Sso,
    Mfa,
    Certificate,
}

/// Descriptive metadata registered alongside a protected document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub document_name: String,
    /// Opaque classification label, e.g. `"CONFIDENTIAL"`.
    pub classification: String,
}

impl DocumentMetadata {
    pub fn new(document_name: impl Into<String>, classification: impl Into<String>) -> Self {
        Self {
            document_name: document_name.into(),
            classification: classification.into(),
        }
    }
}

/// Key service acknowledgement of a successful protect call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProtectReceipt {
    pub doc_id: String,
    /// Policy as stored by the service, which may differ from the request.
    pub policy: Policy,
}

/// Short-lived result of a granted access request.
///
/// Holds the document key as received from the service. Convert it with
/// [`AccessGrant::content_key`] and drop the grant; the key text is zeroized
/// on drop.
pub struct AccessGrant {
    pub(crate) key_material: Zeroizing<String>,
    pub rights: BTreeSet<Right>,
    pub classification: String,
    pub document_name: String,
    pub watermark: Option<String>,
}

impl AccessGrant {
    /// Imports the granted key material.
    pub fn content_key(&self) -> CryptoResult<ContentKey> {
        ContentKey::import_base64(&self.key_material)
    }
}

impl fmt::Debug for AccessGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessGrant")
            .field("key_material", &"[REDACTED]")
            .field("rights", &self.rights)
            .field("classification", &self.classification)
            .field("document_name", &self.document_name)
            .field("watermark", &self.watermark)
            .finish()
    }
}

/// A document after protection: ciphertext plus the id the key service
/// knows it by. Contains no key material.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectedDocument {
    pub doc_id: String,
    pub envelope: EncodedEnvelope,
    pub policy: Policy,
}

/// Plaintext and grant details returned by the access workflow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenedDocument {
    pub content: Vec<u8>,
    pub rights: BTreeSet<Right>,
    pub classification: String,
    pub document_name: String,
    pub watermark: Option<String>,
}
