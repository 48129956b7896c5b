//! Shared test helpers: client setup and an in-memory fake key service.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use docshield_custody::{KeyServiceClient, KeyServiceConfig};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const TENANT: &str = "tenant-acme";

pub fn test_config(server: &MockServer) -> KeyServiceConfig {
    KeyServiceConfig {
        api_base_url: server.uri(),
        tenant_id: TENANT.into(),
        request_timeout_secs: 5,
        connect_timeout_secs: 5,
    }
}

pub fn test_client(server: &MockServer) -> Arc<KeyServiceClient> {
    Arc::new(KeyServiceClient::new(test_config(server)).expect("client must build"))
}

/// A document as the fake service stores it.
#[derive(Clone, Debug)]
pub struct StoredDocument {
    pub dek: String,
    pub iv: String,
    pub owner: String,
    pub document_name: String,
    pub classification: String,
    pub policy: Value,
    pub revoked: bool,
}

#[derive(Default)]
struct State {
    next_id: u64,
    documents: HashMap<String, StoredDocument>,
}

/// Stateful key service: stores keys on protect, applies a simple
/// domain/email/expiry rule on access, and honors revocation.
#[derive(Clone, Default)]
pub struct FakeKeyService {
    state: Arc<Mutex<State>>,
}

fn error(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({ "error": message }))
}

fn str_field<'a>(body: &'a Value, name: &str) -> &'a str {
    body[name].as_str().unwrap_or_default()
}

fn contains(list: &Value, needle: &str) -> bool {
    list.as_array()
        .map(|items| items.iter().any(|v| v.as_str() == Some(needle)))
        .unwrap_or(false)
}

impl FakeKeyService {
    pub async fn mount(server: &MockServer) -> Self {
        let service = Self::default();
        for endpoint in ["/keys/protect", "/keys/access", "/keys/revoke"] {
            Mock::given(method("POST"))
                .and(path(endpoint))
                .respond_with(service.clone())
                .mount(server)
                .await;
        }
        service
    }

    pub fn document(&self, doc_id: &str) -> Option<StoredDocument> {
        self.state.lock().unwrap().documents.get(doc_id).cloned()
    }

    pub fn document_count(&self) -> usize {
        self.state.lock().unwrap().documents.len()
    }

    fn protect(&self, body: &Value) -> ResponseTemplate {
        let policy = body["policy"].clone();
        if policy["rights"].as_array().is_none_or(|r| r.is_empty()) {
            return error(400, "policy must grant at least one right");
        }

        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let doc_id = format!("doc-{}", state.next_id);
        state.documents.insert(
            doc_id.clone(),
            StoredDocument {
                dek: str_field(body, "dek").to_string(),
                iv: str_field(body, "iv").to_string(),
                owner: str_field(body, "userEmail").to_string(),
                document_name: str_field(body, "documentName").to_string(),
                classification: str_field(body, "classification").to_string(),
                policy: policy.clone(),
                revoked: false,
            },
        );

        ResponseTemplate::new(200).set_body_json(json!({ "docId": doc_id, "policy": policy }))
    }

    fn access(&self, body: &Value) -> ResponseTemplate {
        let state = self.state.lock().unwrap();
        let Some(doc) = state.documents.get(str_field(body, "docId")) else {
            return error(404, "document not found");
        };
        if doc.revoked {
            return error(403, "document has been revoked");
        }

        let email = str_field(body, "userEmail");
        let domain = email.rsplit_once('@').map(|(_, d)| d).unwrap_or_default();
        let entitled = email == doc.owner
            || contains(&doc.policy["allowedEmails"], email)
            || contains(&doc.policy["allowedDomains"], domain);
        if !entitled {
            return error(403, "user is not entitled to this document");
        }

        if let Some(expiry) = doc.policy["expiry"].as_str() {
            let expiry: DateTime<Utc> = expiry.parse().expect("fake service expects RFC 3339");
            if expiry <= Utc::now() {
                return error(403, "document access has expired");
            }
        }

        ResponseTemplate::new(200).set_body_json(json!({
            "dek": doc.dek,
            "rights": doc.policy["rights"],
            "classification": doc.classification,
            "documentName": doc.document_name,
            "watermark": format!("{email} // {}", doc.classification),
        }))
    }

    fn revoke(&self, body: &Value) -> ResponseTemplate {
        let mut state = self.state.lock().unwrap();
        let Some(doc) = state.documents.get_mut(str_field(body, "docId")) else {
            return error(404, "document not found");
        };
        if doc.owner != str_field(body, "userEmail") {
            return error(403, "only the owner may revoke this document");
        }
        doc.revoked = true;
        ResponseTemplate::new(200).set_body_json(json!({ "success": true }))
    }
}

impl Respond for FakeKeyService {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let Ok(body) = serde_json::from_slice::<Value>(&request.body) else {
            return error(400, "invalid JSON");
        };
        if str_field(&body, "tenantId") != TENANT {
            return error(401, "unknown tenant");
        }

        match request.url.path() {
            "/keys/protect" => self.protect(&body),
            "/keys/access" => self.access(&body),
            "/keys/revoke" => self.revoke(&body),
            _ => error(404, "no such endpoint"),
        }
    }
}
