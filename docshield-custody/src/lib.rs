//! Key custody for DocShield.
//!
//! Provides the remote half of envelope encryption:
//! - A client for the key service's protect, access and revoke endpoints
//! - The document protection workflow (encrypt, then hand over the key)
//! - The document access workflow (request the key, then decrypt)
//!
//! Access policy is enforced by the key service alone. This crate carries
//! [`Policy`] values to and from the service but never evaluates them.

pub mod access;
pub mod api_client;
pub mod config;
pub mod error;
pub mod protection;
pub mod types;

pub use access::DocumentAccessor;
pub use api_client::KeyServiceClient;
pub use config::KeyServiceConfig;
pub use error::{CustodyError, CustodyResult};
pub use protection::DocumentProtector;
pub use types::*;
