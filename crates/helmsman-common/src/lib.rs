//! Helmsman Common - Shared error types and constants
//!
//! This crate provides the foundational pieces used across all Helmsman components:
//! - Error types (`HelmsmanError`)
//! - Keys of the cluster credential map
//! - Well-known user ids

pub mod error;

pub use error::HelmsmanError;

/// Credential map key holding the cluster bearer token
pub const BEARER_TOKEN: &str = "bearer_token";

/// Credential map key holding the client TLS private key
pub const TLS_KEY: &str = "tls_key";

/// Credential map key holding the client TLS certificate
pub const CERT_DATA: &str = "cert_data";

/// Credential map key holding the certificate authority bundle
pub const CERTIFICATE_AUTHORITY_DATA: &str = "cert_auth_data";

/// User id recorded for changes made by the system itself (auto-heal etc.)
pub const SYSTEM_USER_ID: i32 = 1;
