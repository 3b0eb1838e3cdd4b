//! Common type definitions.
//!
//! # ID Types
//!
//! Every table in the schema uses a `BIGSERIAL` primary key, so entity IDs are `i64` aliases:
//!
//! - [`UserId`]: User account identifier, also the session principal
//! - [`CredentialId`]: Credential (API key/secret pair) identifier
//! - [`MmluId`]: Reference table entry identifier

use std::fmt;

// Type aliases for IDs
pub type UserId = i64;
pub type CredentialId = i64;
pub type MmluId = i64;

/// Resource kinds served by the routers, used in error messages and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Credential,
    User,
    Mmlu,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Credential => write!(f, "Credential"),
            Resource::User => write!(f, "User"),
            Resource::Mmlu => write!(f, "Mmlu entry"),
        }
    }
}

/// Abbreviate a secret to its first 6 characters for logs and traces
/// Example: "f3Kx9qLm..." -> "f3Kx9q…"
pub fn abbrev_secret(secret: &str) -> String {
    let head: String = secret.chars().take(6).collect();
    format!("{head}…")
}
