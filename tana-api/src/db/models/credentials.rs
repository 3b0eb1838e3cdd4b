//! Database models for credentials.

use crate::types::{CredentialId, UserId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database request for creating a new credential
#[derive(Debug, Clone)]
pub struct CredentialCreateDBRequest {
    pub owner_id: UserId,
    pub api_key: String,
    pub api_secret: String,
}

/// Database response for a live credential
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct CredentialDBResponse {
    pub id: CredentialId,
    pub owner_id: UserId,
    pub api_key: String,
    pub api_secret: String,
    pub last_used: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
