//! API request/response models for credentials.

use crate::db::models::credentials::CredentialDBResponse;
use crate::types::{CredentialId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A credential as listed or fetched. Never carries the secret.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CredentialResponse {
    pub id: CredentialId,
    pub owner_id: UserId,
    /// Public key identifier (UUID v4)
    #[schema(format = "uuid")]
    pub api_key: String,
    pub last_used: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A freshly generated credential, including its secret.
///
/// This is the only response that ever contains `api_secret`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CreatedCredential {
    pub id: CredentialId,
    pub owner_id: UserId,
    #[schema(format = "uuid")]
    pub api_key: String,
    pub api_secret: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CredentialCreatedResponse {
    pub message: String,
    pub credential: CreatedCredential,
}

impl From<CredentialDBResponse> for CredentialResponse {
    fn from(db: CredentialDBResponse) -> Self {
        Self {
            id: db.id,
            owner_id: db.owner_id,
            api_key: db.api_key,
            last_used: db.last_used,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<CredentialDBResponse> for CreatedCredential {
    fn from(db: CredentialDBResponse) -> Self {
        Self {
            id: db.id,
            owner_id: db.owner_id,
            api_key: db.api_key,
            api_secret: db.api_secret,
            created_at: db.created_at,
        }
    }
}
