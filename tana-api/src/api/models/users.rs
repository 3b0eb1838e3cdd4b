//! API request/response models for user profiles.

use std::fmt;

use crate::db::models::users::UserDBResponse;
use crate::types::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: UserId,
    pub verified: bool,
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub photo_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserDBResponse> for UserResponse {
    fn from(db: UserDBResponse) -> Self {
        Self {
            id: db.id,
            verified: db.verified,
            name: db.name,
            last_name: db.last_name,
            email: db.email,
            phone: db.phone,
            photo_url: db.photo_url,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

/// Partial profile update.
///
/// Absent, `null` and empty-string fields are all left untouched. Unknown fields (including
/// `id`, `verified` and the timestamps) are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UserUpdate {
    /// 2 to 100 characters
    pub name: Option<String>,
    /// 2 to 100 characters
    pub last_name: Option<String>,
    #[schema(format = "email")]
    pub email: Option<String>,
    /// 7 to 15 characters
    pub phone: Option<String>,
    pub photo_url: Option<String>,
}

impl UserUpdate {
    /// Drop empty strings so they read as "not provided".
    pub fn normalized(self) -> Self {
        fn present(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.is_empty())
        }

        Self {
            name: present(self.name),
            last_name: present(self.last_name),
            email: present(self.email),
            phone: present(self.phone),
            photo_url: present(self.photo_url),
        }
    }
}

/// Per-field validation failures for a profile update.
///
/// Only failing fields are serialized. `password_error` is part of the published error shape
/// but profile updates carry no password, so it is never set here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UpdateValidationErrors {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_error: Option<String>,
}

impl UpdateValidationErrors {
    fn entries(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("name", &self.name_error),
            ("last_name", &self.last_name_error),
            ("phone", &self.phone_error),
            ("email", &self.email_error),
            ("password", &self.password_error),
        ]
        .into_iter()
        .filter_map(|(field, message)| message.as_deref().map(|m| (field, m)))
    }
}

impl fmt::Display for UpdateValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.entries() {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}
