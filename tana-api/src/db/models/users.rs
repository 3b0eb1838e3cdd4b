//! Database models for users.

use crate::api::models::users::UserUpdate;
use crate::types::UserId;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database request for inserting a user row.
///
/// Accounts are provisioned outside this service; this exists for seeding and tests.
#[derive(Debug, Clone, Default)]
pub struct UserCreateDBRequest {
    pub verified: bool,
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub photo_url: String,
}

/// Database request for a partial profile update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserUpdateDBRequest {
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
}

impl UserUpdateDBRequest {
    pub fn new(update: UserUpdate) -> Self {
        Self {
            name: update.name,
            last_name: update.last_name,
            email: update.email,
            phone: update.phone,
            photo_url: update.photo_url,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.last_name.is_none() && self.email.is_none() && self.phone.is_none() && self.photo_url.is_none()
    }
}

/// Database response for a live user
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct UserDBResponse {
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
