//! Storage backends behind the HTTP routers.
//!
//! The routers only ever talk to a [`Store`]; the concrete backend is chosen once at startup
//! from [`crate::config::DatabaseConfig`] and shared through [`crate::AppState`].
//!
//! - [`PgStore`]: production backend, a connection pool driving the repositories in
//!   [`crate::db::handlers`]
//! - [`InMemoryStore`]: process-local maps, used by tests and `database.type: memory` runs;
//!   contents are lost on restart

use crate::db::errors::Result;
use crate::db::models::{
    credentials::{CredentialCreateDBRequest, CredentialDBResponse},
    mmlu::MmluDBResponse,
    users::{UserDBResponse, UserUpdateDBRequest},
};
use crate::types::{CredentialId, MmluId, UserId};

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryStore;
pub use postgres::PgStore;

/// Result of a quota-checked credential insert.
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialInsert {
    Created(CredentialDBResponse),
    /// The owner already holds `live` credentials, which is at or above the limit
    QuotaReached { live: i64 },
}

#[async_trait::async_trait]
pub trait Store: Send + Sync {
    /// Live credentials of `owner_id`, oldest first, at most `limit` of them
    async fn list_credentials(&self, owner_id: UserId, limit: i64) -> Result<Vec<CredentialDBResponse>>;

    async fn get_credential(&self, id: CredentialId, owner_id: UserId) -> Result<Option<CredentialDBResponse>>;

    /// Insert `request` unless its owner already holds `max_live` or more live credentials.
    ///
    /// The count and the insert are atomic with respect to other inserts for the same owner.
    /// Fails with [`DbError::NotFound`](crate::db::errors::DbError::NotFound) if the owner has no
    /// live user row.
    async fn create_credential(&self, request: CredentialCreateDBRequest, max_live: i64) -> Result<CredentialInsert>;

    /// Returns `false` when no live credential matched both `id` and `owner_id`.
    async fn soft_delete_credential(&self, id: CredentialId, owner_id: UserId) -> Result<bool>;

    async fn get_user(&self, id: UserId) -> Result<Option<UserDBResponse>>;

    /// Returns `None` when there is no live user with this id.
    async fn update_user(&self, id: UserId, request: UserUpdateDBRequest) -> Result<Option<UserDBResponse>>;

    async fn list_mmlu(&self) -> Result<Vec<MmluDBResponse>>;

    async fn get_mmlu(&self, id: MmluId) -> Result<Option<MmluDBResponse>>;

    /// Round-trip to the backend, used by the readiness endpoint.
    async fn ping(&self) -> Result<()>;
}
