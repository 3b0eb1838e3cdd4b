//! In-memory storage backend.
//!
//! Rows live in `parking_lot`-guarded maps and carry the same soft-delete semantics as the
//! PostgreSQL schema. Every [`Store`] call bumps a counter so tests can assert that a request
//! never reached storage.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::crypto::{generate_api_key, generate_api_secret};
use crate::db::errors::{DbError, Result};
use crate::db::models::{
    credentials::{CredentialCreateDBRequest, CredentialDBResponse},
    mmlu::MmluDBResponse,
    users::{UserCreateDBRequest, UserDBResponse, UserUpdateDBRequest},
};
use crate::db::store::{CredentialInsert, Store};
use crate::types::{CredentialId, MmluId, UserId};

#[derive(Debug, Clone)]
struct StoredCredential {
    row: CredentialDBResponse,
    deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
struct StoredUser {
    row: UserDBResponse,
    deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, StoredUser>,
    credentials: BTreeMap<CredentialId, StoredCredential>,
    mmlus: BTreeMap<MmluId, MmluDBResponse>,
    next_user_id: UserId,
    next_credential_id: CredentialId,
    next_mmlu_id: MmluId,
}

impl Tables {
    fn live_user(&self, id: UserId) -> Option<&StoredUser> {
        self.users.get(&id).filter(|u| u.deleted_at.is_none())
    }

    fn live_credentials(&self, owner_id: UserId) -> impl Iterator<Item = &StoredCredential> {
        self.credentials
            .values()
            .filter(move |c| c.row.owner_id == owner_id && c.deleted_at.is_none())
    }

    fn insert_credential(&mut self, request: CredentialCreateDBRequest) -> Result<CredentialDBResponse> {
        if self.credentials.values().any(|c| c.row.api_key == request.api_key) {
            return Err(DbError::UniqueViolation {
                constraint: Some("credentials_api_key_key".to_string()),
                table: Some("credentials".to_string()),
                message: "duplicate key value violates unique constraint \"credentials_api_key_key\"".to_string(),
            });
        }

        self.next_credential_id += 1;
        let now = Utc::now();
        let row = CredentialDBResponse {
            id: self.next_credential_id,
            owner_id: request.owner_id,
            api_key: request.api_key,
            api_secret: request.api_secret,
            last_used: None,
            created_at: now,
            updated_at: now,
        };
        self.credentials.insert(row.id, StoredCredential { row: row.clone(), deleted_at: None });
        Ok(row)
    }
}

/// In-memory implementation of [`Store`]. Clones share the same tables and counter.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
    calls: Arc<AtomicUsize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of [`Store`] operations served so far. Seeding does not count.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    pub fn seed_user(&self, request: UserCreateDBRequest) -> UserDBResponse {
        let mut tables = self.tables.write();
        tables.next_user_id += 1;
        let now = Utc::now();
        let row = UserDBResponse {
            id: tables.next_user_id,
            verified: request.verified,
            name: request.name,
            last_name: request.last_name,
            email: request.email,
            phone: request.phone,
            photo_url: request.photo_url,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(row.id, StoredUser { row: row.clone(), deleted_at: None });
        row
    }

    /// Insert a live credential for `owner_id` without any quota check.
    pub fn seed_credential(&self, owner_id: UserId) -> Result<CredentialDBResponse> {
        self.tables.write().insert_credential(CredentialCreateDBRequest {
            owner_id,
            api_key: generate_api_key(),
            api_secret: generate_api_secret(50),
        })
    }

    pub fn seed_mmlu(&self, name: &str, description: &str, feeling: &str, photo_url: &str) -> MmluDBResponse {
        let mut tables = self.tables.write();
        tables.next_mmlu_id += 1;
        let row = MmluDBResponse {
            id: tables.next_mmlu_id,
            name: name.to_string(),
            description: description.to_string(),
            feeling: feeling.to_string(),
            photo_url: photo_url.to_string(),
        };
        tables.mmlus.insert(row.id, row.clone());
        row
    }

    /// Whether a credential row exists and is not soft-deleted, regardless of owner.
    pub fn is_credential_live(&self, id: CredentialId) -> bool {
        self.tables.read().credentials.get(&id).is_some_and(|c| c.deleted_at.is_none())
    }
}

#[async_trait::async_trait]
impl Store for InMemoryStore {
    async fn list_credentials(&self, owner_id: UserId, limit: i64) -> Result<Vec<CredentialDBResponse>> {
        self.record_call();
        let limit = usize::try_from(limit).unwrap_or(0);
        let tables = self.tables.read();
        Ok(tables.live_credentials(owner_id).take(limit).map(|c| c.row.clone()).collect())
    }

    async fn get_credential(&self, id: CredentialId, owner_id: UserId) -> Result<Option<CredentialDBResponse>> {
        self.record_call();
        let tables = self.tables.read();
        Ok(tables.live_credentials(owner_id).find(|c| c.row.id == id).map(|c| c.row.clone()))
    }

    async fn create_credential(&self, request: CredentialCreateDBRequest, max_live: i64) -> Result<CredentialInsert> {
        self.record_call();
        // One write guard covers count and insert
        let mut tables = self.tables.write();

        if tables.live_user(request.owner_id).is_none() {
            return Err(DbError::NotFound);
        }

        let live = tables.live_credentials(request.owner_id).count() as i64;
        if live >= max_live {
            return Ok(CredentialInsert::QuotaReached { live });
        }

        Ok(CredentialInsert::Created(tables.insert_credential(request)?))
    }

    async fn soft_delete_credential(&self, id: CredentialId, owner_id: UserId) -> Result<bool> {
        self.record_call();
        let mut tables = self.tables.write();
        match tables.credentials.get_mut(&id) {
            Some(stored) if stored.row.owner_id == owner_id && stored.deleted_at.is_none() => {
                let now = Utc::now();
                stored.deleted_at = Some(now);
                stored.row.updated_at = now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn get_user(&self, id: UserId) -> Result<Option<UserDBResponse>> {
        self.record_call();
        Ok(self.tables.read().live_user(id).map(|u| u.row.clone()))
    }

    async fn update_user(&self, id: UserId, request: UserUpdateDBRequest) -> Result<Option<UserDBResponse>> {
        self.record_call();
        let mut tables = self.tables.write();

        if let Some(email) = &request.email {
            let taken = tables
                .users
                .values()
                .any(|u| u.row.id != id && u.deleted_at.is_none() && &u.row.email == email);
            if taken {
                return Err(DbError::UniqueViolation {
                    constraint: Some("users_email_key".to_string()),
                    table: Some("users".to_string()),
                    message: "duplicate key value violates unique constraint \"users_email_key\"".to_string(),
                });
            }
        }

        let Some(stored) = tables.users.get_mut(&id).filter(|u| u.deleted_at.is_none()) else {
            return Ok(None);
        };

        let row = &mut stored.row;
        if let Some(name) = request.name {
            row.name = name;
        }
        if let Some(last_name) = request.last_name {
            row.last_name = last_name;
        }
        if let Some(email) = request.email {
            row.email = email;
        }
        if let Some(phone) = request.phone {
            row.phone = phone;
        }
        if let Some(photo_url) = request.photo_url {
            row.photo_url = photo_url;
        }
        row.updated_at = Utc::now();

        Ok(Some(row.clone()))
    }

    async fn list_mmlu(&self) -> Result<Vec<MmluDBResponse>> {
        self.record_call();
        Ok(self.tables.read().mmlus.values().cloned().collect())
    }

    async fn get_mmlu(&self, id: MmluId) -> Result<Option<MmluDBResponse>> {
        self.record_call();
        Ok(self.tables.read().mmlus.get(&id).cloned())
    }

    async fn ping(&self) -> Result<()> {
        self.record_call();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::seed_test_user;

    fn request(owner_id: UserId) -> CredentialCreateDBRequest {
        CredentialCreateDBRequest {
            owner_id,
            api_key: generate_api_key(),
            api_secret: generate_api_secret(50),
        }
    }

    #[tokio::test]
    async fn test_quota_counts_only_live_rows() {
        let store = InMemoryStore::new();
        let user = seed_test_user(&store, "erin@example.com");

        let mut ids = Vec::new();
        for _ in 0..3 {
            match store.create_credential(request(user.id), 3).await.unwrap() {
                CredentialInsert::Created(c) => ids.push(c.id),
                other => panic!("unexpected outcome: {other:?}"),
            }
        }
        assert_eq!(
            store.create_credential(request(user.id), 3).await.unwrap(),
            CredentialInsert::QuotaReached { live: 3 }
        );

        assert!(store.soft_delete_credential(ids[0], user.id).await.unwrap());
        assert!(matches!(
            store.create_credential(request(user.id), 3).await.unwrap(),
            CredentialInsert::Created(_)
        ));
    }

    #[tokio::test]
    async fn test_duplicate_api_key_rejected() {
        let store = InMemoryStore::new();
        let user = seed_test_user(&store, "frank@example.com");
        let mut req = request(user.id);
        req.api_key = "fixed".to_string();

        store.create_credential(req.clone(), 10).await.unwrap();
        let err = store.create_credential(req, 10).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_update_user_rejects_taken_email() {
        let store = InMemoryStore::new();
        let grace = seed_test_user(&store, "grace@example.com");
        seed_test_user(&store, "heidi@example.com");

        let update = UserUpdateDBRequest {
            email: Some("heidi@example.com".to_string()),
            ..Default::default()
        };
        let err = store.update_user(grace.id, update).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
        assert_eq!(store.get_user(grace.id).await.unwrap().unwrap().email, "grace@example.com");
    }

    #[tokio::test]
    async fn test_call_counter_ignores_seeding() {
        let store = InMemoryStore::new();
        seed_test_user(&store, "ivan@example.com");
        store.seed_mmlu("Calm", "", "calm", "");
        assert_eq!(store.call_count(), 0);

        store.list_mmlu().await.unwrap();
        store.ping().await.unwrap();
        assert_eq!(store.call_count(), 2);
    }
}
