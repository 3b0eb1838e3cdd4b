//! Test utilities shared by the unit and router tests.

use crate::auth::session::create_session_token;
use crate::config::{Config, DatabaseConfig};
use crate::db::errors::{DbError, Result as DbResult};
use crate::db::handlers::Users;
use crate::db::models::{
    credentials::{CredentialCreateDBRequest, CredentialDBResponse},
    mmlu::MmluDBResponse,
    users::{UserCreateDBRequest, UserDBResponse, UserUpdateDBRequest},
};
use crate::db::store::{CredentialInsert, InMemoryStore, Store};
use crate::types::{CredentialId, MmluId, UserId};
use crate::{AppState, build_router};
use axum_test::TestServer;
use sqlx::PgPool;
use std::sync::Arc;

pub fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database: DatabaseConfig::Memory,
        secret_key: Some("test-secret-key-for-testing-only".to_string()),
        ..Default::default()
    }
}

pub fn create_test_state(store: Arc<dyn Store>) -> AppState {
    AppState::builder().store(store).config(create_test_config()).build()
}

/// Router over a fresh in-memory store. The returned store handle shares its tables with the
/// server, so tests can seed rows and inspect the call counter.
pub fn create_test_app() -> (TestServer, InMemoryStore) {
    let store = InMemoryStore::new();
    let server = create_test_server(Arc::new(store.clone()));
    (server, store)
}

/// Router over an arbitrary store, for backends other than [`InMemoryStore`].
pub fn create_test_server(store: Arc<dyn Store>) -> TestServer {
    let router = build_router(create_test_state(store)).expect("Failed to build router");
    TestServer::new(router.into_make_service()).expect("Failed to create test server")
}

/// A store whose backend is always unreachable.
pub struct FailingStore;

fn unreachable_backend<T>() -> DbResult<T> {
    Err(DbError::Other(anyhow::anyhow!("connection refused (os error 111)")))
}

#[async_trait::async_trait]
impl Store for FailingStore {
    async fn list_credentials(&self, _owner_id: UserId, _limit: i64) -> DbResult<Vec<CredentialDBResponse>> {
        unreachable_backend()
    }

    async fn get_credential(&self, _id: CredentialId, _owner_id: UserId) -> DbResult<Option<CredentialDBResponse>> {
        unreachable_backend()
    }

    async fn create_credential(&self, _request: CredentialCreateDBRequest, _max_live: i64) -> DbResult<CredentialInsert> {
        unreachable_backend()
    }

    async fn soft_delete_credential(&self, _id: CredentialId, _owner_id: UserId) -> DbResult<bool> {
        unreachable_backend()
    }

    async fn get_user(&self, _id: UserId) -> DbResult<Option<UserDBResponse>> {
        unreachable_backend()
    }

    async fn update_user(&self, _id: UserId, _request: UserUpdateDBRequest) -> DbResult<Option<UserDBResponse>> {
        unreachable_backend()
    }

    async fn list_mmlu(&self) -> DbResult<Vec<MmluDBResponse>> {
        unreachable_backend()
    }

    async fn get_mmlu(&self, _id: MmluId) -> DbResult<Option<MmluDBResponse>> {
        unreachable_backend()
    }

    async fn ping(&self) -> DbResult<()> {
        unreachable_backend()
    }
}

fn test_user_request(email: &str) -> UserCreateDBRequest {
    UserCreateDBRequest {
        verified: false,
        name: "Test".to_string(),
        last_name: "User".to_string(),
        email: email.to_string(),
        phone: "5550100".to_string(),
        photo_url: String::new(),
    }
}

pub fn seed_test_user(store: &InMemoryStore, email: &str) -> UserDBResponse {
    store.seed_user(test_user_request(email))
}

pub async fn create_test_user(pool: &PgPool, email: &str) -> UserDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    let mut users = Users::new(&mut conn);
    users
        .create(&test_user_request(email))
        .await
        .expect("Failed to create test user")
}

/// Bearer token for `user_id`, signed with the test config's key.
pub fn bearer(user_id: UserId) -> String {
    create_session_token(user_id, &create_test_config()).expect("Failed to sign test token")
}
