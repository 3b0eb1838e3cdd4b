use crate::db::errors::{DbError, Result};
use crate::db::handlers::{Credentials, Reference, Users};
use crate::db::models::{
    credentials::{CredentialCreateDBRequest, CredentialDBResponse},
    mmlu::MmluDBResponse,
    users::{UserDBResponse, UserUpdateDBRequest},
};
use crate::db::store::{CredentialInsert, Store};
use crate::types::{CredentialId, MmluId, UserId};
use sqlx::PgPool;
use tracing::{debug, instrument};

/// PostgreSQL backend. Cloning is cheap; clones share the pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Store for PgStore {
    async fn list_credentials(&self, owner_id: UserId, limit: i64) -> Result<Vec<CredentialDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Credentials::new(&mut conn).list_for_owner(owner_id, limit).await
    }

    async fn get_credential(&self, id: CredentialId, owner_id: UserId) -> Result<Option<CredentialDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Credentials::new(&mut conn).get_for_owner(id, owner_id).await
    }

    #[instrument(skip(self, request), fields(owner_id = request.owner_id), err)]
    async fn create_credential(&self, request: CredentialCreateDBRequest, max_live: i64) -> Result<CredentialInsert> {
        let mut tx = self.pool.begin().await?;
        let mut repo = Credentials::new(&mut tx);

        if !repo.lock_owner(request.owner_id).await? {
            return Err(DbError::NotFound);
        }

        let live = repo.count_live(request.owner_id).await?;
        if live >= max_live {
            debug!(live, max_live, "credential quota reached");
            // Dropping the transaction rolls back and releases the owner lock
            return Ok(CredentialInsert::QuotaReached { live });
        }

        let credential = repo.create(&request).await?;
        tx.commit().await?;

        Ok(CredentialInsert::Created(credential))
    }

    async fn soft_delete_credential(&self, id: CredentialId, owner_id: UserId) -> Result<bool> {
        let mut conn = self.pool.acquire().await?;
        Credentials::new(&mut conn).soft_delete(id, owner_id).await
    }

    async fn get_user(&self, id: UserId) -> Result<Option<UserDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Users::new(&mut conn).get_live(id).await
    }

    async fn update_user(&self, id: UserId, request: UserUpdateDBRequest) -> Result<Option<UserDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Users::new(&mut conn).update(id, &request).await
    }

    async fn list_mmlu(&self) -> Result<Vec<MmluDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Reference::new(&mut conn).find_all::<MmluDBResponse>().await
    }

    async fn get_mmlu(&self, id: MmluId) -> Result<Option<MmluDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Reference::new(&mut conn).find_one::<MmluDBResponse>(id).await
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
