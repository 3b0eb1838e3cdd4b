use crate::db::errors::Result;
use crate::db::models::credentials::{CredentialCreateDBRequest, CredentialDBResponse};
use crate::types::{CredentialId, UserId, abbrev_secret};
use sqlx::PgConnection;
use tracing::instrument;

const CREDENTIAL_COLUMNS: &str = "id, owner_id, api_key, api_secret, last_used, created_at, updated_at";

/// Owner-scoped access to the `credentials` table.
///
/// Every read filters soft-deleted rows and every statement is restricted to a single owner.
pub struct Credentials<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Credentials<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self), err)]
    pub async fn list_for_owner(&mut self, owner_id: UserId, limit: i64) -> Result<Vec<CredentialDBResponse>> {
        let credentials = sqlx::query_as::<_, CredentialDBResponse>(&format!(
            "SELECT {CREDENTIAL_COLUMNS} FROM credentials WHERE owner_id = $1 AND deleted_at IS NULL ORDER BY id ASC LIMIT $2"
        ))
        .bind(owner_id)
        .bind(limit)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(credentials)
    }

    #[instrument(skip(self), err)]
    pub async fn get_for_owner(&mut self, id: CredentialId, owner_id: UserId) -> Result<Option<CredentialDBResponse>> {
        let credential = sqlx::query_as::<_, CredentialDBResponse>(&format!(
            "SELECT {CREDENTIAL_COLUMNS} FROM credentials WHERE id = $1 AND owner_id = $2 AND deleted_at IS NULL"
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(credential)
    }

    /// Lock the owner's user row for the rest of the transaction.
    ///
    /// Concurrent creates for the same owner serialize here, so the count taken afterwards
    /// cannot go stale before the insert. Returns `false` if the owner has no live row.
    #[instrument(skip(self), err)]
    pub async fn lock_owner(&mut self, owner_id: UserId) -> Result<bool> {
        let locked = sqlx::query_scalar::<_, UserId>("SELECT id FROM users WHERE id = $1 AND deleted_at IS NULL FOR UPDATE")
            .bind(owner_id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(locked.is_some())
    }

    #[instrument(skip(self), err)]
    pub async fn count_live(&mut self, owner_id: UserId) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM credentials WHERE owner_id = $1 AND deleted_at IS NULL")
            .bind(owner_id)
            .fetch_one(&mut *self.db)
            .await?;

        Ok(count)
    }

    #[instrument(skip(self, request), fields(owner_id = request.owner_id, api_secret = %abbrev_secret(&request.api_secret)), err)]
    pub async fn create(&mut self, request: &CredentialCreateDBRequest) -> Result<CredentialDBResponse> {
        let credential = sqlx::query_as::<_, CredentialDBResponse>(&format!(
            r#"
            INSERT INTO credentials (owner_id, api_key, api_secret)
            VALUES ($1, $2, $3)
            RETURNING {CREDENTIAL_COLUMNS}
            "#
        ))
        .bind(request.owner_id)
        .bind(&request.api_key)
        .bind(&request.api_secret)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(credential)
    }

    /// Soft-delete a live credential. Returns `false` when nothing matched id and owner.
    #[instrument(skip(self), err)]
    pub async fn soft_delete(&mut self, id: CredentialId, owner_id: UserId) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE credentials SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND owner_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(owner_id)
        .execute(&mut *self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_user;
    use sqlx::PgPool;

    fn create_request(owner_id: UserId, key: &str) -> CredentialCreateDBRequest {
        CredentialCreateDBRequest {
            owner_id,
            api_key: key.to_string(),
            api_secret: "s".repeat(50),
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_is_owner_scoped_and_ordered(pool: PgPool) {
        let alice = create_test_user(&pool, "alice@example.com").await;
        let bob = create_test_user(&pool, "bob@example.com").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Credentials::new(&mut conn);
        let first = repo.create(&create_request(alice.id, "key-a1")).await.unwrap();
        let second = repo.create(&create_request(alice.id, "key-a2")).await.unwrap();
        repo.create(&create_request(bob.id, "key-b1")).await.unwrap();

        let listed = repo.list_for_owner(alice.id, 10).await.unwrap();
        assert_eq!(listed.iter().map(|c| c.id).collect::<Vec<_>>(), vec![first.id, second.id]);

        let limited = repo.list_for_owner(alice.id, 1).await.unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_soft_delete_hides_row_and_is_owner_scoped(pool: PgPool) {
        let alice = create_test_user(&pool, "alice@example.com").await;
        let bob = create_test_user(&pool, "bob@example.com").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Credentials::new(&mut conn);
        let credential = repo.create(&create_request(alice.id, "key-a1")).await.unwrap();

        assert!(!repo.soft_delete(credential.id, bob.id).await.unwrap());
        assert!(repo.get_for_owner(credential.id, alice.id).await.unwrap().is_some());

        assert!(repo.soft_delete(credential.id, alice.id).await.unwrap());
        assert!(repo.get_for_owner(credential.id, alice.id).await.unwrap().is_none());
        assert_eq!(repo.count_live(alice.id).await.unwrap(), 0);

        // Already deleted
        assert!(!repo.soft_delete(credential.id, alice.id).await.unwrap());

        let deleted_at: Option<chrono::DateTime<chrono::Utc>> = sqlx::query_scalar("SELECT deleted_at FROM credentials WHERE id = $1")
            .bind(credential.id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert!(deleted_at.is_some(), "row should be kept with a deletion timestamp");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_duplicate_api_key_is_unique_violation(pool: PgPool) {
        let alice = create_test_user(&pool, "alice@example.com").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Credentials::new(&mut conn);
        repo.create(&create_request(alice.id, "same-key")).await.unwrap();
        let err = repo.create(&create_request(alice.id, "same-key")).await.unwrap_err();

        assert!(matches!(err, crate::db::errors::DbError::UniqueViolation { .. }));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_lock_owner_reports_missing_user(pool: PgPool) {
        let mut tx = pool.begin().await.unwrap();
        let mut repo = Credentials::new(&mut tx);
        assert!(!repo.lock_owner(424242).await.unwrap());
    }
}
