use crate::error::Result;
use crate::models::AccessToken;
use async_trait::async_trait;
use sqlx::SqlitePool;

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait AccessTokenRepository: Send + Sync {
    async fn insert(&self, token_hash: &str, user_id: i64, expires_at: i64) -> Result<()>;
    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<AccessToken>>;
    async fn delete_expired(&self, now: i64) -> Result<u64>;
}

pub struct SqliteAccessTokenRepository {
    pool: SqlitePool,
}

impl SqliteAccessTokenRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessTokenRepository for SqliteAccessTokenRepository {
    async fn insert(&self, token_hash: &str, user_id: i64, expires_at: i64) -> Result<()> {
        sqlx::query("INSERT INTO access_tokens (token_hash, user_id, expires_at) VALUES (?, ?, ?)")
            .bind(token_hash)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<AccessToken>> {
        let token = sqlx::query_as::<_, AccessToken>(
            r#"
            SELECT id, token_hash, user_id, expires_at, created_at
            FROM access_tokens
            WHERE token_hash = ?
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(token)
    }

    async fn delete_expired(&self, now: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM access_tokens WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_pool, create_test_user};

    #[tokio::test]
    async fn test_insert_find_and_expire() {
        let pool = create_test_pool().await;
        let repo = SqliteAccessTokenRepository::new(pool.clone());
        let user_id = create_test_user(&pool, "token@example.com", "password")
            .await
            .unwrap();

        repo.insert("live-hash", user_id, 2_000).await.unwrap();
        repo.insert("stale-hash", user_id, 500).await.unwrap();

        let found = repo.find_by_hash("live-hash").await.unwrap().unwrap();
        assert_eq!(found.user_id, user_id);
        assert!(!found.is_expired(1_000));

        assert_eq!(repo.delete_expired(1_000).await.unwrap(), 1);
        assert!(repo.find_by_hash("stale-hash").await.unwrap().is_none());
        assert!(repo.find_by_hash("missing").await.unwrap().is_none());
    }
}
