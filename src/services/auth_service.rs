use crate::error::{AppError, Result};
use crate::models::{AuthenticatedUser, LoginRequest, User};
use crate::repositories::{AccessTokenRepository, UserRepository};
use crate::services::user_service::{verify_password, UserServiceError};
use chrono::{Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::sync::Arc;

const TOKEN_PREFIX: &str = "todo_";

/// Password login and bearer token issue/validation.
///
/// Tokens are 32 random bytes, hex encoded with a `todo_` prefix. Only the
/// SHA-256 of a token is persisted.
pub struct AuthService {
    user_repository: Arc<dyn UserRepository>,
    token_repository: Arc<dyn AccessTokenRepository>,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        token_repository: Arc<dyn AccessTokenRepository>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            user_repository,
            token_repository,
            token_ttl,
        }
    }

    pub async fn authenticate(&self, request: LoginRequest) -> Result<User> {
        // Find user by email
        let user = self
            .user_repository
            .find_by_email(request.email.trim())
            .await
            .map_err(UserServiceError::from)?
            .ok_or(AppError::InvalidCredentials)?;

        // Verify password
        if !verify_password(&request.password, &user.password) {
            return Err(AppError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Create a new token for `user_id`. The plaintext is returned once.
    pub async fn issue_token(&self, user_id: i64) -> Result<String> {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let token = format!("{}{}", TOKEN_PREFIX, hex::encode(bytes));

        let expires_at = (Utc::now() + self.token_ttl).timestamp();
        self.token_repository
            .insert(&hash_token(&token), user_id, expires_at)
            .await?;

        Ok(token)
    }

    /// Resolve a bearer token into the identity of its user.
    pub async fn validate_token(&self, token: &str) -> Result<AuthenticatedUser> {
        if !token.starts_with(TOKEN_PREFIX) {
            return Err(AppError::Unauthorized);
        }

        let record = self
            .token_repository
            .find_by_hash(&hash_token(token))
            .await?
            .ok_or(AppError::Unauthorized)?;

        if record.is_expired(Utc::now().timestamp()) {
            tracing::debug!(user_id = record.user_id, "rejected expired access token");
            return Err(AppError::Unauthorized);
        }

        let user = self
            .user_repository
            .find_by_id(record.user_id)
            .await
            .map_err(UserServiceError::from)?
            .ok_or(AppError::Unauthorized)?;

        Ok(AuthenticatedUser {
            id: user.id,
            email: user.email,
            name: user.name,
        })
    }

    pub async fn purge_expired_tokens(&self) -> Result<u64> {
        self.token_repository
            .delete_expired(Utc::now().timestamp())
            .await
    }
}

/// Hash a token using SHA-256 (hex)
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AccessToken;
    use crate::repositories::access_token_repository::MockAccessTokenRepository;
    use crate::repositories::user_repository::MockUserRepository;
    use crate::repositories::{SqliteAccessTokenRepository, SqliteUserRepository};
    use crate::test_utils::{create_test_pool, create_test_user};
    use mockall::predicate::*;

    fn token_record(user_id: i64, expires_at: i64) -> AccessToken {
        AccessToken {
            id: 1,
            token_hash: "hash".to_string(),
            user_id,
            expires_at,
            created_at: chrono::NaiveDateTime::default(),
        }
    }

    #[tokio::test]
    async fn test_authenticate_invalid_email() {
        let mut mock_users = MockUserRepository::new();

        mock_users
            .expect_find_by_email()
            .with(eq("test@example.com"))
            .times(1)
            .returning(|_| Box::pin(async move { Ok(None) }));

        let service = AuthService::new(
            Arc::new(mock_users),
            Arc::new(MockAccessTokenRepository::new()),
            Duration::hours(1),
        );

        let request = LoginRequest {
            email: "test@example.com".to_string(),
            password: "password123".to_string(),
        };

        let result = service.authenticate(request).await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_validate_token_rejects_unknown_prefix() {
        // Neither repository may be consulted
        let service = AuthService::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(MockAccessTokenRepository::new()),
            Duration::hours(1),
        );

        let result = service.validate_token("not-one-of-ours").await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_validate_token_rejects_expired() {
        let mut mock_tokens = MockAccessTokenRepository::new();

        mock_tokens
            .expect_find_by_hash()
            .withf(|hash| *hash == hash_token("todo_abc"))
            .times(1)
            .returning(|_| {
                let record = token_record(1, Utc::now().timestamp() - 10);
                Box::pin(async move { Ok(Some(record)) })
            });

        let service = AuthService::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(mock_tokens),
            Duration::hours(1),
        );

        let result = service.validate_token("todo_abc").await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_hash_token_is_stable_hex() {
        let hash = hash_token("todo_abc");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, hash_token("todo_abc"));
        assert_ne!(hash, hash_token("todo_abd"));
    }

    #[tokio::test]
    async fn test_login_issue_and_validate_roundtrip() {
        let pool = create_test_pool().await;
        let user_id = create_test_user(&pool, "login@example.com", "password123")
            .await
            .unwrap();

        let service = AuthService::new(
            Arc::new(SqliteUserRepository::new(pool.clone())),
            Arc::new(SqliteAccessTokenRepository::new(pool.clone())),
            Duration::hours(1),
        );

        let wrong = service
            .authenticate(LoginRequest {
                email: "login@example.com".to_string(),
                password: "wrong-password".to_string(),
            })
            .await;
        assert!(matches!(wrong, Err(AppError::InvalidCredentials)));

        let user = service
            .authenticate(LoginRequest {
                email: "login@example.com".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(user.id, user_id);

        let token = service.issue_token(user.id).await.unwrap();
        assert!(token.starts_with("todo_"));

        let caller = service.validate_token(&token).await.unwrap();
        assert_eq!(caller.id, user_id);
        assert_eq!(caller.email, "login@example.com");

        // Stored value is the hash, never the token itself
        let stored: String = sqlx::query_scalar("SELECT token_hash FROM access_tokens")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(stored, hash_token(&token));

        assert_eq!(service.purge_expired_tokens().await.unwrap(), 0);
    }
}
