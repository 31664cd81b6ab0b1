use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::sync::Arc;
use tracing::info;

use crate::config::AuthConfig;
use crate::domain::entities::User;
use crate::domain::repositories::UserRepository;
use crate::domain::services::{AuthService, AuthToken, TokenClaims};
use crate::shared::{utils, Result, TaskchiError};

pub struct AuthServiceImpl {
    config: AuthConfig,
    user_repo: Arc<dyn UserRepository>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AuthServiceImpl {
    pub fn new(config: AuthConfig, user_repo: Arc<dyn UserRepository>) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_ref());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_ref());

        Self {
            config,
            user_repo,
            encoding_key,
            decoding_key,
        }
    }

    fn generate_token(&self, user: &User) -> Result<AuthToken> {
        let now = Utc::now();
        let exp = now + Duration::hours(self.config.jwt_expiration_hours);

        let claims = TokenClaims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        let access_token =
            encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
                TaskchiError::Internal {
                    message: format!("Failed to generate access token: {}", e),
                }
            })?;

        Ok(AuthToken {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.config.jwt_expiration_hours * 3600,
            user_id: user.id,
        })
    }
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    async fn login(&self, email: &str, password: &str) -> Result<(AuthToken, User)> {
        let user = self.user_repo.find_by_email(email).await?.ok_or_else(|| {
            TaskchiError::AuthenticationFailed {
                reason: "Invalid email or password".to_string(),
            }
        })?;

        if !utils::verify_password(password, &user.password_hash)? {
            return Err(TaskchiError::AuthenticationFailed {
                reason: "Invalid email or password".to_string(),
            });
        }

        if !user.active {
            return Err(TaskchiError::AuthenticationFailed {
                reason: "Account is disabled".to_string(),
            });
        }

        let token = self.generate_token(&user)?;

        info!("Authenticated user: {}", user.id);
        Ok((token, user))
    }

    async fn validate_token(&self, token: &str) -> Result<TokenClaims> {
        let validation = Validation::new(Algorithm::HS256);

        let token_data =
            decode::<TokenClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                TaskchiError::AuthenticationFailed {
                    reason: format!("Invalid token: {}", e),
                }
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockUserRepository;
    use crate::shared::types::Role;

    fn auth_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            jwt_expiration_hours: 24,
        }
    }

    fn user(password: &str, active: bool) -> User {
        User {
            id: 7,
            email: "staff@taskchi.local".to_string(),
            full_name: "Staff".to_string(),
            password_hash: utils::hash_password(password).unwrap(),
            role: Role::Staff,
            active,
            manager_id: None,
        }
    }

    #[tokio::test]
    async fn login_issues_a_validatable_token() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Ok(Some(user("hunter22", true))));
        let service = AuthServiceImpl::new(auth_config(), Arc::new(repo));

        let (token, logged_in) = service
            .login("staff@taskchi.local", "hunter22")
            .await
            .unwrap();
        assert_eq!(logged_in.id, 7);
        assert_eq!(token.token_type, "Bearer");

        let claims = service.validate_token(&token.access_token).await.unwrap();
        assert_eq!(claims.user_id().unwrap(), 7);
        assert_eq!(claims.email, "staff@taskchi.local");
        assert_eq!(claims.role, Role::Staff);
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Ok(Some(user("hunter22", true))));
        let service = AuthServiceImpl::new(auth_config(), Arc::new(repo));

        let err = service
            .login("staff@taskchi.local", "wrong")
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "AUTHENTICATION_FAILED");
    }

    #[tokio::test]
    async fn disabled_accounts_cannot_log_in() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Ok(Some(user("hunter22", false))));
        let service = AuthServiceImpl::new(auth_config(), Arc::new(repo));

        let err = service
            .login("staff@taskchi.local", "hunter22")
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "AUTHENTICATION_FAILED");
    }

    #[tokio::test]
    async fn garbage_tokens_are_rejected() {
        let repo = MockUserRepository::new();
        let service = AuthServiceImpl::new(auth_config(), Arc::new(repo));

        assert!(service.validate_token("not-a-jwt").await.is_err());
    }
}
