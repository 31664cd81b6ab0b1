use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::entities::User;
use crate::shared::types::Role;
use crate::shared::{Result, TaskchiError};

/// Authentication service for credential checks and bearer tokens
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<(AuthToken, User)>;
    async fn validate_token(&self, token: &str) -> Result<TokenClaims>;
}

/// JWT token response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user_id: i64,
}

/// JWT token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String, // user id
    pub email: String,
    pub role: Role,
    pub iat: i64, // issued at
    pub exp: i64, // expires at
}

impl TokenClaims {
    pub fn user_id(&self) -> Result<i64> {
        self.sub
            .parse()
            .map_err(|_| TaskchiError::AuthenticationFailed {
                reason: "Malformed token subject".to_string(),
            })
    }
}
