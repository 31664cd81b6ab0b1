use axum::{extract::State, http::StatusCode, response::Json, Json as JsonExtractor};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use validator::Validate;

use crate::presentation::handlers::user_handlers::{require_user, AuthenticatedUser};
use crate::shared::{AppState, Result};

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: MeResponse,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub roles: Vec<String>,
}

/// Authenticate with email and password
pub async fn login(
    State(app_state): State<Arc<AppState>>,
    JsonExtractor(request): JsonExtractor<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    request.validate()?;

    info!("Login attempt for {}", request.email);

    let result = app_state
        .auth_service
        .login(&request.email, &request.password)
        .await;

    let (token, user) = match result {
        Ok(ok) => {
            metrics::counter!("taskchi_logins_total").increment(1);
            ok
        }
        Err(e) => {
            metrics::counter!("taskchi_login_failures_total").increment(1);
            return Err(e);
        }
    };

    Ok(Json(AuthResponse {
        access_token: token.access_token,
        token_type: token.token_type,
        expires_in: token.expires_in,
        user: MeResponse {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            roles: vec![user.role.as_str().to_string()],
        },
    }))
}

/// Log out. Access tokens are stateless, so there is nothing to revoke
/// server-side; clients drop the token.
pub async fn logout(AuthenticatedUser(user_id): AuthenticatedUser) -> StatusCode {
    info!("Logout for user {}", user_id);
    StatusCode::NO_CONTENT
}

/// The authenticated caller's identity
pub async fn me(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<MeResponse>> {
    let user = require_user(&app_state, user_id).await?;

    Ok(Json(MeResponse {
        id: user.id,
        full_name: user.full_name,
        email: user.email,
        roles: vec![user.role.as_str().to_string()],
    }))
}
