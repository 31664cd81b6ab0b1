use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Json,
    Json as JsonExtractor,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

use crate::domain::entities::{NewUser, User};
use crate::presentation::handlers::user_handlers::{require_user, AuthenticatedUser};
use crate::shared::types::Role;
use crate::shared::{utils, AppState, Result, TaskchiError};

const GENERATED_PASSWORD_LEN: usize = 10;

fn require_admin(user: &User) -> Result<()> {
    if !user.is_admin() {
        return Err(TaskchiError::Forbidden {
            reason: "Admin role required".to_string(),
        });
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub active: bool,
    pub manager_id: Option<i64>,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            role: user.role,
            active: user.active,
            manager_id: user.manager_id,
        }
    }
}

/// All users (admin only)
pub async fn list_users(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserDto>>> {
    let me = require_user(&app_state, user_id).await?;
    require_admin(&me)?;

    let users = app_state.users.list_all().await?;
    Ok(Json(users.iter().map(UserDto::from).collect()))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    pub user: UserDto,
    /// Shown exactly once; only the hash is stored.
    pub initial_password: String,
}

/// Create a user with a generated initial password (admin only)
pub async fn create_user(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
    JsonExtractor(request): JsonExtractor<CreateUserRequest>,
) -> Result<Json<CreateUserResponse>> {
    let me = require_user(&app_state, user_id).await?;
    require_admin(&me)?;
    request.validate()?;

    if app_state.users.exists_by_email(&request.email).await? {
        return Err(TaskchiError::ValidationError {
            field: "email".to_string(),
            message: "Email already exists".to_string(),
        });
    }

    let initial_password = utils::generate_password(GENERATED_PASSWORD_LEN);

    let created = app_state
        .users
        .create(NewUser {
            email: request.email,
            full_name: request.full_name,
            password_hash: utils::hash_password(&initial_password)?,
            role: request.role,
            active: true,
            manager_id: None,
        })
        .await?;

    info!("Admin {} created user {}", me.id, created.id);

    app_state
        .audit
        .log(
            &me,
            "USER",
            &created.id.to_string(),
            "CREATE",
            None,
            Some(json!(UserDto::from(&created))),
            &headers,
        )
        .await;

    Ok(Json(CreateUserResponse {
        user: UserDto::from(&created),
        initial_password,
    }))
}

#[derive(Debug, Serialize)]
pub struct ResetPasswordResponse {
    pub new_password: String,
}

/// Replace a user's password with a newly generated one (admin only)
pub async fn reset_password(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<ResetPasswordResponse>> {
    let me = require_user(&app_state, user_id).await?;
    require_admin(&me)?;

    let mut user = app_state.users.find_by_id(id).await?.ok_or_else(|| {
        TaskchiError::NotFound {
            resource: format!("User with id: {}", id),
        }
    })?;

    let new_password = utils::generate_password(GENERATED_PASSWORD_LEN);
    user.password_hash = utils::hash_password(&new_password)?;
    app_state.users.update(&user).await?;

    info!("Admin {} reset password for user {}", me.id, user.id);

    app_state
        .audit
        .log(
            &me,
            "USER",
            &user.id.to_string(),
            "RESET_PASSWORD",
            None,
            None,
            &headers,
        )
        .await;

    Ok(Json(ResetPasswordResponse { new_password }))
}

#[derive(Debug, Deserialize)]
pub struct ActivateRequest {
    pub active: bool,
}

/// Enable or disable an account (admin only)
pub async fn activate_user(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    JsonExtractor(request): JsonExtractor<ActivateRequest>,
) -> Result<Json<UserDto>> {
    let me = require_user(&app_state, user_id).await?;
    require_admin(&me)?;

    let mut user = app_state.users.find_by_id(id).await?.ok_or_else(|| {
        TaskchiError::NotFound {
            resource: format!("User with id: {}", id),
        }
    })?;

    let before = json!(UserDto::from(&user));
    user.active = request.active;
    app_state.users.update(&user).await?;

    app_state
        .audit
        .log(
            &me,
            "USER",
            &user.id.to_string(),
            "ACTIVATE",
            Some(before),
            Some(json!(UserDto::from(&user))),
            &headers,
        )
        .await;

    Ok(Json(UserDto::from(&user)))
}

#[derive(Debug, Deserialize)]
pub struct SetManagerRequest {
    /// None removes the manager.
    pub manager_id: Option<i64>,
}

/// Place a user under a manager in the hierarchy (admin only).
/// Rejects assignments that would make the tree cyclic.
pub async fn set_manager(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    JsonExtractor(request): JsonExtractor<SetManagerRequest>,
) -> Result<Json<UserDto>> {
    let me = require_user(&app_state, user_id).await?;
    require_admin(&me)?;

    let mut user = app_state.users.find_by_id(id).await?.ok_or_else(|| {
        TaskchiError::NotFound {
            resource: format!("User with id: {}", id),
        }
    })?;

    if let Some(manager_id) = request.manager_id {
        app_state
            .users
            .find_by_id(manager_id)
            .await?
            .ok_or_else(|| TaskchiError::ValidationError {
                field: "manager_id".to_string(),
                message: "Manager not found".to_string(),
            })?;

        if app_state
            .hierarchy
            .would_create_cycle(user.id, manager_id)
            .await?
        {
            return Err(TaskchiError::ValidationError {
                field: "manager_id".to_string(),
                message: "Assignment would create a management cycle".to_string(),
            });
        }
    }

    let before = json!(UserDto::from(&user));
    user.manager_id = request.manager_id;
    app_state.users.update(&user).await?;

    app_state
        .audit
        .log(
            &me,
            "USER",
            &user.id.to_string(),
            "SET_MANAGER",
            Some(before),
            Some(json!(UserDto::from(&user))),
            &headers,
        )
        .await;

    Ok(Json(UserDto::from(&user)))
}
