use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, State},
    http::{request::Parts, StatusCode},
    response::Json,
};
use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use crate::domain::entities::User;
use crate::domain::services::TokenClaims;
use crate::shared::types::Role;
use crate::shared::{AppState, Result, TaskchiError};

/// Extractor for the authenticated user's id
pub struct AuthenticatedUser(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<TokenClaims>()
            .ok_or(StatusCode::UNAUTHORIZED)?;

        let user_id = claims.user_id().map_err(|_| StatusCode::UNAUTHORIZED)?;
        Ok(AuthenticatedUser(user_id))
    }
}

/// Load the calling user from the database. Tokens outlive account changes,
/// so deactivated or deleted accounts are rejected here.
pub async fn require_user(state: &AppState, user_id: i64) -> Result<User> {
    let user = state.users.find_by_id(user_id).await?.ok_or_else(|| {
        TaskchiError::AuthenticationFailed {
            reason: "User no longer exists".to_string(),
        }
    })?;

    if !user.active {
        return Err(TaskchiError::AuthenticationFailed {
            reason: "Account is disabled".to_string(),
        });
    }

    Ok(user)
}

#[derive(Debug, Serialize)]
pub struct UserMiniDto {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub active: bool,
}

impl From<&User> for UserMiniDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            role: user.role,
            active: user.active,
        }
    }
}

/// Users the caller may assign tasks to.
/// Staff and managers get themselves plus their subtree; admins get every
/// active non-admin user plus themselves. Nobody assigns tasks to other
/// admins.
pub async fn list_assignable(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserMiniDto>>> {
    let me = require_user(&app_state, user_id).await?;

    let mut out: Vec<User> = Vec::new();

    if me.is_admin() {
        for user in app_state.users.list_all().await? {
            if !user.active {
                continue;
            }
            if user.is_admin() && user.id != me.id {
                continue;
            }
            out.push(user);
        }
    } else {
        // self
        if me.active {
            out.push(me.clone());
        }

        // BFS on the hierarchy by manager_id
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        visited.insert(me.id);
        queue.push_back(me.id);

        while let Some(current) = queue.pop_front() {
            for sub in app_state.users.list_by_manager(current).await? {
                if !visited.insert(sub.id) {
                    continue;
                }
                queue.push_back(sub.id);

                if !sub.active {
                    continue;
                }
                if sub.is_admin() {
                    continue;
                }
                out.push(sub);
            }
        }
    }

    out.sort_by(|a, b| {
        a.full_name
            .to_lowercase()
            .cmp(&b.full_name.to_lowercase())
    });

    Ok(Json(out.iter().map(UserMiniDto::from).collect()))
}
