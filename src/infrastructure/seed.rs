use tracing::info;

use crate::domain::entities::NewUser;
use crate::shared::types::Role;
use crate::shared::{utils, AppState, Result};

/// Seed a development admin account when the user table is empty.
/// Only runs in the development environment.
pub async fn seed_dev_admin(state: &AppState) -> Result<()> {
    if !state.config.is_development() {
        return Ok(());
    }

    if state.users.count().await? > 0 {
        return Ok(());
    }

    let admin = state
        .users
        .create(NewUser {
            email: "admin@taskchi.local".to_string(),
            full_name: "Admin".to_string(),
            password_hash: utils::hash_password("admin1234")?,
            role: Role::Admin,
            active: true,
            manager_id: None,
        })
        .await?;

    info!("=== DEV ADMIN CREATED ===");
    info!("email: admin@taskchi.local");
    info!("pass : admin1234");
    info!("=========================");
    info!("Seeded dev admin with id {}", admin.id);

    Ok(())
}
