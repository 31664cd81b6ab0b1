pub mod auth_service;
pub mod hierarchy;

pub use auth_service::{AuthService, AuthToken, TokenClaims};
pub use hierarchy::UserHierarchyService;
