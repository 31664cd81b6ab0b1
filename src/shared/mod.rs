pub mod app_state;
pub mod errors;

pub use app_state::AppState;
pub use errors::{Result, TaskchiError};

/// Common types used across the application
pub mod types {
    use serde::{Deserialize, Serialize};

    /// User role
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum Role {
        Admin,
        Staff,
    }

    impl Role {
        pub fn as_str(&self) -> &'static str {
            match self {
                Role::Admin => "ADMIN",
                Role::Staff => "STAFF",
            }
        }

        pub fn parse(s: &str) -> Option<Self> {
            match s {
                "ADMIN" => Some(Role::Admin),
                "STAFF" => Some(Role::Staff),
                _ => None,
            }
        }
    }

    /// Task lifecycle status
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum TaskStatus {
        Todo,
        InProgress,
        Done,
    }

    impl TaskStatus {
        pub fn as_str(&self) -> &'static str {
            match self {
                TaskStatus::Todo => "TODO",
                TaskStatus::InProgress => "IN_PROGRESS",
                TaskStatus::Done => "DONE",
            }
        }

        pub fn parse(s: &str) -> Option<Self> {
            match s {
                "TODO" => Some(TaskStatus::Todo),
                "IN_PROGRESS" => Some(TaskStatus::InProgress),
                "DONE" => Some(TaskStatus::Done),
                _ => None,
            }
        }
    }

    /// Task priority
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum TaskPriority {
        Low,
        Medium,
        High,
    }

    impl TaskPriority {
        pub fn as_str(&self) -> &'static str {
            match self {
                TaskPriority::Low => "LOW",
                TaskPriority::Medium => "MEDIUM",
                TaskPriority::High => "HIGH",
            }
        }

        pub fn parse(s: &str) -> Option<Self> {
            match s {
                "LOW" => Some(TaskPriority::Low),
                "MEDIUM" => Some(TaskPriority::Medium),
                "HIGH" => Some(TaskPriority::High),
                _ => None,
            }
        }
    }
}

/// Utilities for common operations
pub mod utils {
    use super::Result;
    use chrono::{DateTime, Utc};
    use rand::Rng;

    /// Get current UTC timestamp
    pub fn now() -> DateTime<Utc> {
        Utc::now()
    }

    /// Hash a password using Argon2
    pub fn hash_password(password: &str) -> Result<String> {
        use argon2::{
            password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
            Argon2,
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| super::TaskchiError::Internal {
                message: format!("Password hashing failed: {}", e),
            })
    }

    /// Verify a password against its hash
    pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
        use argon2::{
            password_hash::{PasswordHash, PasswordVerifier},
            Argon2,
        };

        let parsed_hash = PasswordHash::new(hash).map_err(|e| super::TaskchiError::Internal {
            message: format!("Invalid password hash: {}", e),
        })?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Alphabet for generated passwords. Excludes ambiguous characters (I, l, 0, 1).
    const PASSWORD_CHARS: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz23456789!@#";

    /// Generate a random initial password of the given length
    pub fn generate_password(len: usize) -> String {
        let mut rng = rand::thread_rng();
        (0..len)
            .map(|_| PASSWORD_CHARS[rng.gen_range(0..PASSWORD_CHARS.len())] as char)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::types::{Role, TaskPriority, TaskStatus};
    use super::utils;

    #[test]
    fn role_round_trips_through_str() {
        for role in [Role::Admin, Role::Staff] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("MANAGER"), None);
    }

    #[test]
    fn status_and_priority_round_trip() {
        for status in [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done] {
            assert_eq!(TaskStatus::parse(status.as_str()), Some(status));
        }
        for priority in [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High] {
            assert_eq!(TaskPriority::parse(priority.as_str()), Some(priority));
        }
    }

    #[test]
    fn status_serializes_screaming_snake() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");
    }

    #[test]
    fn generated_passwords_use_the_alphabet() {
        let password = utils::generate_password(10);
        assert_eq!(password.len(), 10);
        assert!(password
            .chars()
            .all(|c| "ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz23456789!@#".contains(c)));
    }

    #[test]
    fn password_hash_verifies() {
        let hash = utils::hash_password("admin1234").unwrap();
        assert!(utils::verify_password("admin1234", &hash).unwrap());
        assert!(!utils::verify_password("wrong", &hash).unwrap());
    }
}
