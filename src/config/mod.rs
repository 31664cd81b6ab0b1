use crate::shared::TaskchiError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub calendar: CalendarConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connection_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Local reference zone as a fixed offset from UTC, in minutes.
    /// Default 210 (+03:30, Tehran; Iran has no DST since 2022).
    pub utc_offset_minutes: i32,
    pub holiday_api_base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl AppConfig {
    /// Load configuration from environment variables and an optional .env file
    pub fn from_env() -> Result<Self, TaskchiError> {
        dotenvy::dotenv().ok(); // Don't fail if .env doesn't exist

        let config = AppConfig {
            server: ServerConfig {
                host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("PORT")
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()
                    .map_err(|_| TaskchiError::Configuration {
                        message: "Invalid PORT value".to_string(),
                    })?,
                environment: match std::env::var("ENVIRONMENT")
                    .unwrap_or_else(|_| "development".to_string())
                    .to_lowercase()
                    .as_str()
                {
                    "production" => Environment::Production,
                    "staging" => Environment::Staging,
                    _ => Environment::Development,
                },
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL").map_err(|_| TaskchiError::Configuration {
                    message: "DATABASE_URL is required".to_string(),
                })?,
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "20".to_string())
                    .parse()
                    .unwrap_or(20),
                min_connections: std::env::var("DATABASE_MIN_CONNECTIONS")
                    .unwrap_or_else(|_| "2".to_string())
                    .parse()
                    .unwrap_or(2),
                connection_timeout_seconds: std::env::var("DATABASE_TIMEOUT")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .unwrap_or(30),
            },
            auth: AuthConfig {
                jwt_secret: std::env::var("JWT_SECRET").map_err(|_| {
                    TaskchiError::Configuration {
                        message: "JWT_SECRET is required".to_string(),
                    }
                })?,
                jwt_expiration_hours: std::env::var("JWT_EXPIRATION_HOURS")
                    .unwrap_or_else(|_| "24".to_string())
                    .parse()
                    .unwrap_or(24),
            },
            calendar: CalendarConfig {
                utc_offset_minutes: std::env::var("TASKCHI_UTC_OFFSET_MINUTES")
                    .unwrap_or_else(|_| "210".to_string())
                    .parse()
                    .unwrap_or(210),
                holiday_api_base_url: std::env::var("HOLIDAY_API_BASE_URL")
                    .unwrap_or_else(|_| "https://holidayapi.ir".to_string()),
            },
        };

        Ok(config)
    }

    /// Check if we're in development mode
    pub fn is_development(&self) -> bool {
        matches!(self.server.environment, Environment::Development)
    }

    /// Check if we're in production mode
    pub fn is_production(&self) -> bool {
        matches!(self.server.environment, Environment::Production)
    }

    /// Get server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// The local reference zone as a chrono fixed offset
    pub fn local_offset(&self) -> chrono::FixedOffset {
        chrono::FixedOffset::east_opt(self.calendar.utc_offset_minutes * 60)
            .unwrap_or_else(|| chrono::FixedOffset::east_opt(0).unwrap())
    }
}
