use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use std::fmt;

/// Fallback signing secrets. Fine for local development, rejected in production.
pub const DEV_ACCESS_SECRET: &str = "dev-jwt-secret-key-change-in-production";
pub const DEV_REFRESH_SECRET: &str = "dev-refresh-secret-key-change-in-production";
const DEV_DATABASE_PASSWORD: &str = "password";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Testing,
    Production,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
    pub otp: OtpConfig,
    pub workers: WorkerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the frontend bundle served for non-API paths.
    pub static_dir: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub user: String,
    #[serde(skip_serializing, default = "default_database_password")]
    pub password: SecretString,
    pub host: String,
    pub port: u16,
    pub database: String,
    /// Database used instead of `database` under the testing profile.
    pub test_database: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
    /// Server-side per-statement timeout applied to every pooled connection.
    pub statement_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    #[serde(skip_serializing, default = "default_access_secret")]
    pub access_secret: SecretString,
    #[serde(skip_serializing, default = "default_refresh_secret")]
    pub refresh_secret: SecretString,
    pub access_token_expiration_minutes: i64,
    pub refresh_token_expiration_days: i64,
}

/// Argon2id work factors.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OtpConfig {
    pub expiration_minutes: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkerConfig {
    pub cleanup_interval_seconds: u64,
}

impl Config {
    /// Load configuration from environment variables, with defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            // Override with environment variables using `FOODBANK` prefix and `__` separator
            // e.g., FOODBANK__DATABASE__USER="my_user"
            .add_source(
                config::Environment::with_prefix("FOODBANK")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges, and under the production profile rejects the
    /// insecure development fallbacks.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.jwt.access_token_expiration_minutes <= 0 {
            return Err(invalid("jwt.access_token_expiration_minutes must be positive"));
        }
        if self.jwt.refresh_token_expiration_days <= 0 {
            return Err(invalid("jwt.refresh_token_expiration_days must be positive"));
        }
        if self.otp.expiration_minutes <= 0 {
            return Err(invalid("otp.expiration_minutes must be positive"));
        }
        if self.database.max_connections == 0 {
            return Err(invalid("database.max_connections must be at least 1"));
        }
        if self.database.acquire_timeout_seconds == 0 || self.database.statement_timeout_seconds == 0 {
            return Err(invalid("database timeouts must be at least 1 second"));
        }
        if self.workers.cleanup_interval_seconds == 0 {
            return Err(invalid("workers.cleanup_interval_seconds must be at least 1"));
        }

        if self.environment != Environment::Production {
            return Ok(());
        }

        let access = self.jwt.access_secret.expose_secret();
        let refresh = self.jwt.refresh_secret.expose_secret();
        if access.is_empty() || access == DEV_ACCESS_SECRET {
            return Err(invalid("jwt.access_secret must be set in production"));
        }
        if refresh.is_empty() || refresh == DEV_REFRESH_SECRET {
            return Err(invalid("jwt.refresh_secret must be set in production"));
        }
        if access == refresh {
            return Err(invalid("jwt.access_secret and jwt.refresh_secret must differ"));
        }

        let db_password = self.database.password.expose_secret();
        if db_password.is_empty() || db_password == DEV_DATABASE_PASSWORD {
            return Err(invalid("database.password must be set in production"));
        }
        if self.database.host.is_empty() || self.database.user.is_empty() || self.database.database.is_empty() {
            return Err(invalid("All database settings must be set in production"));
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Database name for the active profile.
    pub fn database_name(&self) -> &str {
        match self.environment {
            Environment::Testing => &self.database.test_database,
            _ => &self.database.database,
        }
    }

    /// Connection string for the active profile.
    pub fn connection_string(&self) -> SecretString {
        self.database.connection_string_for(self.database_name())
    }
}

// Secrets are never serialized, so the layered defaults cannot carry them.
fn default_database_password() -> SecretString {
    DEV_DATABASE_PASSWORD.to_string().into()
}

fn default_access_secret() -> SecretString {
    DEV_ACCESS_SECRET.to_string().into()
}

fn default_refresh_secret() -> SecretString {
    DEV_REFRESH_SECRET.to_string().into()
}

fn invalid(message: &str) -> config::ConfigError {
    config::ConfigError::Message(message.to_string())
}

impl DatabaseConfig {
    /// Constructs the database connection string.
    pub fn connection_string(&self) -> SecretString {
        self.connection_string_for(&self.database)
    }

    fn connection_string_for(&self, database: &str) -> SecretString {
        SecretString::from(format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user,
            self.password.expose_secret(),
            self.host,
            self.port,
            database
        ))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5090,
            static_dir: "frontend".to_string(),
        }
    }
}

// Default values for the database configuration
impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            user: "postgres".to_string(),
            password: default_database_password(),
            host: "localhost".to_string(),
            port: 5432,
            database: "foodbank".to_string(),
            test_database: "foodbank_test".to_string(),
            max_connections: 10,
            acquire_timeout_seconds: 5,
            statement_timeout_seconds: 10,
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            access_secret: default_access_secret(),
            refresh_secret: default_refresh_secret(),
            access_token_expiration_minutes: 24 * 60,
            refresh_token_expiration_days: 30,
        }
    }
}

impl Default for PasswordConfig {
    fn default() -> Self {
        // argon2 crate defaults (19 MiB, 2 passes, 1 lane)
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self { expiration_minutes: 10 }
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self { cleanup_interval_seconds: 300 }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Secrets are skipped by serde
        match serde_json::to_string_pretty(&self) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => write!(f, "Error serializing config"),
        }
    }
}
