//! Server Configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! `config.{toml,yaml,json}` file (path from `IAM_CONFIG`), then `IAM_*`
//! environment variables using `__` as the section separator, e.g.
//! `IAM_JWT__SECRET` or `IAM_DATABASE__HOST`.

use std::time::Duration;

use auth::AuthConfig;
use auth::config::{MAX_TOKEN_TTL_SECS, SeedConfig};
use config::{Config, ConfigError, Environment, File, Source};
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

/// Minimum accepted length of a configured JWT secret, in bytes
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

const DEFAULT_CONFIG_PATH: &str = "config";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub cors: CorsConfig,
    pub password: PasswordConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 31113,
        }
    }
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
    /// Run the bundled migrations at startup
    pub auto_migrate: bool,
    /// Serve from the in-memory store instead of PostgreSQL
    pub in_memory: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            name: "iam".to_string(),
            max_connections: 5,
            auto_migrate: true,
            in_memory: false,
        }
    }
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
    }
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("name", &self.name)
            .field("max_connections", &self.max_connections)
            .field("auto_migrate", &self.auto_migrate)
            .field("in_memory", &self.in_memory)
            .finish()
    }
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct JwtConfig {
    pub secret: Option<String>,
    pub ttl_secs: u64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: None,
            ttl_secs: 24 * 3600,
        }
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins; `"*"` allows any
    pub allow_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: vec![
                "http://localhost:40922".to_string(),
                "http://127.0.0.1:40922".to_string(),
            ],
        }
    }
}

#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct PasswordConfig {
    pub pepper: Option<String>,
}

impl std::fmt::Debug for PasswordConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordConfig")
            .field("pepper", &self.pepper.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl AppConfig {
    /// Load defaults, the optional config file and `IAM_*` overrides
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var("IAM_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::build(File::with_name(&path).required(false))
    }

    fn build<S>(file: S) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("IAM")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors.allow_origins"),
            )
            .build()?
            .try_deserialize()
    }

    /// Settings for the auth crate
    ///
    /// Debug builds fall back to a random JWT secret when none is configured,
    /// which invalidates every token on restart. Release builds refuse to start.
    pub fn to_auth_config(&self) -> Result<AuthConfig, ConfigError> {
        self.auth_config(cfg!(debug_assertions))
    }

    fn auth_config(&self, allow_random_secret: bool) -> Result<AuthConfig, ConfigError> {
        if !(1..=MAX_TOKEN_TTL_SECS).contains(&self.jwt.ttl_secs) {
            return Err(ConfigError::Message(format!(
                "jwt.ttl_secs must be between 1 and {MAX_TOKEN_TTL_SECS} (got {})",
                self.jwt.ttl_secs
            )));
        }

        let base = match self.jwt.secret.as_deref() {
            Some(secret) if secret.len() >= MIN_JWT_SECRET_LENGTH => AuthConfig {
                jwt_secret: secret.as_bytes().to_vec(),
                ..AuthConfig::default()
            },
            Some(_) => {
                return Err(ConfigError::Message(format!(
                    "jwt.secret must be at least {MIN_JWT_SECRET_LENGTH} bytes"
                )));
            }
            None if allow_random_secret => {
                tracing::warn!("jwt.secret not set, using a random development secret");
                AuthConfig::development()
            }
            None => {
                return Err(ConfigError::Message(
                    "jwt.secret must be set (IAM_JWT__SECRET)".to_string(),
                ));
            }
        };

        Ok(AuthConfig {
            token_ttl: Duration::from_secs(self.jwt.ttl_secs),
            password_pepper: self
                .password
                .pepper
                .as_ref()
                .map(|pepper| pepper.as_bytes().to_vec()),
            seed: self.seed.clone(),
            ..base
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> AppConfig {
        AppConfig::build(File::from_str(toml, FileFormat::Toml)).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = from_toml("");
        assert_eq!(config.server.port, 31113);
        assert_eq!(config.database.port, 5432);
        assert!(config.database.auto_migrate);
        assert!(!config.database.in_memory);
        assert_eq!(config.jwt.ttl_secs, 86400);
        assert_eq!(config.seed.roles.len(), 2);
    }

    #[test]
    fn test_file_values() {
        let config = from_toml(
            r#"
            [server]
            port = 8080

            [database]
            host = "db.internal"
            in_memory = true

            [cors]
            allow_origins = ["*"]

            [[seed.privileges]]
            name = "report.read"

            [[seed.roles]]
            name = "auditor"
            privileges = ["report.read"]
            "#,
        );

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.host, "db.internal");
        assert!(config.database.in_memory);
        assert_eq!(config.cors.allow_origins, vec!["*"]);
        assert_eq!(config.seed.privileges.len(), 1);
        assert_eq!(config.seed.roles[0].privileges, vec!["report.read"]);
    }

    #[test]
    fn test_auth_config_uses_secret_and_ttl() {
        let config = from_toml(
            r#"
            [jwt]
            secret = "0123456789abcdef0123456789abcdef"
            ttl_secs = 600

            [password]
            pepper = "pepper"
            "#,
        );

        let auth = config.auth_config(false).unwrap();
        assert_eq!(auth.jwt_secret, b"0123456789abcdef0123456789abcdef");
        assert_eq!(auth.token_ttl_secs(), 600);
        assert_eq!(auth.pepper(), Some(&b"pepper"[..]));
    }

    #[test]
    fn test_missing_secret() {
        let config = from_toml("");
        assert!(config.auth_config(false).is_err());

        let dev = config.auth_config(true).unwrap();
        assert_eq!(dev.jwt_secret.len(), 32);
    }

    #[test]
    fn test_ttl_bounds() {
        let mut config = from_toml("");

        for ttl in [0, MAX_TOKEN_TTL_SECS + 1, u64::MAX] {
            config.jwt.ttl_secs = ttl;
            assert!(config.auth_config(true).is_err(), "ttl {ttl} accepted");
        }

        config.jwt.ttl_secs = MAX_TOKEN_TTL_SECS;
        let auth = config.auth_config(true).unwrap();
        assert_eq!(auth.token_ttl_secs(), 30 * 24 * 3600);
    }

    #[test]
    fn test_ttl_from_file_rejected() {
        let config = from_toml("[jwt]\nttl_secs = 0");
        assert!(config.auth_config(true).is_err());
    }

    #[test]
    fn test_short_secret_rejected() {
        let config = from_toml("[jwt]\nsecret = \"short\"");
        assert!(config.auth_config(true).is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = from_toml(
            r#"
            [database]
            password = "hunter2-db"

            [jwt]
            secret = "0123456789abcdef0123456789abcdef"
            "#,
        );
        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2-db"));
        assert!(!debug.contains("0123456789abcdef"));
    }
}
