use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    /// Extra origin of the deployed frontend, appended to `allow_origins`.
    #[serde(default)]
    pub client_origin: Option<String>,
    pub max_age: u64,
}

impl CorsConfig {
    pub fn origins(&self) -> impl Iterator<Item = &str> {
        self.allow_origins
            .iter()
            .map(String::as_str)
            .chain(self.client_origin.as_deref())
            .filter(|o| !o.is_empty())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// Networked database URL. When absent the embedded SQLite file is used.
    #[serde(default)]
    pub url: Option<String>,
    pub sqlite_path: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub query_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl DatabaseConfig {
    /// SQLite file at `path` with the default pool settings.
    pub fn sqlite_at(path: impl AsRef<Path>) -> Self {
        Self {
            url: None,
            sqlite_path: path.as_ref().to_string_lossy().into_owned(),
            max_connections: 5,
            acquire_timeout_secs: 8,
            query_timeout_secs: 10,
            sqlx_logging: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AdminConfig {
    /// Shared secret granting read access to every submission.
    pub password: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub admin: AdminConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("FESTIVAL_CONFIG").unwrap_or_else(|_| "config/config".to_string());

        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default(
                "server.cors.allow_origins",
                vec!["http://localhost:5173", "http://localhost:3000"],
            )?
            .set_default("server.cors.max_age", 3600)?
            .set_default("database.sqlite_path", "./data/festival.db")?
            .set_default("database.max_connections", 10)?
            .set_default("database.acquire_timeout_secs", 8)?
            .set_default("database.query_timeout_secs", 10)?
            // Load from config/config.toml
            .add_source(File::with_name(&config_path).required(false))
            // Override from environment (e.g., FESTIVAL__AUTH__JWT_SECRET)
            .add_source(
                Environment::with_prefix("FESTIVAL")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors.allow_origins")
                    .try_parsing(true),
            )
            // Plain variables used by existing deployments win over everything else.
            .set_override_option("database.url", env_var("DATABASE_URL"))?
            .set_override_option("auth.jwt_secret", env_var("JWT_SECRET"))?
            .set_override_option("admin.password", env_var("ADMIN_PASSWORD"))?
            .set_override_option("server.port", env_var("PORT"))?
            .set_override_option("server.cors.client_origin", env_var("CLIENT_ORIGIN"))?
            .build()?;

        let config: Self = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Secrets have no usable default; refuse to start without them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "auth.jwt_secret (or JWT_SECRET) must be set".into(),
            ));
        }
        if self.admin.password.is_empty() {
            return Err(ConfigError::Message(
                "admin.password (or ADMIN_PASSWORD) must be set".into(),
            ));
        }
        if self.database.url.as_deref().is_some_and(str::is_empty) {
            return Err(ConfigError::Message(
                "database.url is set but empty; unset it to use SQLite".into(),
            ));
        }
        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
