//! Configuration management
//!
//! Loads configuration for the Folio portfolio system from:
//! - a config.yml file
//! - FOLIO_* environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults, so an empty or
//! absent config file yields a runnable development setup.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origin (cookie-based auth needs credentials)
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
    /// Mark the session cookie `Secure`. Enable behind HTTPS.
    #[serde(default)]
    pub secure_cookies: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
            secure_cookies: false,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database driver (sqlite or mysql)
    #[serde(default)]
    pub driver: DatabaseDriver,
    /// Database connection URL
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            driver: DatabaseDriver::default(),
            url: default_database_url(),
        }
    }
}

fn default_database_url() -> String {
    "data/folio.db".to_string()
}

/// Database driver type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseDriver {
    /// SQLite (default)
    #[default]
    Sqlite,
    /// MySQL
    Mysql,
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache TTL in seconds
    #[serde(default = "default_ttl")]
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl(),
        }
    }
}

fn default_ttl() -> u64 {
    3600
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Session lifetime in hours
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,
    /// Username for the bootstrap account created on an empty database
    #[serde(default = "default_admin_username")]
    pub default_admin_username: String,
    /// Password for the bootstrap account. Change it after first login.
    #[serde(default = "default_admin_password")]
    pub default_admin_password: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_hours: default_session_ttl_hours(),
            default_admin_username: default_admin_username(),
            default_admin_password: default_admin_password(),
        }
    }
}

fn default_session_ttl_hours() -> i64 {
    24
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_admin_password() -> String {
    "admin123".to_string()
}

impl Config {
    /// Load configuration from file.
    ///
    /// If the file doesn't exist or is empty, returns default configuration.
    /// If the file exists but is invalid YAML, returns an error.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file {}: {}", path.display(), e))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file {}: {}", path.display(), e))?;

        Ok(config)
    }

    /// Load configuration from file with environment variable overrides.
    ///
    /// Recognized variables:
    /// - FOLIO_SERVER_HOST, FOLIO_SERVER_PORT, FOLIO_SERVER_CORS_ORIGIN,
    ///   FOLIO_SERVER_SECURE_COOKIES
    /// - FOLIO_DATABASE_DRIVER, FOLIO_DATABASE_URL
    /// - FOLIO_CACHE_TTL_SECONDS
    /// - FOLIO_AUTH_SESSION_TTL_HOURS
    pub fn load_with_env(path: &Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("FOLIO_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("FOLIO_SERVER_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(origin) = std::env::var("FOLIO_SERVER_CORS_ORIGIN") {
            self.server.cors_origin = origin;
        }
        if let Ok(secure) = std::env::var("FOLIO_SERVER_SECURE_COOKIES") {
            self.server.secure_cookies = secure == "1" || secure.eq_ignore_ascii_case("true");
        }
        if let Ok(driver) = std::env::var("FOLIO_DATABASE_DRIVER") {
            match driver.to_lowercase().as_str() {
                "sqlite" => self.database.driver = DatabaseDriver::Sqlite,
                "mysql" => self.database.driver = DatabaseDriver::Mysql,
                other => tracing::warn!("Unknown database driver '{}', keeping config value", other),
            }
        }
        if let Ok(url) = std::env::var("FOLIO_DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(ttl) = std::env::var("FOLIO_CACHE_TTL_SECONDS") {
            if let Ok(ttl) = ttl.parse() {
                self.cache.ttl_seconds = ttl;
            }
        }
        if let Ok(hours) = std::env::var("FOLIO_AUTH_SESSION_TTL_HOURS") {
            if let Ok(hours) = hours.parse() {
                self.auth.session_ttl_hours = hours;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.driver, DatabaseDriver::Sqlite);
        assert_eq!(config.database.url, "data/folio.db");
        assert_eq!(config.auth.session_ttl_hours, 24);
        assert!(!config.server.secure_cookies);
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let config = Config::load(Path::new("does/not/exist.yml")).unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "server:\n  port: 9000\ndatabase:\n  driver: mysql\n  url: mysql://localhost/folio"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.driver, DatabaseDriver::Mysql);
        assert_eq!(config.auth.session_ttl_hours, 24);
    }

    #[test]
    fn test_load_invalid_yaml_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server: [not: valid").unwrap();
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_load_empty_file_returns_defaults() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.port, 8080);
    }
}
