use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::auth::MAX_TOKEN_TTL_SECS;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory of the single-page app served for unmatched GETs
    pub static_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// Seconds to wait when acquiring a connection
    pub connection_timeout: u64,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_secs: u64,
    /// `*` allows any origin
    pub cors_origins: Vec<String>,
}

impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_expiry_secs", &self.jwt_expiry_secs)
            .field("cors_origins", &self.cors_origins)
            .finish()
    }
}

/// Shortest secret accepted in production (HS256 key size)
const MIN_PRODUCTION_SECRET_LEN: usize = 32;

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key → value source. `from_env` passes the
    /// process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        let config = match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_overrides(&lookup)?;

        config.validate()?;
        Ok(config)
    }

    fn with_overrides<F>(mut self, lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server overrides
        if let Some(v) = lookup("HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("PORT") {
            self.server.port = parse("PORT", &v)?;
        }
        if let Some(v) = lookup("STATIC_DIR") {
            self.server.static_dir = PathBuf::from(v);
        }

        // Database overrides
        if let Some(v) = lookup("DATABASE_URL") {
            self.database.url = v;
        }
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse("DATABASE_MAX_CONNECTIONS", &v)?;
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = parse("DATABASE_CONNECTION_TIMEOUT", &v)?;
        }

        // Security overrides
        if let Some(v) = lookup("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Some(v) = lookup("JWT_EXPIRY_SECS") {
            self.security.jwt_expiry_secs = parse("JWT_EXPIRY_SECS", &v)?;
        }
        if let Some(v) = lookup("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }
        // There is no built-in fallback secret
        if self.security.jwt_secret.is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }
        if self.environment == Environment::Production
            && self.security.jwt_secret.len() < MIN_PRODUCTION_SECRET_LEN
        {
            return Err(ConfigError::Invalid {
                name: "JWT_SECRET",
                reason: format!("must be at least {MIN_PRODUCTION_SECRET_LEN} bytes in production"),
            });
        }
        if self.security.jwt_expiry_secs == 0 || self.security.jwt_expiry_secs > MAX_TOKEN_TTL_SECS {
            return Err(ConfigError::Invalid {
                name: "JWT_EXPIRY_SECS",
                reason: format!("must be between 1 and {MAX_TOKEN_TTL_SECS}"),
            });
        }
        Ok(())
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig::default(),
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 10,
                connection_timeout: 30,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_secs: 60 * 60,
                cors_origins: vec!["*".to_string()],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig::default(),
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 20,
                connection_timeout: 10,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_secs: 60 * 60,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig::default(),
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 50,
                connection_timeout: 5,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_secs: 60 * 60,
                cors_origins: Vec::new(),
            },
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            static_dir: PathBuf::from("public"),
        }
    }
}

fn parse<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError>
where
    T::Err: fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        name,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    const BASE: &[(&str, &str)] = &[
        ("DATABASE_URL", "postgres://localhost/orchard"),
        ("JWT_SECRET", "dev-secret"),
    ];

    #[test]
    fn test_default_development_config() {
        let config = load(BASE).unwrap();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.security.jwt_expiry_secs, 3600);
        assert_eq!(config.security.cors_origins, vec!["*"]);
    }

    #[test]
    fn test_env_overrides() {
        let mut pairs = BASE.to_vec();
        pairs.extend([
            ("PORT", "8081"),
            ("JWT_EXPIRY_SECS", "120"),
            ("SECURITY_CORS_ORIGINS", "https://a.example, https://b.example,"),
        ]);
        let config = load(&pairs).unwrap();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.security.jwt_expiry_secs, 120);
        assert_eq!(config.security.cors_origins, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn test_secret_is_required() {
        let err = load(&[("DATABASE_URL", "postgres://localhost/orchard")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));
    }

    #[test]
    fn test_database_url_is_required() {
        let err = load(&[("JWT_SECRET", "x")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn test_production_rejects_short_secret() {
        let mut pairs = BASE.to_vec();
        pairs.push(("APP_ENV", "production"));
        assert!(matches!(load(&pairs).unwrap_err(), ConfigError::Invalid { name: "JWT_SECRET", .. }));

        let long = "0123456789abcdef0123456789abcdef";
        let config = load(&[
            ("APP_ENV", "prod"),
            ("DATABASE_URL", "postgres://db/orchard"),
            ("JWT_SECRET", long),
        ])
        .unwrap();
        assert_eq!(config.database.max_connections, 50);
    }

    #[test]
    fn test_bad_port_is_reported() {
        let mut pairs = BASE.to_vec();
        pairs.push(("PORT", "eighty"));
        assert!(matches!(load(&pairs).unwrap_err(), ConfigError::Invalid { name: "PORT", .. }));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = load(BASE).unwrap();
        let printed = format!("{:?}", config);
        assert!(!printed.contains("dev-secret"));
    }
}
