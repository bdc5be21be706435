//! Service configuration.
//!
//! Every value has a built-in default; environment variables override them.
//! Values that fail to parse fall back to the default.

use std::str::FromStr;

/// Top-level configuration for a service process.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Service name, used in logs.
    pub service: String,

    /// Address the HTTP listener binds to.
    pub host: String,

    /// Port the HTTP listener binds to.
    pub port: u16,

    /// Target database settings.
    pub database: DatabaseConfig,
}

/// MySQL connection and pool settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,

    /// Upper bound on physical connections held by the pool.
    pub max_connections: u32,

    /// How long a request waits for a free connection before failing.
    pub acquire_timeout_secs: u64,

    /// Render integers beyond JavaScript's exact range as strings.
    pub support_big_numbers: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: "root".to_string(),
            name: "test".to_string(),
            max_connections: 10,
            acquire_timeout_secs: 30,
            support_big_numbers: true,
        }
    }
}

impl DatabaseConfig {
    /// Connection target without credentials, safe to log.
    pub fn display_target(&self) -> String {
        format!("{}@{}:{}/{}", self.user, self.host, self.port, self.name)
    }
}

impl AppConfig {
    /// Loads configuration for the named service from the process environment.
    pub fn load_with_service(service: &str) -> Self {
        Self::from_lookup(service, |key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(service: &str, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = DatabaseConfig::default();
        let database = DatabaseConfig {
            host: lookup("DB_HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "DB_PORT", defaults.port),
            user: lookup("DB_USER").unwrap_or(defaults.user),
            password: lookup("DB_PASSWORD").unwrap_or(defaults.password),
            name: lookup("DB_NAME").unwrap_or(defaults.name),
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", defaults.max_connections),
            acquire_timeout_secs: parse_or(
                &lookup,
                "DB_ACQUIRE_TIMEOUT_SECS",
                defaults.acquire_timeout_secs,
            ),
            support_big_numbers: parse_or(
                &lookup,
                "DB_SUPPORT_BIG_NUMBERS",
                defaults.support_big_numbers,
            ),
        };

        Self {
            service: service.to_string(),
            host: lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "SERVER_PORT", 3000),
            database,
        }
    }

    /// `host:port` for the HTTP listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
