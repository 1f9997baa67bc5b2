// Runtime configuration
// Read from the environment, optionally seeded from a `.env` file

use std::net::SocketAddr;
use std::str::FromStr;
use thiserror::Error;

const DEV_JWT_SECRET: &str = "dev-secret-key";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Errors raised while reading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value '{value}' for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Credentials of the administrator created at startup if missing
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
}

/// Which dataset to load into an empty database at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedMode {
    Off,
    /// A handful of hand-written dwellings
    Demo,
    /// Synthetic census of every Coahuila municipality
    Bulk,
}

impl FromStr for SeedMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "false" | "0" | "no" | "off" | "none" => Ok(Self::Off),
            "true" | "1" | "yes" | "demo" => Ok(Self::Demo),
            "bulk" | "massive" => Ok(Self::Bulk),
            other => Err(format!(
                "expected one of false, true, demo, bulk; got '{}'",
                other
            )),
        }
    }
}

/// Service configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    /// Connection used by the query assistant; should be a role with SELECT only
    pub assistant_database_url: String,
    pub jwt_secret: String,
    pub bind_addr: SocketAddr,
    pub db_max_connections: u32,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub assistant_row_limit: u32,
    pub assistant_timeout_ms: u64,
    pub bootstrap_admin: Option<BootstrapAdmin>,
    pub seed_mode: SeedMode,
}

impl Config {
    /// Reads configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through an arbitrary variable lookup
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let assistant_database_url = get("ASSISTANT_DATABASE_URL").unwrap_or_else(|| {
            tracing::warn!(
                "ASSISTANT_DATABASE_URL not set, assistant queries will use DATABASE_URL"
            );
            database_url.clone()
        });

        let jwt_secret = get("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set, using development secret");
            DEV_JWT_SECRET.to_string()
        });

        let bootstrap_admin = match (get("ADMIN_USERNAME"), get("ADMIN_PASSWORD")) {
            (Some(username), Some(password)) => Some(BootstrapAdmin { username, password }),
            (None, None) => None,
            _ => {
                return Err(ConfigError::Invalid {
                    key: "ADMIN_USERNAME",
                    value: String::new(),
                    reason: "ADMIN_USERNAME and ADMIN_PASSWORD must be set together".to_string(),
                })
            }
        };

        Ok(Self {
            database_url,
            assistant_database_url,
            jwt_secret,
            bind_addr: parse_or("BIND_ADDR", get("BIND_ADDR"), DEFAULT_BIND_ADDR.parse().ok())?,
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS"), Some(5))?,
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            assistant_row_limit: parse_or(
                "ASSISTANT_ROW_LIMIT",
                get("ASSISTANT_ROW_LIMIT"),
                Some(200),
            )?,
            assistant_timeout_ms: parse_or(
                "ASSISTANT_TIMEOUT_MS",
                get("ASSISTANT_TIMEOUT_MS"),
                Some(5000),
            )?,
            bootstrap_admin,
            seed_mode: parse_or("SEED_DEMO_DATA", get("SEED_DEMO_DATA"), Some(SeedMode::Off))?,
        })
    }

    /// Whether the natural-language assistant can be enabled
    pub fn assistant_enabled(&self) -> bool {
        self.gemini_api_key.is_some()
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: Option<T>) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value,
            reason: e.to_string(),
        }),
        None => default.ok_or(ConfigError::Missing(key)),
    }
}
