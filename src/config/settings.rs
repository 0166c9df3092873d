//! Application settings loaded from the environment.
//!
//! All values are read once at startup into [`AppConfig`]. Required values that
//! are missing or malformed abort startup with [`Error::Config`]; there is no
//! fallback signing secret.

use crate::errors::{Error, Result};
use secrecy::{ExposeSecret, SecretString};
use std::{fmt::Display, net::SocketAddr, str::FromStr, time::Duration};
use tracing::info;

/// Minimum accepted length of `JWT_SECRET`, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_SESSION_TTL_HOURS: u64 = 7 * 24;
const DEFAULT_DB_TIMEOUT_SECS: u64 = 5;

/// Validated runtime configuration.
#[derive(Debug)]
pub struct AppConfig {
    /// Secret used to sign and verify session tokens
    pub jwt_secret: SecretString,
    /// Record store location, including any access credential
    pub database_url: SecretString,
    /// Address the HTTP server listens on
    pub bind_addr: SocketAddr,
    /// How long an issued session stays valid
    pub session_ttl: Duration,
    /// Whether the session cookie carries the `Secure` attribute
    pub cookie_secure: bool,
    /// Upper bound for connecting to and acquiring a storage connection
    pub db_timeout: Duration,
    /// Optional roster file provisioned at startup
    pub roster_path: Option<String>,
}

impl AppConfig {
    /// Loads configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    ///
    /// Blank values are treated as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = get("JWT_SECRET").ok_or_else(|| missing("JWT_SECRET"))?;
        if jwt_secret.len() < MIN_SECRET_LEN {
            return Err(Error::Config {
                message: format!("JWT_SECRET must be at least {MIN_SECRET_LEN} bytes long"),
            });
        }

        let database_url = get("DATABASE_URL").ok_or_else(|| missing("DATABASE_URL"))?;

        let bind_addr = parse_or("BIND_ADDR", get("BIND_ADDR"), DEFAULT_BIND_ADDR)?;
        let ttl_hours: u64 = parse_or(
            "SESSION_TTL_HOURS",
            get("SESSION_TTL_HOURS"),
            &DEFAULT_SESSION_TTL_HOURS.to_string(),
        )?;
        if ttl_hours == 0 {
            return Err(Error::Config {
                message: "SESSION_TTL_HOURS must be greater than zero".to_string(),
            });
        }
        let cookie_secure = parse_or("COOKIE_SECURE", get("COOKIE_SECURE"), "true")?;
        let db_timeout_secs: u64 = parse_or(
            "DB_TIMEOUT_SECS",
            get("DB_TIMEOUT_SECS"),
            &DEFAULT_DB_TIMEOUT_SECS.to_string(),
        )?;

        Ok(Self {
            jwt_secret: SecretString::from(jwt_secret),
            database_url: SecretString::from(database_url),
            bind_addr,
            session_ttl: Duration::from_secs(ttl_hours * 60 * 60),
            cookie_secure,
            db_timeout: Duration::from_secs(db_timeout_secs),
            roster_path: get("ROSTER_PATH"),
        })
    }

    /// Database URL for handing to the connector.
    #[must_use]
    pub fn database_url(&self) -> &str {
        self.database_url.expose_secret()
    }
}

fn missing(key: &str) -> Error {
    Error::Config {
        message: format!("{key} must be set"),
    }
}

fn parse_or<T>(key: &str, value: Option<String>, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = value.unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    raw.trim().parse().map_err(|e| Error::Config {
        message: format!("Invalid {key} value '{raw}': {e}"),
    })
}
