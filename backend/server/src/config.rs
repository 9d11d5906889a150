use std::{env, fmt::Display, fs::read_to_string, str::FromStr};

use tracing::{info, warn};

use crate::error::StartupError;

const DEV_SECRET: &str = "dev-secret";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Redis,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown store backend `{other}`")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub store_backend: StoreBackend,
    pub redis_url: String,
    pub jwt_secret: String,
    pub allowed_origin: String,
    pub token_ttl_hours: i64,
}

impl Config {
    pub fn load() -> Result<Self, StartupError> {
        Ok(Self {
            port: try_load("PORT", "5001")?,
            store_backend: try_load("STORE_BACKEND", "redis")?,
            redis_url: try_load("REDIS_URL", "redis://127.0.0.1:6379")?,
            jwt_secret: load_secret("JWT_SECRET"),
            allowed_origin: try_load("ALLOWED_ORIGIN", "http://localhost:3000")?,
            token_ttl_hours: try_load("TOKEN_TTL_HOURS", "24")?,
        })
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, StartupError>
where
    T::Err: Display,
{
    parse_or_default(key, var(key), default)
}

fn parse_or_default<T: FromStr>(
    key: &str,
    value: Option<String>,
    default: &str,
) -> Result<T, StartupError>
where
    T::Err: Display,
{
    let raw = value.unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.trim().parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        StartupError::Config {
            key: key.to_string(),
            reason: e.to_string(),
        }
    })
}

// Environment first, then a mounted secret file, then the development secret.
fn load_secret(secret_name: &str) -> String {
    if let Some(secret) = var(secret_name) {
        return secret;
    }

    let path = format!("/run/secrets/{secret_name}");
    match read_to_string(&path) {
        Ok(secret) if !secret.trim().is_empty() => secret.trim().to_string(),
        _ => {
            warn!("{secret_name} not found in environment or {path}, using development secret");
            DEV_SECRET.to_string()
        }
    }
}
