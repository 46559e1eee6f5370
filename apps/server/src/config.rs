use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{bail, Context};

use crate::auth::{decode_secret_key, AuthConfig};

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_PATH: &str = "./db/app.db";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_SESSION_TTL_SECS: u64 = 86_400;
const DEFAULT_TIER_UPSERT_TIMEOUT_MS: u64 = 5_000;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// `None` disables authentication.
    pub auth: Option<AuthConfig>,
    pub fiscal_year_start_month: u32,
    pub tier_upsert_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            db_path: DEFAULT_DB_PATH.to_string(),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            auth: None,
            fiscal_year_start_month: 1,
            tier_upsert_timeout: Duration::from_millis(DEFAULT_TIER_UPSERT_TIMEOUT_MS),
        }
    }
}

impl Config {
    /// Reads the `FT_*` environment (after loading `.env`).
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = env_or("FT_LISTEN_ADDR", DEFAULT_LISTEN_ADDR)
            .parse()
            .context("Invalid FT_LISTEN_ADDR")?;
        let db_path = env_or("FT_DB_PATH", DEFAULT_DB_PATH);
        let cors_allow = parse_origins(&env_or("FT_CORS_ALLOW_ORIGINS", "*"));
        let timeout_ms: u64 = parse_env("FT_REQUEST_TIMEOUT_MS", DEFAULT_REQUEST_TIMEOUT_MS)?;

        let fiscal_year_start_month: u32 = parse_env("FT_FISCAL_YEAR_START_MONTH", 1)?;
        if !(1..=12).contains(&fiscal_year_start_month) {
            bail!(
                "FT_FISCAL_YEAR_START_MONTH must be between 1 and 12, got {}",
                fiscal_year_start_month
            );
        }
        let tier_timeout_ms: u64 =
            parse_env("FT_TIER_UPSERT_TIMEOUT_MS", DEFAULT_TIER_UPSERT_TIMEOUT_MS)?;

        let session_ttl_secs: u64 = parse_env("FT_SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?;
        let auth = match non_empty_env("FT_AUTH_PASSWORD_HASH") {
            Some(password_hash) => {
                let secret = non_empty_env("FT_SECRET_KEY").context(
                    "FT_SECRET_KEY is required when FT_AUTH_PASSWORD_HASH is set",
                )?;
                Some(AuthConfig {
                    password_hash,
                    jwt_secret: decode_secret_key(&secret)?,
                    access_token_ttl: Duration::from_secs(session_ttl_secs),
                })
            }
            None => None,
        };

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            auth,
            fiscal_year_start_month,
            tier_upsert_timeout: Duration::from_millis(tier_timeout_ms),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match non_empty_env(key) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("Invalid {}: '{}'", key, raw)),
        None => Ok(default),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
