use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. When unset the server runs on the in-memory store.
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub cors_extra_origins: Vec<String>,

    pub jwt_secret: String,
    pub jwt_ttl_secs: i64,

    pub production: bool,
    pub request_timeout_secs: u64,

    pub auth_rate_limit_max: u32,
    pub auth_rate_limit_window_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: parse_var("PORT", 8080)?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            cors_extra_origins: env::var("CORS_EXTRA_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),

            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_ttl_secs: parse_var("JWT_TTL_SECS", 86_400)?,

            production: env::var("APP_ENV")
                .map(|v| v.eq_ignore_ascii_case("production"))
                .unwrap_or(false),
            request_timeout_secs: parse_var("REQUEST_TIMEOUT_SECS", 30)?,

            auth_rate_limit_max: parse_var("AUTH_RATE_LIMIT_MAX", 5)?,
            auth_rate_limit_window_secs: parse_var("AUTH_RATE_LIMIT_WINDOW_SECS", 60)?,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_var<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a number")),
        Err(_) => Ok(default),
    }
}
