use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use crate::auth::jwt::JwtConfig;

/// HTTP-side settings for the progress API. Pipeline tuning (`PROGRESS_*`)
/// lives in `academy_pipeline::PipelineConfig::from_env`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Learner frontends allowed to call the API from a browser.
    pub cors_origins: Vec<String>,
    /// Upper bound on a whole request, completion pipeline included.
    pub request_timeout_secs: u64,
    pub jwt: JwtConfig,
}

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

impl ServerConfig {
    /// Read `HOST`, `PORT`, `CORS_ORIGINS` (comma separated) and
    /// `REQUEST_TIMEOUT_SECS`, plus the JWT settings.
    ///
    /// # Panics
    ///
    /// Panics on a value that does not parse, so a bad deployment fails at
    /// startup.
    pub fn from_env() -> Self {
        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.into());

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.into()),
            port: env_or("PORT", DEFAULT_PORT),
            cors_origins: split_origins(&cors_origins),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            jwt: JwtConfig::from_env(),
        }
    }

    /// Socket address to bind.
    ///
    /// # Panics
    ///
    /// Panics if `host` is not an IP address.
    pub fn bind_addr(&self) -> SocketAddr {
        let ip: IpAddr = self
            .host
            .parse()
            .unwrap_or_else(|e| panic!("HOST must be an IP address, got '{}': {e}", self.host));
        SocketAddr::new(ip, self.port)
    }
}

fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|e| panic!("{key} has an invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
