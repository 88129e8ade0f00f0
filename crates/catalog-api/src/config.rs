//! Process configuration read from the environment.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use catalog_cache::cached_repository::{DEFAULT_CARD_TTL, MAX_CARD_TTL};

use crate::error::AppError;

/// Runtime configuration for the API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Interface to bind (`HOST`).
    pub host: String,
    /// Port to bind (`PORT`).
    pub port: u16,
    /// PostgreSQL URL (`DATABASE_URL`); the in-memory store is used when unset.
    pub database_url: Option<String>,
    /// Pool size (`DATABASE_MAX_CONNECTIONS`).
    pub database_max_connections: u32,
    /// Redis URL (`REDIS_URL`); an in-process cache is used when unset.
    pub redis_url: Option<String>,
    /// Card snapshot expiry (`CARD_CACHE_TTL_SECS`).
    pub cache_ttl: Duration,
    /// Kafka bootstrap servers (`KAFKA_BROKERS`).
    pub kafka_brokers: Option<String>,
    /// OTLP collector endpoint (`OTEL_EXPORTER_OTLP_ENDPOINT`).
    pub otlp_endpoint: Option<String>,
}

fn parse<T>(key: &str, raw: Option<String>, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value
            .parse()
            .map_err(|e| AppError::Config(format!("{key} is invalid: {e}"))),
        None => Ok(default),
    }
}

fn cache_ttl(raw: Option<String>) -> Result<Duration, AppError> {
    let secs = parse("CARD_CACHE_TTL_SECS", raw, DEFAULT_CARD_TTL.as_secs())?;
    if secs > MAX_CARD_TTL.as_secs() {
        return Err(AppError::Config(format!(
            "CARD_CACHE_TTL_SECS is invalid: {secs} exceeds the maximum of {}",
            MAX_CARD_TTL.as_secs()
        )));
    }
    Ok(Duration::from_secs(secs))
}

impl Config {
    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a numeric variable does not parse or
    /// `CARD_CACHE_TTL_SECS` exceeds `MAX_CARD_TTL`.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`. Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a numeric variable does not parse or
    /// `CARD_CACHE_TTL_SECS` exceeds `MAX_CARD_TTL`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_owned()),
            port: parse("PORT", get("PORT"), 8080)?,
            database_url: get("DATABASE_URL"),
            database_max_connections: parse(
                "DATABASE_MAX_CONNECTIONS",
                get("DATABASE_MAX_CONNECTIONS"),
                10,
            )?,
            redis_url: get("REDIS_URL"),
            cache_ttl: cache_ttl(get("CARD_CACHE_TTL_SECS"))?,
            kafka_brokers: get("KAFKA_BROKERS"),
            otlp_endpoint: get("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }

    /// Returns the socket address to listen on.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `HOST:PORT` is not a valid address.
    pub fn bind_address(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}
