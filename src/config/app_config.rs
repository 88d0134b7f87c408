use crate::constants::{
    DEFAULT_CLIENT_ORIGIN, DEFAULT_DB_NAME, DEFAULT_GUEST_RETENTION_DAYS,
    DEFAULT_GUEST_SWEEP_INTERVAL_SECS, DEFAULT_MONGODB_URI, MAX_GUEST_RETENTION_DAYS,
};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    MongoDb,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(StoreBackend::MongoDb),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongodb_uri: String,
    pub db_name: String,
    pub jwt_secret: String,
    pub client_origin: String,
    pub store_backend: StoreBackend,
    pub bcrypt_cost: u32,
    /// Zero disables the guest sweep. At most `MAX_GUEST_RETENTION_DAYS`.
    pub guest_retention_days: i64,
    pub guest_sweep_interval_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|secret| !secret.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let guest_retention_days =
            parse_var(&lookup, "GUEST_RETENTION_DAYS", DEFAULT_GUEST_RETENTION_DAYS)?;
        if !(0..=MAX_GUEST_RETENTION_DAYS).contains(&guest_retention_days) {
            return Err(ConfigError::Invalid {
                name: "GUEST_RETENTION_DAYS",
                value: guest_retention_days.to_string(),
            });
        }

        Ok(AppConfig {
            host: lookup("HOST").unwrap_or_else(|| "localhost".to_string()),
            port: parse_var(&lookup, "PORT", 8080)?,
            mongodb_uri: lookup("MONGODB_URI").unwrap_or_else(|| DEFAULT_MONGODB_URI.into()),
            db_name: lookup("DB_NAME").unwrap_or_else(|| DEFAULT_DB_NAME.into()),
            jwt_secret,
            client_origin: lookup("CLIENT_ORIGIN").unwrap_or_else(|| DEFAULT_CLIENT_ORIGIN.into()),
            store_backend: parse_var(&lookup, "STORE_BACKEND", StoreBackend::MongoDb)?,
            bcrypt_cost: parse_var(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            guest_retention_days,
            guest_sweep_interval_secs: parse_var(
                &lookup,
                "GUEST_SWEEP_INTERVAL_SECS",
                DEFAULT_GUEST_SWEEP_INTERVAL_SECS,
            )?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
