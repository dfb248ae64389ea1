use std::{env, fmt::Display, str::FromStr};

use crate::errors::AppError;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000";
const DEFAULT_RATE_LIMIT_PER_MINUTE: u32 = 300;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Without a database URL ratings live in memory only.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub allowed_origins: Vec<String>,
    pub rate_limit_per_minute: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: None,
            database_max_connections: DEFAULT_MAX_CONNECTIONS,
            allowed_origins: split_origins(DEFAULT_ALLOWED_ORIGINS),
            rate_limit_per_minute: DEFAULT_RATE_LIMIT_PER_MINUTE,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        let rate_limit_per_minute = try_load("RATE_LIMIT_PER_MINUTE", DEFAULT_RATE_LIMIT_PER_MINUTE)?;
        if rate_limit_per_minute == 0 {
            return Err(AppError::EnvError(
                "RATE_LIMIT_PER_MINUTE must be greater than zero".into(),
            ));
        }

        Ok(Self {
            port: try_load("PORT", DEFAULT_PORT)?,
            database_url: var("DATABASE_URL"),
            database_max_connections: try_load(
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_MAX_CONNECTIONS,
            )?,
            allowed_origins: split_origins(
                &var("ALLOWED_ORIGINS").unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string()),
            ),
            rate_limit_per_minute,
        })
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn try_load<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match var(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e| AppError::EnvError(format!("Invalid {key} value '{value}': {e}"))),
        None => {
            tracing::info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

fn split_origins(origins: &str) -> Vec<String> {
    origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
