use std::str::FromStr;

use anyhow::{Context, Result};

use crate::reminders::settings::{
    DEFAULT_ABSENCE_THRESHOLD_DAYS, DEFAULT_EXPIRY_WINDOW_DAYS, DEFAULT_UTC_OFFSET_HOURS,
};
use crate::reminders::ReminderSettings;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or reminder
/// parameters are out of range.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    pub reminders: ReminderSettings,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let reminders = ReminderSettings::new(
            env_or("UTC_OFFSET_HOURS", DEFAULT_UTC_OFFSET_HOURS)?,
            env_or("ABSENCE_THRESHOLD_DAYS", DEFAULT_ABSENCE_THRESHOLD_DAYS)?,
            env_or("EXPIRY_WINDOW_DAYS", DEFAULT_EXPIRY_WINDOW_DAYS)?,
        )?;

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port: env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            reminders,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'"))
}
