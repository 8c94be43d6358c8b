//! Environment configuration
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.2.0: Add music month grace and bulk-load limits
//! - 1.1.0: Add reminder interval and owner id
//! - 1.0.0: Initial env-based configuration

use anyhow::{anyhow, Result};
use std::env;
use std::str::FromStr;

pub const DEFAULT_DATABASE_PATH: &str = "birdass.db";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_REMINDER_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_GRACE_DAYS: u32 = 1;
/// Widest grace a music month window accepts
pub const MAX_GRACE_DAYS: u32 = 28;
pub const DEFAULT_MONTH_FILE_MAX_BYTES: u64 = 1024 * 1024;
pub const DEFAULT_MONTH_FILE_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub discord_guild_id: Option<String>,
    pub database_path: String,
    pub log_level: String,
    /// User allowed to load music months and who receives suggestions
    pub owner_id: Option<String>,
    pub reminder_interval_secs: u64,
    pub grace_days: u32,
    pub month_file_max_bytes: u64,
    pub month_file_timeout_secs: u64,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let discord_token = lookup("DISCORD_TOKEN")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow!("DISCORD_TOKEN must be set"))?;

        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let grace_days = parse_or(&lookup, "MUSIC_MONTH_GRACE_DAYS", DEFAULT_GRACE_DAYS)?;
        if grace_days > MAX_GRACE_DAYS {
            return Err(anyhow!(
                "MUSIC_MONTH_GRACE_DAYS must be at most {MAX_GRACE_DAYS}, got {grace_days}"
            ));
        }

        Ok(Config {
            discord_token,
            discord_guild_id: non_empty("DISCORD_GUILD_ID"),
            database_path: non_empty("DATABASE_PATH")
                .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string()),
            log_level: non_empty("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            owner_id: non_empty("OWNER_ID"),
            reminder_interval_secs: parse_or(
                &lookup,
                "REMINDER_INTERVAL_SECS",
                DEFAULT_REMINDER_INTERVAL_SECS,
            )?,
            grace_days,
            month_file_max_bytes: parse_or(
                &lookup,
                "MONTH_FILE_MAX_BYTES",
                DEFAULT_MONTH_FILE_MAX_BYTES,
            )?,
            month_file_timeout_secs: parse_or(
                &lookup,
                "MONTH_FILE_TIMEOUT_SECS",
                DEFAULT_MONTH_FILE_TIMEOUT_SECS,
            )?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{key} has invalid value '{raw}': {e}")),
        _ => Ok(default),
    }
}
