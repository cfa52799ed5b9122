use std::{env, path::PathBuf, time::Duration};

use anyhow::Context;
use common::aging::DEFAULT_SIGNATURE;
use dotenv::dotenv;

use crate::security::DEFAULT_ORIGIN;

const TWELVE_HOURS: u64 = 12 * 60 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    // Server configuration
    pub server_host: String,
    pub server_port: u16,
    pub allowed_origins: Vec<String>,

    // Customer document
    pub store_path: PathBuf,

    // Aging job
    pub aging_enabled: bool,
    pub aging_interval: Duration,
    pub reminder_signature: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, falling back to defaults for
    /// missing keys.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let server_host = var("SERVER_HOST", "0.0.0.0");
        let server_port = var("SERVER_PORT", "3000")
            .parse::<u16>()
            .context("SERVER_PORT must be a valid port number")?;

        let allowed_origins = var("ALLOWED_ORIGINS", DEFAULT_ORIGIN)
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let store_path = PathBuf::from(var("STORE_PATH", "users.json"));

        let aging_enabled = var("AGING_ENABLED", "true")
            .parse::<bool>()
            .context("AGING_ENABLED must be true or false")?;

        let aging_interval = var("AGING_INTERVAL_SECS", &TWELVE_HOURS.to_string())
            .parse::<u64>()
            .context("AGING_INTERVAL_SECS must be a valid number of seconds")?;
        anyhow::ensure!(aging_interval > 0, "AGING_INTERVAL_SECS must be positive");

        let reminder_signature = var("REMINDER_SIGNATURE", DEFAULT_SIGNATURE);

        Ok(Config {
            server_host,
            server_port,
            allowed_origins,
            store_path,
            aging_enabled,
            aging_interval: Duration::from_secs(aging_interval),
            reminder_signature,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
