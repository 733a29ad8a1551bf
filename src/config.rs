use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use dotenvy::dotenv;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    /// JSON file holding every requester's approved leaves.
    pub ledger_path: PathBuf,
    /// Optional accounting export with per-category usage; zero usage when unset.
    pub usage_path: Option<PathBuf>,
    pub api_prefix: String,
    pub log_dir: String,

    // Requests are handled one at a time unless raised.
    pub workers: usize,

    // Rate limiting
    pub rate_actions_per_min: u32,
}

fn var_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:5055".to_string()),
            ledger_path: env::var("LEDGER_PATH")
                .unwrap_or_else(|_| "leaves.json".to_string())
                .into(),
            usage_path: env::var("USAGE_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            workers: var_or("WORKERS", 1)?,
            rate_actions_per_min: var_or("RATE_ACTIONS_PER_MIN", 600)?,
        })
    }
}
