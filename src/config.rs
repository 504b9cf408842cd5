use std::time::Duration;

use anyhow::{Context, Result};

static DEFAULT_API_URL: &str = "http://gdata.youtube.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub struct Config {
    /// Base of the feed API, overridable with `YTSTAT_API_URL`
    pub api_url: String,
    /// Limit on each feed request, `YTSTAT_TIMEOUT_SECS`
    pub timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Config> {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("YTSTAT_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into());

        let timeout_secs = match lookup("YTSTAT_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("Invalid YTSTAT_TIMEOUT_SECS value {:?}", raw))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Config {
            api_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}
