use std::time::Duration;

use crate::{Error, Result};

pub const DEFAULT_USER_AGENT: &str = concat!("newsdesk/", env!("CARGO_PKG_VERSION"));

/// Runtime knobs for scraping jobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeConfig {
    /// Candidates taken from a listing page when the caller gives no limit
    pub default_limit: usize,
    /// Detail pages fetched at once within one job
    pub concurrency: usize,
    pub fetch_timeout: Duration,
    /// Wall-clock bound for a whole job
    pub job_timeout: Duration,
    /// Extra attempts after a transient fetch failure
    pub fetch_retries: u32,
    pub retry_backoff: Duration,
    pub user_agent: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            concurrency: 4,
            fetch_timeout: Duration::from_secs(15),
            job_timeout: Duration::from_secs(300),
            fetch_retries: 1,
            retry_backoff: Duration::from_millis(500),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ScrapeConfig {
    /// Defaults overridden by `NEWSDESK_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(limit) = parse_var(&lookup, "NEWSDESK_LIMIT")? {
            config.default_limit = limit;
        }
        if let Some(concurrency) = parse_var(&lookup, "NEWSDESK_CONCURRENCY")? {
            config.concurrency = concurrency;
        }
        if let Some(secs) = parse_var(&lookup, "NEWSDESK_FETCH_TIMEOUT_SECS")? {
            config.fetch_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_var(&lookup, "NEWSDESK_JOB_TIMEOUT_SECS")? {
            config.job_timeout = Duration::from_secs(secs);
        }
        if let Some(retries) = parse_var(&lookup, "NEWSDESK_FETCH_RETRIES")? {
            config.fetch_retries = retries;
        }
        if let Some(user_agent) = lookup("NEWSDESK_USER_AGENT").filter(|v| !v.trim().is_empty()) {
            config.user_agent = user_agent;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(Error::Config("concurrency must be at least 1".to_string()));
        }
        if self.fetch_timeout.is_zero() || self.job_timeout.is_zero() {
            return Err(Error::Config("timeouts must be greater than zero".to_string()));
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| Error::Config(format!("{} has an invalid value: {:?}", key, raw))),
    }
}
