use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::partition::default_worker_count;

pub const DEFAULT_SEARCH_URL: &str = "https://www.kobo.com/us/en/search?query=";

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct Config {
    pub input_path: PathBuf,
    pub identifier_column: String,
    pub output_path: PathBuf,
    pub workers: usize,
    pub search_url: String,
    pub settle_delay: Duration,
    pub nav_timeout: Duration,
    pub headless: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("isbn13_list.csv"),
            identifier_column: "isbn13".to_string(),
            output_path: PathBuf::from("book_result_data.csv"),
            workers: default_worker_count(),
            search_url: DEFAULT_SEARCH_URL.to_string(),
            settle_delay: Duration::from_millis(1000),
            nav_timeout: Duration::from_secs(30),
            headless: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup, so tests don't have to touch
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let workers = parse_or(&lookup, "SCRAPER_WORKERS", defaults.workers).max(1);
        let settle_ms = parse_or(&lookup, "SETTLE_DELAY_MS", defaults.settle_delay.as_millis() as u64);
        let nav_secs = parse_or(&lookup, "NAV_TIMEOUT_SECS", defaults.nav_timeout.as_secs());

        Self {
            input_path: lookup("ISBN_INPUT").map(PathBuf::from).unwrap_or(defaults.input_path),
            identifier_column: lookup("ISBN_COLUMN").unwrap_or(defaults.identifier_column),
            output_path: lookup("ISBN_OUTPUT").map(PathBuf::from).unwrap_or(defaults.output_path),
            workers,
            search_url: lookup("STOREFRONT_SEARCH_URL").unwrap_or(defaults.search_url),
            settle_delay: Duration::from_millis(settle_ms),
            nav_timeout: Duration::from_secs(nav_secs),
            headless: parse_or(&lookup, "CHROME_HEADLESS", defaults.headless),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy + std::fmt::Debug,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("⚠️ [Config] Ignoring invalid {}={:?}, using {:?}", key, raw, default);
            default
        }),
        None => default,
    }
}
