use std::env;
use std::path::PathBuf;

use crate::query::PAGE_SIZE;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Address the HTTP server binds to
    /// Default: 127.0.0.1
    pub host: String,

    /// Port the HTTP server listens on
    /// Default: 8080
    pub port: u16,

    /// JSON catalog to serve instead of the built-in one
    pub catalog_path: Option<PathBuf>,

    /// File backing the saved jobs storage
    /// Default: data/saved_jobs.json
    pub saved_jobs_path: PathBuf,

    /// Records per listing page
    /// Default: 9
    pub page_size: usize,

    /// Maximum payload size for all requests (in bytes)
    /// Default: 10MB (10 * 1024 * 1024)
    pub max_payload_size: usize,

    /// Directory for rolling log files
    /// Default: logs
    pub log_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            catalog_path: None,
            saved_jobs_path: PathBuf::from("data/saved_jobs.json"),
            page_size: PAGE_SIZE,
            max_payload_size: 10 * 1024 * 1024,
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Optional environment variables:
    /// - HOST, PORT: bind address (default: 127.0.0.1:8080)
    /// - CATALOG_PATH: JSON array of jobs (default: built-in catalog)
    /// - SAVED_JOBS_PATH: saved jobs storage file (default: data/saved_jobs.json)
    /// - PAGE_SIZE: records per page (default: 9)
    /// - MAX_PAYLOAD_SIZE: Maximum request payload size in bytes (default: 10485760 = 10MB)
    /// - LOG_DIR: log directory (default: logs)
    ///
    /// Unparsable numeric values fall back to their defaults.
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let defaults = Config::default();

        let host = lookup("HOST")
            .filter(|h| !h.trim().is_empty())
            .unwrap_or(defaults.host);

        let port = parse_or(lookup("PORT"), defaults.port);

        let catalog_path = lookup("CATALOG_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let saved_jobs_path = lookup("SAVED_JOBS_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.saved_jobs_path);

        let page_size = parse_or(lookup("PAGE_SIZE"), defaults.page_size);
        if page_size == 0 {
            return Err("PAGE_SIZE must be greater than zero".to_string());
        }

        let max_payload_size = parse_or(lookup("MAX_PAYLOAD_SIZE"), defaults.max_payload_size);

        let log_dir = lookup("LOG_DIR")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.log_dir);

        Ok(Config {
            host,
            port,
            catalog_path,
            saved_jobs_path,
            page_size,
            max_payload_size,
            log_dir,
        })
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|s| s.trim().parse().ok()).unwrap_or(default)
}
