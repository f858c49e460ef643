use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::data_loader::DataSource;

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_LOG_FILE: &str = "f1_catalog.log";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
const DEFAULT_TICK_MS: u64 = 250;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub source: DataSource,
    pub log_file: PathBuf,
    pub tick_rate: Duration,
}

impl CatalogConfig {
    /// Reads `CATALOG_*` variables from the process environment. Call after
    /// `.env` files have been loaded.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|val| !val.trim().is_empty());

        let timeout = Duration::from_secs(
            non_empty("CATALOG_HTTP_TIMEOUT_SECS")
                .and_then(|val| val.trim().parse::<u64>().ok())
                .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS)
                .max(1),
        );
        let source = match non_empty("CATALOG_DATA_URL") {
            Some(base_url) => DataSource::Http {
                base_url: base_url.trim().to_string(),
                timeout,
            },
            None => DataSource::Dir(PathBuf::from(
                non_empty("CATALOG_DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()),
            )),
        };
        let log_file = PathBuf::from(
            non_empty("CATALOG_LOG_FILE").unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()),
        );
        let tick_rate = Duration::from_millis(
            non_empty("CATALOG_TICK_MS")
                .and_then(|val| val.trim().parse::<u64>().ok())
                .unwrap_or(DEFAULT_TICK_MS)
                .max(50),
        );

        Self {
            source,
            log_file,
            tick_rate,
        }
    }
}
