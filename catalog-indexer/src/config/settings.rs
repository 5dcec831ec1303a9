//! Indexer settings read from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::converter::DEFAULT_INDEX_ENV;

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Default connection retry interval in seconds.
const DEFAULT_RETRY_INTERVAL_SECS: u64 = 15;

/// Default file resource events are read from.
const DEFAULT_EVENTS_FILE: &str = "events.jsonl";

/// Default supported language codes.
const DEFAULT_SUPPORTED_LANGUAGES: &str = "eng";

const DEFAULT_CONSUMER_BATCH_SIZE: usize = 50;
const DEFAULT_LOADER_BATCH_SIZE: usize = 100;

/// Connection mode for OpenSearch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Fail immediately if connection fails.
    FailFast,
    /// Retry connection until successful.
    Retry,
}

impl ConnectionMode {
    /// Parse a connection mode.
    ///
    /// Valid values: "fail-fast" or "retry" (case-insensitive).
    /// Defaults to "retry" if not set or invalid.
    fn parse(value: Option<&str>) -> Self {
        match value.unwrap_or("retry").to_lowercase().as_str() {
            "fail-fast" | "failfast" | "fail_fast" => Self::FailFast,
            "retry" => Self::Retry,
            _ => {
                warn!("Invalid OPENSEARCH_CONNECTION_MODE, defaulting to 'retry'");
                Self::Retry
            }
        }
    }
}

/// Settings of the indexer binary.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexerSettings {
    pub opensearch_url: String,
    pub connection_mode: ConnectionMode,
    pub retry_interval: Duration,
    /// Prefix of the index names.
    pub index_env: String,
    /// Directory of resource descriptions; the bundled ones when unset.
    pub resource_descriptions_dir: Option<PathBuf>,
    /// Comma-separated supported language codes.
    pub supported_languages: String,
    /// Identifiers of the tenant-local call number types.
    pub local_call_number_types: Vec<String>,
    pub events_file: PathBuf,
    pub consumer_batch_size: usize,
    pub loader_batch_size: usize,
    /// Interval of the language configuration reload; never when unset.
    pub language_refresh_interval: Option<Duration>,
}

impl IndexerSettings {
    /// Read the settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `OPENSEARCH_CONNECTION_MODE`: "fail-fast" or "retry" (default: retry)
    /// - `OPENSEARCH_RETRY_INTERVAL_SECS`: Retry interval in seconds (default: 15)
    /// - `INDEX_ENV`: Index name prefix (default: catalog)
    /// - `RESOURCE_DESCRIPTIONS_DIR`: Directory of `*.json` resource descriptions (default: bundled)
    /// - `SUPPORTED_LANGUAGES`: Comma-separated language codes (default: eng)
    /// - `LOCAL_CALL_NUMBER_TYPES`: Comma-separated local call number type ids (default: none)
    /// - `EVENTS_FILE`: JSON lines file of resource events (default: events.jsonl)
    /// - `CONSUMER_BATCH_SIZE`: Events per batch (default: 50)
    /// - `LOADER_BATCH_SIZE`: Documents per bulk request (default: 100)
    /// - `LANGUAGE_REFRESH_INTERVAL_SECS`: Language reload interval, 0 disables (default: 0)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read the settings through `lookup`, which returns the value of a variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let number = |key: &str| {
            non_empty(key).and_then(|value| match value.trim().parse::<u64>() {
                Ok(number) => Some(number),
                Err(_) => {
                    warn!(variable = key, value = %value, "Ignoring invalid number");
                    None
                }
            })
        };

        Self {
            opensearch_url: non_empty("OPENSEARCH_URL")
                .unwrap_or_else(|| DEFAULT_OPENSEARCH_URL.to_string()),
            connection_mode: ConnectionMode::parse(
                non_empty("OPENSEARCH_CONNECTION_MODE").as_deref(),
            ),
            retry_interval: Duration::from_secs(
                number("OPENSEARCH_RETRY_INTERVAL_SECS").unwrap_or(DEFAULT_RETRY_INTERVAL_SECS),
            ),
            index_env: non_empty("INDEX_ENV").unwrap_or_else(|| DEFAULT_INDEX_ENV.to_string()),
            resource_descriptions_dir: non_empty("RESOURCE_DESCRIPTIONS_DIR").map(PathBuf::from),
            supported_languages: non_empty("SUPPORTED_LANGUAGES")
                .unwrap_or_else(|| DEFAULT_SUPPORTED_LANGUAGES.to_string()),
            local_call_number_types: non_empty("LOCAL_CALL_NUMBER_TYPES")
                .map(|value| {
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|id| !id.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            events_file: non_empty("EVENTS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_EVENTS_FILE)),
            consumer_batch_size: number("CONSUMER_BATCH_SIZE")
                .map_or(DEFAULT_CONSUMER_BATCH_SIZE, |n| n as usize),
            loader_batch_size: number("LOADER_BATCH_SIZE")
                .map_or(DEFAULT_LOADER_BATCH_SIZE, |n| n as usize),
            language_refresh_interval: number("LANGUAGE_REFRESH_INTERVAL_SECS")
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        }
    }
}
