use dotenv::dotenv;
use overlay_core::domain::DEFAULT_DATA_BASE_URL;
use overlay_core::search::DEFAULT_GEOCODER_URL;
use std::env;
use std::path::PathBuf;

const DEFAULT_LOG_FILE: &str = "overlay-viewer.log";

/// Runtime settings, resolved from the environment after CLI overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_base_url: String,
    pub geocoder_url: String,
    pub log_file: PathBuf,
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_base_url: DEFAULT_DATA_BASE_URL.to_string(),
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            debug: false,
        }
    }
}

/// Loads `.env` and reads the `OVERLAY_*` variables over the defaults.
pub fn init_app_config() -> Config {
    dotenv().ok();
    Config::from_lookup(|key| env::var(key).ok())
}

impl Config {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            data_base_url: non_empty("OVERLAY_DATA_BASE_URL").unwrap_or(defaults.data_base_url),
            geocoder_url: non_empty("OVERLAY_GEOCODER_URL").unwrap_or(defaults.geocoder_url),
            log_file: non_empty("OVERLAY_LOG_FILE").map_or(defaults.log_file, PathBuf::from),
            debug: non_empty("DEBUG").is_some_and(|value| value != "0"),
        }
    }
}
