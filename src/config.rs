//! Application-level configuration loading: dataset paths, storage
//! location, and PetScan connectivity.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "RIDDLE_RUSH_CONFIG_PATH";
/// Environment variable forcing the PetScan provider onto the offline dataset.
const OFFLINE_MODE_ENV: &str = "OFFLINE_MODE";

const DEFAULT_CATEGORIES_PATH: &str = "data/categories.json";
const DEFAULT_OFFLINE_ANSWERS_PATH: &str = "data/offline_answers.json";
const DEFAULT_STORAGE_DIR: &str = "data/storage";
const DEFAULT_PETSCAN_BASE_URL: &str = "https://petscan.wmflabs.org";
const DEFAULT_PETSCAN_LANGUAGE: &str = "de";
const DEFAULT_PETSCAN_PROJECT: &str = "wikipedia";
const DEFAULT_PETSCAN_MAX_RESULTS: u32 = 9_999_995;
const DEFAULT_PETSCAN_TIMEOUT_SECS: u64 = 10;

/// Immutable runtime configuration shared across the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path to the category dataset (JSON array of categories).
    pub categories_path: PathBuf,
    /// Path to the offline answer dataset.
    pub offline_answers_path: PathBuf,
    /// Directory the file-backed store writes into.
    pub storage_dir: PathBuf,
    /// When set, the PetScan provider answers from the offline dataset.
    pub offline_mode: bool,
    /// PetScan endpoint settings.
    pub petscan: PetScanConfig,
}

/// Connectivity settings for the PetScan category-search API.
#[derive(Debug, Clone)]
pub struct PetScanConfig {
    /// Endpoint base URL.
    pub base_url: String,
    /// Wiki language the categories live in.
    pub language: String,
    /// Wiki project queried for category members.
    pub project: String,
    /// Result cap passed to the API.
    pub max_results: u32,
    /// Bound on the whole HTTP round trip.
    pub timeout: Duration,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to the
    /// built-in defaults when the file is absent or malformed. The
    /// `OFFLINE_MODE` environment variable overrides the file either way.
    pub fn load() -> Self {
        let path = resolve_config_path();
        let mut config = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    info!(path = %path.display(), "loaded configuration");
                    raw.into()
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        };

        if let Ok(value) = env::var(OFFLINE_MODE_ENV) {
            config.offline_mode = value == "true";
        }

        config
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            categories_path: PathBuf::from(DEFAULT_CATEGORIES_PATH),
            offline_answers_path: PathBuf::from(DEFAULT_OFFLINE_ANSWERS_PATH),
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            offline_mode: false,
            petscan: PetScanConfig::default(),
        }
    }
}

impl Default for PetScanConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PETSCAN_BASE_URL.to_owned(),
            language: DEFAULT_PETSCAN_LANGUAGE.to_owned(),
            project: DEFAULT_PETSCAN_PROJECT.to_owned(),
            max_results: DEFAULT_PETSCAN_MAX_RESULTS,
            timeout: Duration::from_secs(DEFAULT_PETSCAN_TIMEOUT_SECS),
        }
    }
}

/// JSON representation of the configuration file at [`DEFAULT_CONFIG_PATH`].
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    categories_path: Option<String>,
    offline_answers_path: Option<String>,
    storage_dir: Option<String>,
    offline_mode: Option<bool>,
    petscan: Option<RawPetScan>,
}

/// JSON representation of the PetScan section of the configuration file.
#[derive(Debug, Default, Deserialize)]
struct RawPetScan {
    base_url: Option<String>,
    language: Option<String>,
    project: Option<String>,
    max_results: Option<u32>,
    timeout_secs: Option<u64>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = AppConfig::default();
        let petscan = value.petscan.unwrap_or_default();
        Self {
            categories_path: value
                .categories_path
                .map(PathBuf::from)
                .unwrap_or(defaults.categories_path),
            offline_answers_path: value
                .offline_answers_path
                .map(PathBuf::from)
                .unwrap_or(defaults.offline_answers_path),
            storage_dir: value
                .storage_dir
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_dir),
            offline_mode: value.offline_mode.unwrap_or(false),
            petscan: PetScanConfig {
                base_url: petscan
                    .base_url
                    .unwrap_or(defaults.petscan.base_url),
                language: petscan
                    .language
                    .unwrap_or(defaults.petscan.language),
                project: petscan.project.unwrap_or(defaults.petscan.project),
                max_results: petscan
                    .max_results
                    .unwrap_or(defaults.petscan.max_results),
                timeout: petscan
                    .timeout_secs
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.petscan.timeout),
            },
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_config_fills_in_defaults() {
        let raw: RawConfig = serde_json::from_str(r#"{"offline_mode": true}"#).unwrap();
        let config: AppConfig = raw.into();

        assert!(config.offline_mode);
        assert_eq!(config.categories_path, PathBuf::from(DEFAULT_CATEGORIES_PATH));
        assert_eq!(config.petscan.language, DEFAULT_PETSCAN_LANGUAGE);
        assert_eq!(
            config.petscan.timeout,
            Duration::from_secs(DEFAULT_PETSCAN_TIMEOUT_SECS)
        );
    }

    #[test]
    fn petscan_section_overrides_apply() {
        let raw: RawConfig = serde_json::from_str(
            r#"{"petscan": {"base_url": "http://localhost:8123", "timeout_secs": 2}}"#,
        )
        .unwrap();
        let config: AppConfig = raw.into();

        assert_eq!(config.petscan.base_url, "http://localhost:8123");
        assert_eq!(config.petscan.timeout, Duration::from_secs(2));
        assert_eq!(config.petscan.max_results, DEFAULT_PETSCAN_MAX_RESULTS);
    }
}
