//! Application configuration.
//!
//! Read from a TOML file, then adjusted by environment variables:
//!
//! | variable                | effect                                          |
//! |-------------------------|-------------------------------------------------|
//! | `TAX_ESTIMATOR_CONFIG`  | config file used when `--config` is not given   |
//! | `REDIS_URL`             | sets `counter.url`, selects the `redis` backend |
//! | `TAX_ESTIMATOR_LOG`     | replaces `log_level`                            |

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tax_core::counter::{CounterConfig, DEFAULT_COUNTER_KEY};
use tax_core::{DeductionRules, ZeroIncomeDeductions};
use thiserror::Error;
use tracing::{debug, info};

pub const CONFIG_PATH_VAR: &str = "TAX_ESTIMATOR_CONFIG";
pub const REDIS_URL_VAR: &str = "REDIS_URL";
pub const LOG_LEVEL_VAR: &str = "TAX_ESTIMATOR_LOG";
pub const DEFAULT_CONFIG_FILE: &str = "tax-estimator.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {message}")]
    Read { path: String, message: String },

    #[error("invalid config file '{path}': {message}")]
    Parse { path: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CounterSection {
    /// `"none"` or `"redis"`. Inferred from `url` when absent.
    pub backend: Option<String>,
    pub url: Option<String>,
    pub key: String,
}

impl Default for CounterSection {
    fn default() -> Self {
        Self {
            backend: None,
            url: None,
            key: DEFAULT_COUNTER_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub currency_symbol: String,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
    /// Replaces the built-in bracket table.
    pub brackets_file: Option<PathBuf>,
    pub zero_income_deductions: ZeroIncomeDeductions,
    pub counter: CounterSection,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "₦".to_string(),
            log_level: None,
            log_file: None,
            brackets_file: None,
            zero_income_deductions: ZeroIncomeDeductions::default(),
            counter: CounterSection::default(),
        }
    }
}

impl AppConfig {
    /// Loads the configuration using the process environment.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(explicit_path, |name| std::env::var(name).ok())
    }

    /// Loads the configuration with `env` standing in for the process
    /// environment.
    ///
    /// The file is `explicit_path`, else `$TAX_ESTIMATOR_CONFIG`, else
    /// `./tax-estimator.toml` when it exists. With none of them the
    /// defaults are used. A file that was asked for but cannot be read is
    /// an error.
    pub fn load_with<F>(
        explicit_path: Option<&Path>,
        env: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let requested = explicit_path
            .map(Path::to_path_buf)
            .or_else(|| env(CONFIG_PATH_VAR).map(PathBuf::from));

        let mut config = match requested {
            Some(path) => Self::from_file(&path)?,
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::from_file(fallback)?
                } else {
                    debug!("no config file found, using defaults");
                    Self::default()
                }
            }
        };

        config.apply_env_overrides(env);
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let config = Self::parse(&text, &path.display().to_string())?;
        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Self::parse(text, "<inline>")
    }

    fn parse(
        text: &str,
        origin: &str,
    ) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })
    }

    pub fn apply_env_overrides<F>(
        &mut self,
        env: F,
    ) where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = env(REDIS_URL_VAR).filter(|u| !u.trim().is_empty()) {
            debug!("counter url taken from {}", REDIS_URL_VAR);
            self.counter.url = Some(url);
            if self.counter.backend.is_none() {
                self.counter.backend = Some("redis".to_string());
            }
        }

        if let Some(level) = env(LOG_LEVEL_VAR).filter(|l| !l.trim().is_empty()) {
            self.log_level = Some(level);
        }
    }

    /// Counter settings for the store registry. The backend is `redis`
    /// when a URL is known and nothing else was chosen, `none` otherwise.
    pub fn counter_config(&self) -> CounterConfig {
        let backend = match (&self.counter.backend, &self.counter.url) {
            (Some(backend), _) => backend.trim().to_lowercase(),
            (None, Some(_)) => "redis".to_string(),
            (None, None) => "none".to_string(),
        };

        CounterConfig {
            backend,
            connection_string: self.counter.url.clone().unwrap_or_default(),
            key: self.counter.key.clone(),
        }
    }

    pub fn deduction_rules(&self) -> DeductionRules {
        DeductionRules::standard().with_zero_income(self.zero_income_deductions)
    }
}
