use crate::application::service::DEFAULT_BEST_CLIENTS_LIMIT;
use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings read from an optional TOML file. Every section may be omitted.
///
/// ```toml
/// [storage]
/// db_path = "ledger_db"
///
/// [logging]
/// level = "debug"
/// format = "json"
///
/// [reports]
/// best_clients_limit = 5
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub reports: ReportsConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportsConfig {
    pub best_clients_limit: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            best_clients_limit: DEFAULT_BEST_CLIENTS_LIMIT,
        }
    }
}

impl AppConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            LedgerError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&text)
    }

    fn validate(&self) -> Result<()> {
        if self.reports.best_clients_limit == 0 {
            return Err(LedgerError::Config(
                "reports.best_clients_limit must be at least 1".to_string(),
            ));
        }
        if self.logging.level.trim().is_empty() {
            return Err(LedgerError::Config("logging.level is empty".to_string()));
        }
        Ok(())
    }
}
