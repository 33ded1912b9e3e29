use std::env;
use std::path::PathBuf;

use thiserror::Error;

use crate::services::data_loader::SourceFiles;
use crate::services::metrics_calculator::MetricsStrategy;

/// Errors raised while reading configuration from the environment
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT must be a valid u16, got '{0}'")]
    InvalidPort(String),

    #[error("METRICS_STRATEGY must be 'aggregated' or 'transactions', got '{0}'")]
    InvalidStrategy(String),
}

/// Application configuration parsed from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub accounts_file: String,
    pub transactions_file: String,
    pub metrics_strategy: MetricsStrategy,
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let raw_port = env::var("PORT").unwrap_or_else(|_| "8000".to_string());
        let port: u16 = raw_port
            .parse()
            .map_err(|_| ConfigError::InvalidPort(raw_port.clone()))?;

        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));

        let accounts_file =
            env::var("ACCOUNTS_FILE").unwrap_or_else(|_| "chart-of-accounts.csv".to_string());

        let transactions_file =
            env::var("TRANSACTIONS_FILE").unwrap_or_else(|_| "bookings.csv".to_string());

        let metrics_strategy = match env::var("METRICS_STRATEGY") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidStrategy(raw.clone()))?,
            Err(_) => MetricsStrategy::default(),
        };

        let log_file = env::var("LOG_FILE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Ok(Config {
            host,
            port,
            data_dir,
            accounts_file,
            transactions_file,
            metrics_strategy,
            log_file,
        })
    }

    /// Full paths of the two ledger files under `data_dir`
    pub fn source_files(&self) -> SourceFiles {
        SourceFiles {
            accounts: self.data_dir.join(&self.accounts_file),
            transactions: self.data_dir.join(&self.transactions_file),
        }
    }
}
