//! Dashboard configuration file support.
//!
//! Configuration is read from a TOML file and then overridden by environment
//! variables.
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//!
//! [data]
//! path = "data/data_op_pres.csv"
//! # format = "csv"   # optional, detected from the extension otherwise
//!
//! [columns]
//! sector = "Secteur"
//! department_code = "adm1code"
//! organization_type = "Typedorganisation"
//! observed_at = "date"
//! ```
//!
//! # Environment Variables
//!
//! - `DASHBOARD_CONFIG`: explicit config file path
//! - `DASHBOARD_DATA_PATH`: data file path
//! - `DASHBOARD_DATA_FORMAT`: `csv` or `json`
//! - `HOST`: server host (default: 0.0.0.0)
//! - `PORT`: server port (default: 8080)

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::io::{FileDataSource, SourceFormat};
use crate::models::ColumnMapping;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("No dashboard.toml found in standard locations")]
    NotFound,
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub columns: ColumnMapping,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSettings {
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
    /// `csv` or `json`; detected from the extension when unset
    #[serde(default)]
    pub format: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_data_path() -> PathBuf {
    PathBuf::from("data/data_op_pres.csv")
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            format: None,
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `dashboard.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self, ConfigError> {
        let search_paths = [
            PathBuf::from("dashboard.toml"),
            PathBuf::from("backend/dashboard.toml"),
            PathBuf::from("../dashboard.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                info!(path = %path.display(), "using config file");
                return Self::from_file(&path);
            }
        }

        Err(ConfigError::NotFound)
    }

    /// Resolve the full configuration: `DASHBOARD_CONFIG` or the default
    /// location (falling back to built-in defaults), then env overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match env::var("DASHBOARD_CONFIG") {
            Ok(path) => Self::from_file(path)?,
            Err(_) => match Self::from_default_location() {
                Ok(config) => config,
                Err(ConfigError::NotFound) => {
                    info!("no config file found, using defaults");
                    Self::default()
                }
                Err(e) => return Err(e),
            },
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Override settings from environment variables.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(path) = env::var("DASHBOARD_DATA_PATH") {
            self.data.path = PathBuf::from(path);
        }
        if let Ok(format) = env::var("DASHBOARD_DATA_FORMAT") {
            self.data.format = Some(format);
        }
        if let Ok(host) = env::var("HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT".to_string(),
                value: port.clone(),
                reason: "must be a valid port number".to_string(),
            })?;
        }
        Ok(())
    }

    /// The configured data file as a [`FileDataSource`].
    pub fn data_source(&self) -> Result<FileDataSource, ConfigError> {
        let mut source = FileDataSource::new(self.data.path.clone()).with_mapping(self.columns.clone());
        if let Some(format) = &self.data.format {
            let format: SourceFormat = format.parse().map_err(|_| ConfigError::InvalidValue {
                key: "data.format".to_string(),
                value: format.clone(),
                reason: "must be 'csv' or 'json'".to_string(),
            })?;
            source = source.with_format(format);
        }
        Ok(source)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
