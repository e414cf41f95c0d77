use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use extractor_engine::BackendSettings;
use extractor_logging::{ext_info, LogSettings};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("invalid backend url '{url}': {source}")]
    InvalidBaseUrl { url: String, source: url::ParseError },
    #[error("could not serialize configuration: {0}")]
    Serialize(#[from] ron::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Root of the backend; endpoint paths are resolved against it.
    pub base_url: String,
    pub connect_timeout_secs: u64,
    pub log: LogSettings,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_secs: 10,
            log: LogSettings::default(),
        }
    }
}

impl ClientConfig {
    pub fn backend_settings(&self) -> Result<BackendSettings, ConfigError> {
        let mut raw = self.base_url.trim().to_string();
        // Url::join drops the last path segment unless it ends with a slash.
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base_url = Url::parse(&raw).map_err(|source| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            source,
        })?;

        Ok(BackendSettings {
            base_url,
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        })
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::new();
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }
}

/// Reads the configuration file, or returns defaults when no path is given.
pub fn load(path: Option<&Path>) -> Result<ClientConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(ClientConfig::default());
    };

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    ext_info!("Loaded configuration from {:?}", path);
    Ok(config)
}
