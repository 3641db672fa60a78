//! Runtime configuration
//!
//! Built by the binary from command-line flags and environment variables; the
//! library only consumes the resolved values.

use crate::game::WeekStart;
use std::path::PathBuf;

/// Where the hosted backend lives and the public key used to call it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub url: String,
    pub api_key: String,
}

impl BackendConfig {
    /// The backend is configured only when both the URL and the key are non-empty.
    pub fn from_parts(url: Option<String>, api_key: Option<String>) -> Option<Self> {
        let url = url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())?;
        let api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())?;
        Some(Self { url, api_key })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Local TOML store (the offline mirror)
    pub data_file: PathBuf,
    pub backend: Option<BackendConfig>,
    pub week_start: WeekStart,
    /// Start with the remote path disabled
    pub offline: bool,
}

impl Config {
    /// Local-only configuration with default settings
    pub fn local(data_file: impl Into<PathBuf>) -> Self {
        Self {
            data_file: data_file.into(),
            backend: None,
            week_start: WeekStart::default(),
            offline: false,
        }
    }
}
