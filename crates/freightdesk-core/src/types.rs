// SPDX-License-Identifier: AGPL-3.0
// Freightdesk Core - Settings and application error types

use crate::api::ApiError;
use serde::{Deserialize, Serialize};

/// Environment variable that overrides the stored API base URL
pub const API_URL_ENV: &str = "FREIGHTDESK_API_URL";

/// Application settings (frontend-agnostic)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// Root of the ERP REST API, without a trailing slash
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// TCP connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Read timeout in seconds; detects stalled responses
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,
}

fn default_api_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_read_timeout_secs() -> u64 {
    30
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            connect_timeout_secs: default_connect_timeout_secs(),
            read_timeout_secs: default_read_timeout_secs(),
        }
    }
}

impl AppSettings {
    /// Check that the settings can be used to build an API client
    pub fn validate(&self) -> Result<(), AppError> {
        let url = self.api_base_url.trim();
        if url.is_empty() {
            return Err(AppError::InvalidConfig("API base URL is empty".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AppError::InvalidConfig(format!(
                "API base URL must use http or https: {}",
                url
            )));
        }
        if self.connect_timeout_secs == 0 || self.read_timeout_secs == 0 {
            return Err(AppError::InvalidConfig(
                "Timeouts must be at least one second".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply an explicit base URL override, keeping the rest untouched
    pub fn with_base_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            self.api_base_url = url;
        }
        self.api_base_url = self.api_base_url.trim_end_matches('/').to_string();
        self
    }
}

/// Error types for the application
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("File I/O error: {0}")]
    FileIo(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Runtime error: {0}")]
    Runtime(String),

    #[error("Form session closed")]
    SessionClosed,
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::FileIo(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}
