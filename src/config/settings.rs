use serde::Deserialize;
use std::{env, fs};

use crate::utils::constants::{DEFAULT_EXPIRATION_MINUTES, DEFAULT_HTTP_TIMEOUT_MS, DEFAULT_TOKEN_PATH};

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub settings: SettingsConfig,
    pub provider: ProviderConfig,
    pub cache: CacheConfig,
}

/// ================================
/// Global service-wide settings
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct SettingsConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: String,
    /// Expected session value; callers must echo it to get a token.
    pub nonce: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_path")]
    pub path: String,
    #[serde(default)]
    pub is_enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            path: default_metrics_path(),
            is_enabled: false,
        }
    }
}

/// ================================
/// Identity provider
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// e.g. https://www.arcgis.com/sharing/rest
    pub base_url: String,
    #[serde(default = "default_token_path")]
    pub token_path: String,
    pub client_id: CredentialValue,
    pub client_secret: CredentialValue,
    /// Credential owner identifier, stored with the record for
    /// diagnostics only. Not secret material.
    pub subject_id: Option<CredentialValue>,
    /// Requested validity in minutes, 1..=20160.
    pub expiration_minutes: Option<u32>,
    pub timeout_ms: Option<u64>,
}

impl ProviderConfig {
    pub fn token_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.token_path)
    }

    pub fn expiration_minutes(&self) -> u32 {
        self.expiration_minutes.unwrap_or(DEFAULT_EXPIRATION_MINUTES)
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms.unwrap_or(DEFAULT_HTTP_TIMEOUT_MS)
    }
}

/// Credential value sources
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum CredentialValue {
    Literal { value: String },
    FromEnv { from_env: String },
    FromFile { path: String },
}

impl CredentialValue {
    pub fn resolve(&self) -> anyhow::Result<String> {
        match self {
            CredentialValue::Literal { value } => Ok(value.to_owned()),
            CredentialValue::FromEnv { from_env } => env::var(from_env)
                .map_err(|err| anyhow::anyhow!("env var '{}': {}", from_env, err)),
            CredentialValue::FromFile { path } => fs::read_to_string(path)
                .map(|content| content.trim().to_string())
                .map_err(|err| anyhow::anyhow!("credential file '{}': {}", path, err)),
        }
    }
}

/// ================================
/// Token cache store
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    /// Path of the single-record token cache file.
    pub path: String,
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

fn default_token_path() -> String {
    DEFAULT_TOKEN_PATH.to_string()
}
