use std::path::Path;

use anyhow::{bail, Result};
use regex::Regex;
use tracing::{debug, error};

use crate::config::settings::{LogFormat, LoggingConfig, ServiceConfig};
use crate::observability::metrics::get_metrics;
use crate::utils::constants::MAX_EXPIRATION_MINUTES;

/// Load and validate config from YAML file
pub async fn file_to_config(path: &Path) -> Result<ServiceConfig> {
    let content = tokio::fs::read_to_string(path).await?;

    let expanded = expand_env_vars(&content);
    parse_config(expanded).await
}

pub async fn parse_config(content: String) -> Result<ServiceConfig> {
    let metrics = get_metrics().await;
    let mut service_config: ServiceConfig = serde_yaml::from_str(&content)
        .inspect_err(|e| {
            error!("parse config error: {}", e);
            metrics.config_parse_failures.inc();
        })?;

    // Apply defaults
    if service_config.settings.logging.is_none() {
        service_config.settings.logging = Some(LoggingConfig {
            level: "info".to_owned(),
            format: LogFormat::Compact,
        });
    }

    debug!("validating config ...");
    validate_service_config(&service_config)?;

    Ok(service_config)
}

fn validate_service_config(config: &ServiceConfig) -> Result<()> {
    if config.settings.server.port.parse::<u16>().is_err() {
        bail!("server.port '{}' is not a valid port", config.settings.server.port);
    }
    if config.settings.server.nonce.is_empty() {
        bail!("server.nonce must not be empty");
    }
    if config.provider.base_url.is_empty() {
        bail!("provider.base_url must not be empty");
    }
    if let Some(minutes) = config.provider.expiration_minutes {
        if minutes == 0 || minutes > MAX_EXPIRATION_MINUTES {
            bail!(
                "provider.expiration_minutes {} outside 1..={}",
                minutes,
                MAX_EXPIRATION_MINUTES
            );
        }
    }
    if config.cache.path.is_empty() {
        bail!("cache.path must not be empty");
    }
    Ok(())
}

fn expand_env_vars(input: &str) -> String {
    let re = Regex::new(r"\$\{(\w+)(?::([^\}]+))?\}").unwrap();
    re.replace_all(input, |caps: &regex::Captures| {
        let var = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        std::env::var(var).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}
