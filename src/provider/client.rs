use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use crate::config::settings::ProviderConfig;
use crate::error::AuthError;
use crate::observability::metrics::{get_metrics, REASON_DECODE, REASON_PROVIDER, REASON_TRANSPORT};
use crate::provider::response::{error_response, ProviderResponse};
use crate::utils::constants::MAX_EXPIRATION_MINUTES;

/// Identity provider client performing the OAuth2 client-credentials
/// exchange against the configured token endpoint.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    client: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    expiration_minutes: u32,
}

impl ProviderClient {
    /// Resolve credentials and build the HTTP client. Fails early when a
    /// credential source (env var, file) is unavailable.
    pub fn new(cfg: &ProviderConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms()))
            .build()?;

        Ok(Self {
            client,
            token_url: cfg.token_url(),
            client_id: cfg.client_id.resolve()?,
            client_secret: cfg.client_secret.resolve()?,
            // provider rejects anything above its ceiling
            expiration_minutes: cfg.expiration_minutes().min(MAX_EXPIRATION_MINUTES),
        })
    }

    /// Ask the provider for a fresh application token.
    ///
    /// The endpoint answers transport status 200 for both outcomes, so
    /// the body is decoded into `ProviderResponse` and classified there.
    /// Transport failures normalize to a code-500 envelope; neither
    /// outcome is cached here.
    pub async fn request_token(&self) -> Result<ProviderResponse, AuthError> {
        let metrics = get_metrics().await;
        metrics.provider_requests.inc();

        let expiration = self.expiration_minutes.to_string();
        let form = [
            ("f", "json"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "client_credentials"),
            ("expiration", expiration.as_str()),
        ];

        debug!("requesting application token from {}", self.token_url);
        let response = self
            .client
            .post(&self.token_url)
            .form(&form)
            .send()
            .await
            .map_err(|err| {
                warn!("token endpoint unreachable: {}", err);
                metrics.provider_failures.with_label_values(&[REASON_TRANSPORT]).inc();
                AuthError::Transport(err)
            })?;

        let body = response.text().await.map_err(|err| {
            metrics.provider_failures.with_label_values(&[REASON_TRANSPORT]).inc();
            AuthError::Transport(err)
        })?;

        let parsed: ProviderResponse = serde_json::from_str(&body).map_err(|err| {
            warn!("could not parse token endpoint response: {}", err);
            metrics.provider_failures.with_label_values(&[REASON_DECODE]).inc();
            AuthError::Provider(error_response(500, &format!("Unable to process server response: {err}")))
        })?;

        if let ProviderResponse::Failure(failure) = &parsed {
            warn!(
                "token endpoint reported error {}: {}",
                failure.error.code, failure.error.message
            );
            metrics.provider_failures.with_label_values(&[REASON_PROVIDER]).inc();
        }
        Ok(parsed)
    }
}
