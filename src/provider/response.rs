//! Wire shapes of the OAuth2 token endpoint.
//!
//! The provider answers transport status 200 for both outcomes; only the
//! presence of an `error` member in the body distinguishes failure from
//! success. Decoding happens once, here, so the rest of the service only
//! ever sees a proper success-or-error sum type.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::constants::INVALID_SERVER_RESPONSE;

/// Successful token issuance body.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    /// Provider-declared validity window in seconds, relative to issuance.
    pub expires_in: i64,
}

/// Error payload embedded in a transport-successful response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderErrorBody {
    pub code: i64,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub error_description: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub details: Vec<Value>,
}

/// Full error envelope as it appears on the wire: `{ "error": { ... } }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderFailure {
    pub error: ProviderErrorBody,
}

/// Token endpoint response, discriminated by the presence of the `error`
/// member rather than by HTTP status.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ProviderResponse {
    Failure(ProviderFailure),
    Grant(TokenGrant),
}

impl ProviderResponse {
    pub fn is_error(&self) -> bool {
        matches!(self, ProviderResponse::Failure(_))
    }
}

/// Format a locally detected failure so it looks the same as a provider
/// error. Clients then handle one consistent envelope for local and
/// remote faults alike.
pub fn error_response(code: i64, message: &str) -> ProviderFailure {
    let text = format!("Invalid server response: {message}");
    ProviderFailure {
        error: ProviderErrorBody {
            code,
            error: INVALID_SERVER_RESPONSE.to_owned(),
            error_description: text.clone(),
            message: text,
            details: Vec::new(),
        },
    }
}
