use thiserror::Error;

use crate::provider::response::{error_response, ProviderFailure};

/// Failure kinds of the token cache core.
///
/// The three cache kinds are recovered locally by falling through to a
/// fresh acquisition; provider and transport failures surface to the
/// caller and are never cached.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no cached token")]
    CacheNotFound,

    #[error("cached token is unreadable: {0}")]
    CacheRead(std::io::Error),

    #[error("cached token is not valid JSON: {0}")]
    CacheParse(serde_json::Error),

    #[error("cached token expired")]
    CacheExpired,

    /// The provider answered with an embedded error body despite
    /// transport success. Surfaced verbatim.
    #[error("token endpoint error {}: {}", .0.error.code, .0.error.message)]
    Provider(ProviderFailure),

    #[error("token endpoint unreachable: {0}")]
    Transport(reqwest::Error),
}

impl AuthError {
    /// Normalize into the provider-shaped envelope. Provider errors pass
    /// through unchanged; everything local becomes a code-500 envelope
    /// with the `Invalid server response:` prefix.
    pub fn to_response(&self) -> ProviderFailure {
        match self {
            AuthError::Provider(failure) => failure.clone(),
            other => error_response(500, &other.to_string()),
        }
    }
}
