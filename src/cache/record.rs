use serde::{Deserialize, Serialize};

use crate::helpers::time::now_millis;
use crate::provider::response::TokenGrant;

/// The one persisted entity: a provider-issued token stamped with its
/// locally computed validity window.
///
/// Serde names stay wire-compatible with the cache file layout the
/// clients of this service already parse.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenRecord {
    pub access_token: String,
    /// Provider-declared validity in seconds at issuance time.
    pub expires_in: i64,
    /// Local clock when the record was created or refreshed, epoch millis.
    #[serde(rename = "issuedDate", default)]
    pub issued_date: i64,
    /// issuedDate + expires_in * 1000. Derived locally, persisted.
    #[serde(rename = "expiresDate")]
    pub expires_date: i64,
    /// Which identity-provider endpoint issued this token. Diagnostic
    /// only, so records written without it still parse.
    #[serde(rename = "appTokenBaseURL", default)]
    pub app_token_base_url: String,
    /// Credential owner, kept for diagnostics only.
    #[serde(rename = "arcgisUserId", default)]
    pub subject_id: String,
}

impl TokenRecord {
    /// Stamp a fresh grant with the local issuance time and the derived
    /// absolute expiry. The provider only declares a relative window; an
    /// absolute timestamp from it is never trusted.
    pub fn stamp(grant: TokenGrant, app_token_base_url: &str, subject_id: &str) -> Self {
        let issued_date = now_millis();
        Self {
            access_token: grant.access_token,
            expires_in: grant.expires_in,
            issued_date,
            expires_date: issued_date + grant.expires_in * 1000,
            app_token_base_url: app_token_base_url.to_owned(),
            subject_id: subject_id.to_owned(),
        }
    }

    /// A record with a non-positive window is never fresh, even though
    /// it is structurally well-formed.
    pub fn is_expired(&self, now_epoch_millis: i64) -> bool {
        self.expires_in <= 0 || now_epoch_millis >= self.expires_date
    }
}
