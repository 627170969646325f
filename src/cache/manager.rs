use tracing::{debug, warn};

use crate::cache::record::TokenRecord;
use crate::error::AuthError;
use crate::helpers::time::now_millis;
use crate::observability::metrics::{get_metrics, OUTCOME_CACHE_HIT, OUTCOME_ERROR, OUTCOME_REFRESHED};
use crate::provider::client::ProviderClient;
use crate::provider::response::ProviderResponse;
use crate::store::file_store::{FileStore, StoreError};

/// Owns the lifecycle of one application-scoped access token: acquire,
/// persist, validate freshness, serve.
///
/// Constructed once in `main` and shared through server state; there is
/// no module-level token state anywhere.
#[derive(Debug, Clone)]
pub struct TokenCacheManager {
    provider: ProviderClient,
    store: FileStore,
    app_token_base_url: String,
    subject_id: String,
}

impl TokenCacheManager {
    pub fn new(
        provider: ProviderClient,
        store: FileStore,
        app_token_base_url: String,
        subject_id: String,
    ) -> Self {
        Self {
            provider,
            store,
            app_token_base_url,
            subject_id,
        }
    }

    /// Serve a token, preferring the cache.
    ///
    /// With `force_refresh` false, a present, well-formed, unexpired
    /// record is returned without any network call; any cache failure
    /// falls through to acquisition. With `force_refresh` true the cache
    /// is bypassed entirely.
    ///
    /// The read-then-maybe-write sequence is deliberately unlocked:
    /// concurrent callers racing on an expired cache may each contact
    /// the provider and each overwrite the store, last writer wins.
    /// Acceptable for a single-tenant service holding tokens valid for
    /// hours.
    pub async fn get_token(&self, force_refresh: bool) -> Result<TokenRecord, AuthError> {
        let metrics = get_metrics().await;

        if !force_refresh {
            match self.get_cached_token().await {
                Ok(record) => {
                    metrics.token_requests.with_label_values(&[OUTCOME_CACHE_HIT]).inc();
                    return Ok(record);
                }
                Err(err @ (AuthError::CacheNotFound | AuthError::CacheExpired)) => {
                    debug!("cache miss: {}", err);
                }
                Err(err) => {
                    // unreadable or corrupted store, worth surfacing in logs
                    warn!("token cache unusable, refreshing: {}", err);
                }
            }
        }

        let response = self.provider.request_token().await.inspect_err(|_| {
            metrics.token_requests.with_label_values(&[OUTCOME_ERROR]).inc();
        })?;

        let record = self.cache_response(response).await.inspect_err(|_| {
            metrics.token_requests.with_label_values(&[OUTCOME_ERROR]).inc();
        })?;
        metrics.token_requests.with_label_values(&[OUTCOME_REFRESHED]).inc();
        Ok(record)
    }

    /// Stamp and persist a provider response.
    ///
    /// A provider error passes through as `Err` and is never written to
    /// the store. A grant is stamped with the local issuance time,
    /// persisted best-effort (a failed write is logged, the caller still
    /// receives the token), and returned.
    pub async fn cache_response(&self, response: ProviderResponse) -> Result<TokenRecord, AuthError> {
        let grant = match response {
            ProviderResponse::Failure(failure) => return Err(AuthError::Provider(failure)),
            ProviderResponse::Grant(grant) => grant,
        };

        let metrics = get_metrics().await;
        let record = TokenRecord::stamp(grant, &self.app_token_base_url, &self.subject_id);

        match serde_json::to_vec(&record) {
            Ok(bytes) => {
                if let Err(err) = self.store.write(&bytes).await {
                    warn!("cannot write token cache: {}", err);
                    metrics.cache_write_failures.inc();
                }
            }
            Err(err) => {
                warn!("cannot serialize token record: {}", err);
                metrics.cache_write_failures.inc();
            }
        }

        metrics.token_expiry_unix.set(record.expires_date);
        Ok(record)
    }

    /// Read the cached record, failing with a distinguishable cause:
    /// absent, unreadable, malformed, or expired. Keeping the causes
    /// apart serves diagnostics; callers still make a single
    /// use-cache-or-reacquire decision.
    pub async fn get_cached_token(&self) -> Result<TokenRecord, AuthError> {
        let bytes = self.store.read().await.map_err(|err| match err {
            StoreError::NotFound => AuthError::CacheNotFound,
            StoreError::Io(io_err) => AuthError::CacheRead(io_err),
        })?;

        let record: TokenRecord = serde_json::from_slice(&bytes).map_err(AuthError::CacheParse)?;

        if record.is_expired(now_millis()) {
            return Err(AuthError::CacheExpired);
        }
        Ok(record)
    }
}
