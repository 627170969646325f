// tests/common/mod.rs
pub use axum::Router;
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use std::net::SocketAddr;

use reqwest::Client;
use serde_json::Value;
use tempfile::TempDir;

use crate::cache::manager::TokenCacheManager;
use crate::config::settings::{CredentialValue, ProviderConfig};
use crate::provider::client::ProviderClient;
use crate::store::file_store::FileStore;

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

pub fn provider_config(base_url: &str) -> ProviderConfig {
    ProviderConfig {
        base_url: base_url.to_owned(),
        token_path: "/oauth2/token/".to_owned(),
        client_id: CredentialValue::Literal { value: "test-client".to_owned() },
        client_secret: CredentialValue::Literal { value: "test-secret".to_owned() },
        subject_id: None,
        expiration_minutes: Some(120),
        timeout_ms: Some(2000),
    }
}

/// Manager under test plus handles on its store. The temp dir must stay
/// alive for the duration of the test.
pub struct TestService {
    pub manager: TokenCacheManager,
    pub store: FileStore,
    pub cache_dir: TempDir,
}

pub fn build_service(provider_base_url: &str) -> TestService {
    let cache_dir = tempfile::tempdir().expect("tempdir");
    let store = FileStore::new(cache_dir.path().join("token-cache.json"));
    let provider = ProviderClient::new(&provider_config(provider_base_url)).expect("provider client");
    let manager = TokenCacheManager::new(
        provider,
        store.clone(),
        provider_base_url.to_owned(),
        "test-user".to_owned(),
    );
    TestService { manager, store, cache_dir }
}

/// Use values a real token would never carry.
pub fn good_provider_body() -> Value {
    json!({ "access_token": "1234", "expires_in": 1111 })
}

pub fn error_provider_body(code: i64) -> Value {
    json!({
        "error": {
            "code": code,
            "error": "invalid_client_id",
            "error_description": "Invalid client_id",
            "message": "Invalid client_id",
            "details": []
        }
    })
}
