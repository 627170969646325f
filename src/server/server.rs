use anyhow::Result;
use axum::Router;
use tracing::info;

use crate::cache::manager::TokenCacheManager;
use crate::config::settings::SettingsConfig;
use crate::observability::metrics::get_metrics;
use crate::observability::routes::MetricsState;
use crate::server::routes;

#[derive(Clone)]
pub struct AppState {
    pub manager: TokenCacheManager,
    pub metrics_state: MetricsState,
    /// Expected session value for the /auth nonce check.
    pub nonce: String,
}

impl AppState {
    pub fn new(manager: TokenCacheManager, registry: prometheus::Registry, nonce: String) -> Self {
        Self {
            manager,
            metrics_state: MetricsState::new(registry),
            nonce,
        }
    }
}

/// Start one Axum server carrying the token route and, when enabled,
/// the metrics route.
pub async fn start(settings_config: &SettingsConfig, manager: TokenCacheManager) -> Result<()> {
    let metrics = get_metrics().await;
    let state = AppState::new(
        manager,
        metrics.registry.clone(),
        settings_config.server.nonce.clone(),
    );

    let app = Router::new()
        .merge(routes::router())
        .merge(state.metrics_state.router(&settings_config.metrics))
        .with_state(state);

    let bind_addr = &settings_config.server.host;
    let port = &settings_config.server.port;
    info!("token service listening on {}:{}", bind_addr, port);
    let listener = tokio::net::TcpListener::bind(format!("{}:{}", bind_addr, port)).await?;
    metrics.up.set(1);
    axum::serve(listener, app).await?;

    Ok(())
}
