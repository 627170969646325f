use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::observability::metrics::get_metrics;
use crate::provider::response::error_response;
use crate::server::server::AppState;

/// Body of a token request from a client app.
#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    #[serde(default)]
    pub nonce: Option<String>,
    /// "1", 1 or true bypass the cache and force a provider call.
    #[serde(default)]
    pub force: Option<Value>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/auth", post(issue_token))
}

/// Hand out the application token.
///
/// Wire contract of the upstream provider is preserved deliberately:
/// the route always answers transport status 200 and failures are
/// carried as the error envelope in the body, so clients parse exactly
/// one shape for local and remote faults.
async fn issue_token(State(state): State<AppState>, Json(request): Json<AuthRequest>) -> Response {
    let metrics = get_metrics().await;

    if request.nonce.as_deref() != Some(state.nonce.as_str()) {
        // reject before touching the cache or the provider
        warn!("unauthorized token request rejected");
        metrics.unauthorized_requests.inc();
        return Json(error_response(403, "Unauthorized.")).into_response();
    }

    let force_refresh = flag_is_set(request.force.as_ref());
    match state.manager.get_token(force_refresh).await {
        Ok(record) => {
            info!("issuing application token, expires at {}", record.expires_date);
            Json(record).into_response()
        }
        Err(err) => Json(err.to_response()).into_response(),
    }
}

fn flag_is_set(value: Option<&Value>) -> bool {
    match value {
        Some(Value::String(s)) => s == "1",
        Some(Value::Number(n)) => n.as_i64() == Some(1),
        Some(Value::Bool(b)) => *b,
        _ => false,
    }
}
