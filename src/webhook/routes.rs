//! HTTP surface: the webhook endpoint plus liveness routes.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use secrecy::{ExposeSecret, SecretString};
use tower_http::trace::TraceLayer;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::webhook::dispatch::Dispatcher;
use crate::webhook::signature::{self, SIGNATURE_HEADER};
use crate::webhook::types::{WebhookBody, WebhookEvent};

/// Shared state for the webhook routes.
#[derive(Clone)]
pub struct WebhookState {
    pub dispatcher: Dispatcher,
    pub channel_secret: Arc<SecretString>,
}

/// POST /webhook
///
/// Verifies the signature, decodes the batch, and answers only once every
/// event has been handled: 200 on success, 500 if any user's task died.
async fn receive(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let header = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());
    if let Err(e) = signature::verify(state.channel_secret.expose_secret(), header, &body) {
        warn!(error = %e, "Rejected webhook delivery");
        return StatusCode::UNAUTHORIZED;
    }

    let payload = match WebhookBody::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "Undecodable webhook body");
            return StatusCode::BAD_REQUEST;
        }
    };

    let received = payload.events.len();
    let events: Vec<_> = payload
        .events
        .into_iter()
        .filter_map(WebhookEvent::into_event)
        .collect();
    if events.is_empty() {
        debug!(received, "Delivery has no actionable events");
        return StatusCode::OK;
    }

    let delivery_id = Uuid::new_v4();
    let span = info_span!("delivery", %delivery_id);
    match state.dispatcher.dispatch(events).instrument(span).await {
        Ok(summary) => {
            info!(
                %delivery_id,
                received,
                handled = summary.events,
                users = summary.users,
                "Delivery processed"
            );
            StatusCode::OK
        }
        Err(e) => {
            warn!(%delivery_id, error = %e, "Delivery failed, platform will redeliver");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// GET /
async fn root() -> &'static str {
    "get"
}

/// GET /health
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

/// Build the bot's router.
pub fn webhook_routes(state: WebhookState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/webhook", post(receive))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
