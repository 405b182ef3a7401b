//! HTTP routes.
//!
//! - `POST /api/save` - publish a ledger, returns `{"id": ...}`
//! - `GET /api/load/:id` - the published ledger as JSON
//! - `GET /:id` - read-only HTML page for a published ledger
//! - `GET /health` - liveness and counters
//! - `GET /metrics` - Prometheus counters

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use buyin_common::{LedgerState, Result, SnapshotId};

use crate::metrics::MetricsSnapshot;
use crate::render::{render_not_found_page, render_snapshot_page};
use crate::state::AppState;

const SAVE_FAILED: &str = "Failed to save data";
const LOAD_FAILED: &str = "Failed to load data";
const NOT_FOUND: &str = "Data not found";

/// Response to a successful publish.
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveResponse {
    pub id: String,
}

/// Error body returned by the JSON endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Liveness response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub store: String,
    pub snapshots: usize,
    pub capacity: usize,
    #[serde(flatten)]
    pub metrics: MetricsSnapshot,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

/// Create the router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/save", post(save_snapshot))
        .route("/api/load/:id", get(load_snapshot))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/:id", get(view_snapshot))
        .with_state(state)
}

/// Decode and check a publish body.
fn parse_publish_body(body: &[u8]) -> Result<LedgerState> {
    let state: LedgerState = serde_json::from_slice(body)?;
    state.validate()?;
    Ok(state)
}

/// Look up a snapshot, treating malformed identifiers as unknown.
async fn lookup(state: &AppState, id: &str) -> Result<Option<LedgerState>> {
    let id = SnapshotId::new(id);
    if !id.is_valid() {
        return Ok(None);
    }
    state.store.retrieve(&id).await
}

#[instrument(skip(state, body), fields(bytes = body.len()))]
async fn save_snapshot(
    State(state): State<AppState>,
    body: Bytes,
) -> std::result::Result<Json<SaveResponse>, ApiError> {
    let ledger = match parse_publish_body(&body) {
        Ok(ledger) => ledger,
        Err(e) => {
            warn!(error = %e, code = e.error_code(), "Rejected publish request");
            state.metrics.publish_failed();
            return Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, SAVE_FAILED));
        }
    };

    match state.store.publish(ledger).await {
        Ok(id) => {
            state.metrics.published();
            info!(
                snapshot_id = %id,
                link = %state.config.share_link(id.as_str()),
                "Share link generated"
            );
            Ok(Json(SaveResponse { id: id.to_string() }))
        }
        Err(e) => {
            error!(error = %e, store = state.store.name(), "Publish failed");
            state.metrics.publish_failed();
            Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, SAVE_FAILED))
        }
    }
}

#[instrument(skip(state))]
async fn load_snapshot(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> std::result::Result<Json<LedgerState>, ApiError> {
    match lookup(&state, &id).await {
        Ok(Some(ledger)) => {
            state.metrics.retrieved();
            Ok(Json(ledger))
        }
        Ok(None) => {
            state.metrics.not_found();
            Err(api_error(StatusCode::NOT_FOUND, NOT_FOUND))
        }
        Err(e) => {
            error!(error = %e, "Retrieve failed");
            state.metrics.retrieve_failed();
            Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, LOAD_FAILED))
        }
    }
}

#[instrument(skip(state))]
async fn view_snapshot(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match lookup(&state, &id).await {
        Ok(Some(ledger)) => {
            state.metrics.retrieved();
            Html(render_snapshot_page(&ledger)).into_response()
        }
        Ok(None) => {
            state.metrics.not_found();
            (StatusCode::NOT_FOUND, Html(render_not_found_page())).into_response()
        }
        Err(e) => {
            error!(error = %e, "Retrieve failed");
            state.metrics.retrieve_failed();
            (StatusCode::NOT_FOUND, Html(render_not_found_page())).into_response()
        }
    }
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let stats = state.store.stats();
    Json(HealthResponse {
        status: "ok",
        store: state.store.name().to_string(),
        snapshots: stats.entries,
        capacity: stats.capacity,
        metrics: state.metrics.snapshot(),
    })
}

async fn metrics(State(state): State<AppState>) -> String {
    state.metrics.to_prometheus(state.store.stats().entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use buyin_common::{BuyIn, Player, TrackerError};
    use buyin_snapshot::{SnapshotStore, StoreStats};
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct FailingStore;

    #[async_trait]
    impl SnapshotStore for FailingStore {
        fn name(&self) -> &str {
            "failing"
        }

        async fn publish(&self, _state: LedgerState) -> Result<SnapshotId> {
            Err(TrackerError::Storage("disk on fire".to_string()))
        }

        async fn retrieve(&self, _id: &SnapshotId) -> Result<Option<LedgerState>> {
            Err(TrackerError::Storage("disk on fire".to_string()))
        }

        fn stats(&self) -> StoreStats {
            StoreStats {
                entries: 0,
                capacity: 0,
            }
        }
    }

    fn app() -> (Router, AppState) {
        let state = AppState::in_memory(ServerConfig::default());
        (build_router(state.clone()), state)
    }

    fn sample_state() -> LedgerState {
        let mut alice = Player::new("Alice");
        alice.buy_ins.push(BuyIn::new(dec!(50), "Cash"));
        alice.buy_ins.push(BuyIn::new(dec!(20.5), "Venmo"));
        let mut bob = Player::new("Bob");
        bob.buy_ins.push(BuyIn::new(dec!(50), "Cash"));
        LedgerState {
            players: vec![alice, bob],
            initial_buy_in: dec!(50),
            global_buy_in_applied: true,
        }
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    fn post_save(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/save")
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn publish(router: &Router, state: &LedgerState) -> String {
        let body = serde_json::to_vec(state).unwrap();
        let (status, bytes) = send(router.clone(), post_save(body)).await;
        assert_eq!(status, StatusCode::OK);
        let response: SaveResponse = serde_json::from_slice(&bytes).unwrap();
        response.id
    }

    #[tokio::test]
    async fn test_publish_then_load_roundtrip() {
        let (router, _) = app();
        let state = sample_state();

        let id = publish(&router, &state).await;
        let (status, bytes) = send(router, get_request(&format!("/api/load/{}", id))).await;

        assert_eq!(status, StatusCode::OK);
        let loaded: LedgerState = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(loaded, state);
    }

    #[tokio::test]
    async fn test_load_unknown_id() {
        let (router, state) = app();

        let (status, bytes) = send(router, get_request("/api/load/zzzzzz")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error, "Data not found");
        assert_eq!(state.metrics.snapshot().snapshots_not_found, 1);
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_save_failure() {
        let (router, state) = app();

        let (status, bytes) = send(router.clone(), post_save("{not json")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error, "Failed to save data");

        let negative = r#"{"players":[{"name":"A","buyIns":[{"amount":-1,"method":"Cash"}]}]}"#;
        let (status, _) = send(router, post_save(negative)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        assert_eq!(state.metrics.snapshot().publish_failures, 2);
        assert_eq!(state.store.stats().entries, 0);
    }

    #[tokio::test]
    async fn test_storage_failure_is_reported_generically() {
        let state = AppState::new(ServerConfig::default(), Arc::new(FailingStore));
        let router = build_router(state);

        let body = serde_json::to_vec(&sample_state()).unwrap();
        let (status, bytes) = send(router.clone(), post_save(body)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let error: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(error.error, "Failed to save data");

        let (status, bytes) = send(router, get_request("/api/load/abc123")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let error: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(error.error, "Failed to load data");
    }

    #[tokio::test]
    async fn test_read_only_page() {
        let (router, _) = app();
        let id = publish(&router, &sample_state()).await;

        let (status, bytes) = send(router, get_request(&format!("/{}", id))).await;

        assert_eq!(status, StatusCode::OK);
        let html = String::from_utf8(bytes).unwrap();
        assert!(html.contains("Poker Buy-In Tracker (Read-Only)"));
        assert!(html.contains("<span class=\"badge\">Bob</span>"));
        assert!(html.contains("<li>$20.5 - Venmo</li>"));
    }

    #[tokio::test]
    async fn test_oversized_amounts_are_rejected() {
        let (router, state) = app();
        let body = r#"{"players":[{"name":"A","buyIns":[
            {"amount":5e28,"method":"Cash"},{"amount":5e28,"method":"Cash"}]}]}"#;

        let (status, bytes) = send(router, post_save(body)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let error: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(error.error, "Failed to save data");
        assert_eq!(state.store.stats().entries, 0);
    }

    #[tokio::test]
    async fn test_amounts_at_the_limits_load_back_exactly() {
        let (router, _) = app();
        let mut state = sample_state();
        state.players[0].buy_ins[0].amount = dec!(999999999.9999);
        state.players[0].buy_ins[1].amount = dec!(0.0001);

        let id = publish(&router, &state).await;
        let (status, bytes) = send(router, get_request(&format!("/api/load/{}", id))).await;

        assert_eq!(status, StatusCode::OK);
        let loaded: LedgerState = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(loaded, state);
    }

    #[tokio::test]
    async fn test_page_renders_when_totals_saturate() {
        let (router, state) = app();
        let huge = dec!(50000000000000000000000000000);
        let mut alice = Player::new("Alice");
        alice.buy_ins.push(BuyIn::new(huge, "Cash"));
        alice.buy_ins.push(BuyIn::new(huge, "Cash"));
        let ledger = LedgerState {
            players: vec![alice],
            ..Default::default()
        };
        let id = state.store.publish(ledger).await.unwrap();

        let (status, bytes) = send(router, get_request(&format!("/{}", id))).await;

        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(bytes).unwrap().contains("Alice"));
    }

    #[tokio::test]
    async fn test_read_only_page_unknown_id() {
        let (router, _) = app();
        let (status, bytes) = send(router, get_request("/nothere")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(String::from_utf8(bytes).unwrap().contains("could not be found"));
    }

    #[tokio::test]
    async fn test_health_reports_counts() {
        let (router, _) = app();
        publish(&router, &LedgerState::default()).await;

        let (status, bytes) = send(router, get_request("/health")).await;

        assert_eq!(status, StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["store"], "memory");
        assert_eq!(body["snapshots"], 1);
        assert_eq!(body["snapshotsPublished"], 1);
    }

    #[tokio::test]
    async fn test_metrics_endpoint() {
        let (router, _) = app();
        publish(&router, &sample_state()).await;

        let (status, bytes) = send(router, get_request("/metrics")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(bytes)
            .unwrap()
            .contains("buyin_snapshots_stored 1"));
    }
}
