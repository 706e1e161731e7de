use axum::{extract::State, response::Json, routing::get, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::registry::EventRegistry;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub pending_events: usize,
    pub uptime_seconds: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<EventRegistry>,
    pub start_time: DateTime<Utc>,
}

pub struct HealthService {
    pub router: Router,
}

impl HealthService {
    pub fn new(registry: Arc<EventRegistry>) -> Self {
        let state = AppState {
            registry,
            start_time: Utc::now(),
        };

        let router = Router::new()
            .route("/health", get(health_check))
            .route("/health/ready", get(readiness_check))
            .route("/health/live", get(liveness_check))
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        Self { router }
    }
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now()
        .signed_duration_since(state.start_time)
        .num_seconds()
        .max(0) as u64;

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        pending_events: state.registry.pending_count(),
        uptime_seconds: uptime,
    })
}

async fn readiness_check() -> Json<&'static str> {
    // The registry lives in memory, so once the process is up it is ready.
    Json("ready")
}

async fn liveness_check() -> Json<&'static str> {
    Json("alive")
}
