use arena_core::database::ports::HealthCheck;
use arena_core::storage::ObjectStorage;
use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::infra::app_state::AppState;

pub async fn ping() -> Json<Value> {
    info!("Ping endpoint called");
    Json(json!({
        "status": "ok",
        "message": "ArenaApp API is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// 503 with the same body when the database does not answer.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let mut health_status = json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "checks": {}
    });

    let mut is_unhealthy = false;
    match state.unit_of_work.health.ping().await {
        Ok(()) => {
            health_status["checks"]["database"] = json!({ "status": "healthy" });
        }
        Err(e) => {
            warn!(error = %e, "Database health check failed");
            health_status["checks"]["database"] = json!({
                "status": "unhealthy",
                "error": "database unreachable"
            });
            is_unhealthy = true;
        }
    }

    health_status["checks"]["storage"] = json!({
        "status": "healthy",
        "backend": state.storage.backend().as_str()
    });
    health_status["checks"]["translation"] = json!({
        "enabled": state.translator().is_enabled()
    });

    if is_unhealthy {
        health_status["status"] = json!("unhealthy");
        (StatusCode::SERVICE_UNAVAILABLE, Json(health_status))
    } else {
        (StatusCode::OK, Json(health_status))
    }
}
