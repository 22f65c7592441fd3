use axum::{extract::State, http::StatusCode, Json};

use crate::modules::health::schema::HealthResponse;
use crate::AppState;

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let status = state.db.check_health().await;

    let code = if status.healthy {
        StatusCode::OK
    } else {
        tracing::warn!(message = ?status.message, "MongoDB health check failed");
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = HealthResponse {
        status: if status.healthy { "ok" } else { "unavailable" }.to_string(),
        database: state.db.name().to_string(),
        response_time_ms: status.response_time_ms,
        message: status.message,
    };

    (code, Json(response))
}
