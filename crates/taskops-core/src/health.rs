use axum::http::StatusCode;

/// Handler for `GET /healthz`, the liveness check. Readiness is
/// service-specific and lives with each service's handlers.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}
