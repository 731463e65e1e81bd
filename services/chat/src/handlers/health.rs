use axum::extract::State;
use axum::http::StatusCode;
use tracing::warn;

use crate::state::AppState;

/// Handler for `GET /readyz`. Ready means the relational store answers a
/// ping; the ledger and room registry are in-process and always available.
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    match state.db.ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            warn!(error = %e, "database unreachable");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
