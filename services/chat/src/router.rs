use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use taskops_core::health::healthz;
use taskops_core::middleware::request_id_layer;

use crate::handlers::{
    chat::ws_handler,
    completion::{send_completion_otp, verify_completion_otp},
    health::readyz,
    otp::{send_otp, verified_status, verify_otp},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Signup OTP
        .route("/otp/send", post(send_otp))
        .route("/otp/verify", post(verify_otp))
        .route("/otp/verified", get(verified_status))
        // Assignment completion OTP
        .route("/assignments/{id}/completion-otp", post(send_completion_otp))
        .route("/assignments/{id}/verify-otp", post(verify_completion_otp))
        // Realtime chat gateway
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
