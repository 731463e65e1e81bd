use std::sync::Arc;
use std::time::Duration;

use sea_orm::Database;
use tracing::{debug, info};

use taskops_chat::config::ChatConfig;
use taskops_chat::domain::otp::OtpLedger;
use taskops_chat::domain::rooms::ChatRooms;
use taskops_chat::infra::mail::MailjetMailer;
use taskops_chat::router::build_router;
use taskops_chat::state::AppState;

/// Cadence of the expired-OTP sweep. Hygiene only: verify re-checks expiry.
const OTP_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[tokio::main]
async fn main() {
    taskops_core::tracing::init_tracing();

    let config = ChatConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let mailer = MailjetMailer::new(
        config.mj_api_key,
        config.mj_api_secret,
        config.mj_sender_email,
        config.mj_sender_name,
    );

    let state = AppState {
        db,
        mailer,
        otp: Arc::new(OtpLedger::new()),
        rooms: Arc::new(ChatRooms::new()),
    };

    // Spawn the periodic OTP sweep
    let ledger = Arc::clone(&state.otp);
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(OTP_SWEEP_INTERVAL);
        loop {
            tick.tick().await;
            ledger.purge_expired();
            debug!("purged expired OTP records");
        }
    });

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.chat_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("chat service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
