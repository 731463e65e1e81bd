/// Chat service configuration loaded from environment variables.
#[derive(Debug)]
pub struct ChatConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port to listen on (default 3114). Env var: `CHAT_PORT`.
    pub chat_port: u16,
    /// Mailjet API key. Env var: `MJ_APIKEY_PUBLIC`.
    pub mj_api_key: String,
    /// Mailjet API secret. Env var: `MJ_APIKEY_PRIVATE`.
    pub mj_api_secret: String,
    /// Sender address for OTP emails. Env var: `MJ_SENDER_EMAIL`.
    pub mj_sender_email: String,
    /// Sender display name (default "TaskOps"). Env var: `MJ_SENDER_NAME`.
    pub mj_sender_name: String,
}

impl ChatConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            chat_port: std::env::var("CHAT_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3114),
            mj_api_key: std::env::var("MJ_APIKEY_PUBLIC").expect("MJ_APIKEY_PUBLIC"),
            mj_api_secret: std::env::var("MJ_APIKEY_PRIVATE").expect("MJ_APIKEY_PRIVATE"),
            mj_sender_email: std::env::var("MJ_SENDER_EMAIL").expect("MJ_SENDER_EMAIL"),
            mj_sender_name: std::env::var("MJ_SENDER_NAME").unwrap_or_else(|_| "TaskOps".to_owned()),
        }
    }
}
