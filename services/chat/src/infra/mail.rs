use anyhow::{Context as _, anyhow};
use serde_json::json;

use crate::domain::repository::Mailer;
use crate::error::ChatServiceError;

const SEND_ENDPOINT: &str = "https://api.mailjet.com/v3.1/send";

/// Drop tags so the HTML body doubles as the plain-text part.
fn strip_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Mailjet `/v3.1/send` client implementing the [`Mailer`] port.
#[derive(Clone)]
pub struct MailjetMailer {
    client: reqwest::Client,
    api_key: String,
    api_secret: String,
    from_email: String,
    from_name: String,
}

impl MailjetMailer {
    pub fn new(api_key: String, api_secret: String, from_email: String, from_name: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            api_secret,
            from_email,
            from_name,
        }
    }
}

impl Mailer for MailjetMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), ChatServiceError> {
        let payload = json!({
            "Messages": [{
                "From": { "Email": self.from_email, "Name": self.from_name },
                "To": [{ "Email": to }],
                "Subject": subject,
                "TextPart": strip_html(html),
                "HTMLPart": html,
            }]
        });

        let response = self
            .client
            .post(SEND_ENDPOINT)
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .json(&payload)
            .send()
            .await
            .context("send mail request")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatServiceError::Internal(anyhow!(
                "mail provider returned {status}: {body}"
            )));
        }

        let body: serde_json::Value = response.json().await.context("decode mail response")?;
        let message_status = body["Messages"][0]["Status"].as_str();
        if message_status != Some("success") {
            return Err(ChatServiceError::Internal(anyhow!(
                "mail provider rejected message: {body}"
            )));
        }
        Ok(())
    }
}
