use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use log::{error, info, warn};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;

use crate::{ContactConfig, ContactError, ContactMailer, ContactMessage, MailReceipt, StdResult};

/// The production endpoint of the Brevo API.
pub const BREVO_API_ENDPOINT: &str = "https://api.brevo.com";

const AUTHENTICATION_HINT: &str = "Check that the Brevo API key is correct.";

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct BrevoResponse {
    message_id: Option<String>,
    message: Option<String>,
}

/// Relays contact messages through the Brevo transactional email API.
pub struct BrevoMailer {
    client: Client,
    endpoint: String,
    api_key: String,
    config: ContactConfig,
}

impl BrevoMailer {
    /// Creates a new `BrevoMailer` instance with the given API key.
    pub fn try_new(endpoint: &str, api_key: &str, config: ContactConfig) -> StdResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .with_context(|| "Failed to build Brevo HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.trim().to_string(),
            config,
        })
    }

    fn email_body(&self, message: &ContactMessage) -> serde_json::Value {
        let name = escape_html(message.name());
        let email = escape_html(message.email());
        let html_message = escape_html(message.message()).replace('\n', "<br>");
        let sent_at = Utc::now().format("%Y-%m-%d %H:%M UTC");

        json!({
            "sender": {
                "name": self.config.sender_name,
                "email": self.config.sender_email,
            },
            "to": [{
                "email": self.config.recipient_email,
                "name": self.config.recipient_name,
            }],
            "replyTo": {
                "email": message.email(),
                "name": message.name(),
            },
            "subject": format!("New contact message - {}", message.name()),
            "htmlContent": format!(
                "<html><body>\
                 <h1>New contact message</h1>\
                 <p><strong>Name:</strong> {name}</p>\
                 <p><strong>Email:</strong> <a href=\"mailto:{email}\">{email}</a></p>\
                 <h2>Message</h2><p>{html_message}</p>\
                 <p><small>Sent from the portfolio website on {sent_at}.</small></p>\
                 </body></html>"
            ),
            "textContent": format!(
                "New message from your portfolio\n\nName: {}\nEmail: {}\n\nMessage:\n{}\n\n---\nSent from the portfolio website.\n",
                message.name(),
                message.email(),
                message.message()
            ),
        })
    }
}

#[async_trait::async_trait]
impl ContactMailer for BrevoMailer {
    async fn send(&self, message: &ContactMessage) -> Result<MailReceipt, ContactError> {
        let response = self
            .client
            .post(format!("{}/v3/smtp/email", self.endpoint))
            .header("accept", "application/json")
            .header("api-key", &self.api_key)
            .json(&self.email_body(message))
            .send()
            .await
            .map_err(|e| {
                error!("Failed to reach Brevo API: {e}");
                ContactError::Transport(e.to_string())
            })?;
        let status = response.status();
        let body = response.json::<BrevoResponse>().await.unwrap_or_default();

        match status {
            status if status.is_success() => {
                info!("Contact message from {} relayed", message.email());
                Ok(MailReceipt {
                    message_id: body.message_id,
                })
            }
            StatusCode::UNAUTHORIZED => {
                warn!("Brevo API rejected the configured API key");
                Err(ContactError::UpstreamAuth(AUTHENTICATION_HINT.to_string()))
            }
            status => {
                let message = body
                    .message
                    .unwrap_or_else(|| "Failed to send the message".to_string());
                warn!("Brevo API returned {status}: {message}");
                Err(ContactError::Upstream(message))
            }
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }

    escaped
}
