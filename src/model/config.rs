use std::time::Duration;

/// Revalidation policy of the repository cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Interval between automatic revalidations.
    pub refresh_interval: Duration,

    /// Window during which repeated requests reuse the last fetch.
    pub dedup_interval: Duration,

    /// Number of retries after a failed fetch.
    pub max_retries: u32,

    /// Fixed delay between retries.
    pub retry_delay: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(300),
            dedup_interval: Duration::from_secs(60),
            max_retries: 3,
            retry_delay: Duration::from_secs(5),
        }
    }
}

/// Addresses used when relaying contact messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactConfig {
    /// The address receiving contact messages.
    pub recipient_email: String,

    pub recipient_name: String,

    /// The verified sender address of the email provider.
    pub sender_email: String,

    pub sender_name: String,
}

impl ContactConfig {
    /// Creates a new `ContactConfig`, the sender defaulting to the recipient.
    pub fn new(recipient_email: &str, sender_email: Option<&str>) -> Self {
        Self {
            recipient_email: recipient_email.to_string(),
            recipient_name: "Portfolio owner".to_string(),
            sender_email: sender_email
                .map(str::trim)
                .filter(|sender| !sender.is_empty())
                .unwrap_or(recipient_email)
                .to_string(),
            sender_name: "Portfolio Web".to_string(),
        }
    }
}
