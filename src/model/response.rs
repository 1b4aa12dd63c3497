use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Repository;

/// The view of a cached repository listing exposed to consumers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSnapshot {
    /// Last successfully fetched repositories, empty before the first success.
    pub(crate) repositories: Arc<Vec<Repository>>,

    /// Whether a fetch is in flight.
    pub(crate) is_loading: bool,

    /// The error of the last fetch, if it failed.
    pub(crate) error: Option<String>,

    /// When the repositories were last fetched successfully.
    pub(crate) last_updated: Option<DateTime<Utc>>,
}

impl SyncSnapshot {
    /// Retrieves the list of repositories.
    pub fn repositories(&self) -> &[Repository] {
        &self.repositories
    }

    /// Whether a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Retrieves the error of the last fetch.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Retrieves the date of the last successful fetch.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }
}

/// Receipt of a message accepted by the email provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailReceipt {
    pub message_id: Option<String>,
}

/// The response of the contact endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "messageId", skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

impl ContactResponse {
    /// Creates a failed `ContactResponse` with the given message.
    pub fn failure(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            message_id: None,
        }
    }
}

/// Where a visit count comes from.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitsSource {
    #[serde(rename = "google-analytics-api")]
    GoogleAnalytics,
    #[serde(rename = "counter")]
    Counter,
    #[serde(rename = "fallback")]
    Fallback,
    #[serde(rename = "error")]
    Error,
}

/// The response of the visits endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VisitsReport {
    pub visits: u64,
    pub source: VisitsSource,
    pub configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
