use crate::{ContactError, ContactMessage, MailReceipt};

/// A trait for relaying contact messages to an email provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ContactMailer: Sync + Send {
    /// Sends the contact message.
    async fn send(&self, message: &ContactMessage) -> Result<MailReceipt, ContactError>;
}
