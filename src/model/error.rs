use thiserror::Error;

/// The standard result type used throughout the application.
pub type StdResult<T> = Result<T, anyhow::Error>;

/// Contact relay error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    /// The submitted form is invalid
    #[error("{0}")]
    Validation(String),

    /// No email provider credentials are configured
    #[error("Email provider is not configured")]
    NotConfigured,

    /// The email provider rejected the credentials
    #[error("Authentication error: {0}")]
    UpstreamAuth(String),

    /// The email provider was reached but returned a failure
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// The email provider could not be reached
    #[error("Transport error: {0}")]
    Transport(String),
}
