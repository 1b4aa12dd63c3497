mod cache_sync;
mod counter_memory;
mod counter_postgresql;
mod fetcher_rest;
mod fetcher_retrier;
mod mailer_brevo;
mod sync_driver;
mod visits_google_analytics;
mod visits_reporter;

pub use cache_sync::*;
pub use counter_memory::*;
pub use counter_postgresql::*;
pub use fetcher_rest::*;
pub use fetcher_retrier::*;
pub use mailer_brevo::*;
pub use sync_driver::*;
pub use visits_google_analytics::*;
pub use visits_reporter::*;
