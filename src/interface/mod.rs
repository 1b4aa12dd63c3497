mod fetcher;
mod mailer;
mod visits;

pub use fetcher::*;
pub use mailer::*;
pub use visits::*;
