mod catalog;
mod config;
mod entities;
mod error;
mod filter;
mod request;
mod response;

pub use catalog::*;
pub use config::*;
pub use entities::*;
pub use error::*;
pub use filter::*;
pub use request::*;
pub use response::*;
