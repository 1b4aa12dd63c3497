//! Backend of a personal portfolio site: a cached listing of GitHub repositories, a contact form
//! relay and a visit counter, served over a JSON HTTP API.

mod infrastructure;
mod interface;
mod model;
mod server;
#[cfg(test)]
mod test_utils;

pub use infrastructure::*;
pub use interface::*;
pub use model::*;
pub use server::*;
