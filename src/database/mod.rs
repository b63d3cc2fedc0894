mod connection;
mod schema;
mod store;
#[cfg(test)]
mod tests;

pub use connection::Database;
pub use schema::{Record, REGISTERED_RECORDS};
