pub mod connection;
pub mod kv;
pub mod migrations;
pub mod snapshot;

pub use connection::*;
