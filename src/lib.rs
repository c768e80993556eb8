pub mod board;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod session;
pub mod store;

#[cfg(test)]
mod testing;
