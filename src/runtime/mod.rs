//! Relay runtime: configuration and the HTTP server loop.

mod config;
mod server;

pub use config::RelayConfig;
pub use server::{BoundRelay, RelayServer};
