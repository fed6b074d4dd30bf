//! Shared test utilities.

pub mod fixtures;
pub mod server;

pub use server::TestServer;
