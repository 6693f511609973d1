// The binary in main.rs drives the terminal; everything it shares with the
// benchmarks and integration tests lives here.

pub mod config;
pub mod engine;
pub mod error;
pub mod generator;
pub mod logging;
pub mod session;
pub mod store;
