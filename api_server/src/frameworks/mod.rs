// Frameworks: process bootstrap, configuration and runtime wiring.

pub mod config;
pub mod server;
