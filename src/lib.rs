pub mod adapters;
pub mod config;
pub mod der;
pub mod domain;
pub mod pki;
pub mod server;
pub mod telemetry;
