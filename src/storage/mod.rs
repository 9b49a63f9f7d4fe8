//! Storage Layer
//!
//! Persistent configuration.

pub mod config;

pub use config::ConfigService;
