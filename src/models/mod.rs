//! Data Models
//!
//! Configuration and request types shared by the services and the CLI.

pub mod analysis;
pub mod settings;

pub use analysis::*;
pub use settings::*;
