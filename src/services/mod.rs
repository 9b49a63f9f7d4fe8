//! Services
//!
//! Business logic layer: backend transport, stream adaptation, and run
//! orchestration.

pub mod analysis;
pub mod streaming;
