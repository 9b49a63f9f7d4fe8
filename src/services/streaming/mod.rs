//! Streaming
//!
//! Adapts raw response chunk streams into domain event streams.

pub mod event_stream;

pub use event_stream::{into_event_stream, process_record};
