//! Chunk Stream → Domain Event Stream
//!
//! Drives the core pipeline (framer, decoder, classifier) over a transport
//! chunk stream. Decode failures and unclassified records are logged and
//! skipped; only transport errors reach the consumer.

use std::collections::VecDeque;
use std::pin::Pin;

use agentic_studio_core::{classify, decode, DomainEvent, MessageFramer, ProtocolRecord};
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use serde_json::Value;

use crate::services::analysis::TransportError;

/// Turn a chunk stream into a stream of classified domain events.
///
/// The residual partial record is flushed when the chunk stream ends and
/// discarded when it fails. The stream ends after the first error.
pub fn into_event_stream<S>(
    chunks: S,
) -> impl Stream<Item = Result<DomainEvent, TransportError>> + Send
where
    S: Stream<Item = Result<Bytes, TransportError>> + Send + 'static,
{
    let state = EventStreamState {
        inner: Box::pin(chunks),
        framer: MessageFramer::new(),
        pending: VecDeque::new(),
        finished: false,
    };

    futures_util::stream::unfold(state, |mut state| async move {
        loop {
            if let Some(event) = state.pending.pop_front() {
                return Some((Ok(event), state));
            }
            if state.finished {
                return None;
            }

            match state.inner.next().await {
                Some(Ok(chunk)) => {
                    for record in state.framer.feed(&chunk) {
                        state.push_record(&record);
                    }
                }
                Some(Err(e)) => {
                    let dropped = state.framer.pending_len();
                    if dropped > 0 {
                        tracing::debug!(bytes = dropped, "Discarding partial record after transport error");
                    }
                    state.framer.reset();
                    state.finished = true;
                    return Some((Err(e), state));
                }
                None => {
                    if let Some(record) = state.framer.finish() {
                        state.push_record(&record);
                    }
                    state.finished = true;
                }
            }
        }
    })
}

/// Internal state for the event stream adapter.
struct EventStreamState {
    inner: Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>,
    framer: MessageFramer,
    pending: VecDeque<DomainEvent>,
    finished: bool,
}

impl EventStreamState {
    fn push_record(&mut self, record: &ProtocolRecord) {
        if let Some(event) = process_record(record) {
            self.pending.push_back(event);
        }
    }
}

/// Decode and classify one record, logging what gets skipped.
pub fn process_record(record: &ProtocolRecord) -> Option<DomainEvent> {
    let value = match decode(record) {
        Ok(value) => value,
        Err(failure) => {
            tracing::warn!(raw = %failure.raw, reason = %failure.reason, "Skipping malformed record");
            return None;
        }
    };

    let event = classify(&value);
    if event.is_none() {
        tracing::debug!(shape = %describe_shape(&value), "Ignoring unclassified record");
    }
    event
}

fn describe_shape(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let keys: Vec<&str> = map.keys().map(String::as_str).collect();
            format!("keys=[{}]", keys.join(", "))
        }
        Value::Array(_) => "array".to_string(),
        Value::String(_) => "string".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::Bool(_) => "bool".to_string(),
        Value::Null => "null".to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================
