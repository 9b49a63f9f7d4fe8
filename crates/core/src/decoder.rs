//! Record Decoder
//!
//! Strict JSON decoding of a single protocol record.

use serde_json::Value;

use crate::error::DecodeFailure;
use crate::framer::ProtocolRecord;

/// Parse one record as JSON.
///
/// Any valid JSON value is accepted; records that are valid JSON but carry no
/// recognized shape are left for the classifier to ignore. There is no
/// best-effort recovery of malformed text.
pub fn decode(record: &ProtocolRecord) -> Result<Value, DecodeFailure> {
    serde_json::from_str(record.as_str())
        .map_err(|e| DecodeFailure::new(record.as_str(), e.to_string()))
}
