//! Byte encoding of auction records.
//!
//! Records are stored as UTF-8 JSON under `auction_{id}`.

use crate::config::{MAX_VALUE_SIZE, RECORD_KEY_PREFIX};
use crate::error::{AuctionError, AuctionResult};
use crate::marketplace::AuctionRecord;
use crate::util::json_from_limited_slice;

/// Store key of the record for `id`.
pub fn record_key(id: &str) -> String {
    format!("{RECORD_KEY_PREFIX}{id}")
}

pub fn encode(record: &AuctionRecord) -> AuctionResult<Vec<u8>> {
    serde_json::to_vec(record)
        .map_err(|e| AuctionError::Encode(format!("auction record: {e}")))
}

/// Decode a stored record.
///
/// Callers treat an error as "skip this record", never as fatal to a batch.
pub fn decode(data: &[u8]) -> AuctionResult<AuctionRecord> {
    json_from_limited_slice(data, MAX_VALUE_SIZE)
}
