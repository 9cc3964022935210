//! Utility functions shared across the auction crate.

use crate::error::{AuctionError, AuctionResult};
use serde::de::DeserializeOwned;

/// Deserialize a UTF-8 JSON payload with a size limit to prevent oversized values.
pub fn json_from_limited_slice<T: DeserializeOwned>(
    data: &[u8],
    max_bytes: usize,
) -> AuctionResult<T> {
    if data.len() > max_bytes {
        return Err(AuctionError::Decode(format!(
            "JSON payload too large: {} bytes (max {})",
            data.len(),
            max_bytes
        )));
    }
    let text = std::str::from_utf8(data)
        .map_err(|e| AuctionError::Decode(format!("payload is not UTF-8: {e}")))?;
    serde_json::from_str(text)
        .map_err(|e| AuctionError::Decode(format!("JSON deserialization failed: {e}")))
}
