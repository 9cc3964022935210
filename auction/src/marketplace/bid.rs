use std::fmt;

use data_encoding::BASE64;
use serde::{Deserialize, Serialize};

/// JSON envelope wrapped inside a sealed bid.
#[derive(Serialize)]
struct BidEnvelope<'a> {
    bid: &'a str,
    encrypted: bool,
}

/// Bid payload as stored in an auction record.
///
/// The format is `"FHE-" + base64(json({"bid": raw, "encrypted": true}))`.
/// Despite the tag this is an encoding, not encryption: anyone reading the
/// record can recover the raw amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SealedBid(String);

impl SealedBid {
    /// Tag that prefixes every sealed bid.
    pub const TAG: &'static str = "FHE";

    /// Wrap a raw bid string.
    pub fn seal(raw: &str) -> Self {
        let envelope = BidEnvelope {
            bid: raw,
            encrypted: true,
        };
        // Serializing a struct of a &str and a bool cannot fail
        let json = serde_json::to_string(&envelope).unwrap_or_default();
        Self(format!("{}-{}", Self::TAG, BASE64.encode(json.as_bytes())))
    }

    /// Whether the payload carries the expected tag.
    pub fn is_tagged(&self) -> bool {
        self.0
            .strip_prefix(Self::TAG)
            .is_some_and(|rest| rest.starts_with('-'))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SealedBid {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for SealedBid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
