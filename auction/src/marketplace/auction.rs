use serde::{Deserialize, Deserializer, Serialize};

use super::bid::SealedBid;
use crate::config::ID_SUFFIX_LEN;
use crate::error::{AuctionError, AuctionResult};
use crate::traits::{RandomSource, TimeProvider};

/// Lifecycle state of an auction.
///
/// `Won` is part of the stored vocabulary but no operation in this crate
/// moves an auction into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuctionStatus {
    /// Open and accepting bids
    #[default]
    Active,
    /// Settled with a winner
    Won,
    /// Closed by its controller; terminal
    Closed,
}

impl AuctionStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Won => "won",
            Self::Closed => "closed",
        }
    }

    /// Whether no operation can move the auction out of this state.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl std::str::FromStr for AuctionStatus {
    type Err = AuctionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "won" => Ok(Self::Won),
            "closed" => Ok(Self::Closed),
            other => Err(AuctionError::Validation(format!(
                "Unknown auction status '{other}'"
            ))),
        }
    }
}

/// An auction as persisted under `auction_{id}`.
///
/// Every mutation rewrites the whole object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionRecord {
    /// Current sealed bid
    pub bid: SealedBid,
    /// Address of the most recent bidder (the creator until someone bids)
    pub bidder: String,
    /// Creation time, unix seconds; never updated
    #[serde(deserialize_with = "lenient_timestamp")]
    pub timestamp: u64,
    #[serde(default, deserialize_with = "status_or_active")]
    pub status: AuctionStatus,
    pub item_name: String,
    pub charity: String,
}

/// `null` and `""` read as active, like a missing key.
fn status_or_active<'de, D>(deserializer: D) -> Result<AuctionStatus, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(AuctionStatus::Active),
        Some(s) if s.is_empty() => Ok(AuctionStatus::Active),
        Some(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
}

/// Accept any JSON number. Negative values clamp to 0, fractions truncate.
fn lenient_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Unsigned(n) => n,
        RawTimestamp::Signed(n) => u64::try_from(n).unwrap_or(0),
        RawTimestamp::Float(f) if f.is_sign_negative() => 0,
        RawTimestamp::Float(f) => f as u64,
    })
}

/// An auction record together with the id it is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auction {
    pub id: String,
    #[serde(flatten)]
    pub record: AuctionRecord,
}

impl Auction {
    pub fn status(&self) -> AuctionStatus {
        self.record.status
    }

    pub fn is_active(&self) -> bool {
        self.record.status == AuctionStatus::Active
    }
}

/// Generate a fresh auction id: `{unix_millis}-{7 base-36 chars}`.
///
/// Uniqueness is probabilistic; two ids colliding would make the second
/// creation overwrite the first record.
pub fn generate_auction_id<T: TimeProvider, R: RandomSource>(time: &T, rng: &R) -> String {
    format!(
        "{}-{}",
        time.now_millis(),
        rng.alphanumeric_suffix(ID_SUFFIX_LEN)
    )
}

/// Fields a user supplies when creating an auction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewAuction {
    pub item_name: String,
    pub charity: String,
    pub starting_bid: String,
}

impl NewAuction {
    pub fn new(
        item_name: impl Into<String>,
        charity: impl Into<String>,
        starting_bid: impl Into<String>,
    ) -> Self {
        Self {
            item_name: item_name.into(),
            charity: charity.into(),
            starting_bid: starting_bid.into(),
        }
    }

    /// Reject a form with any blank field.
    pub fn validate(&self) -> AuctionResult<()> {
        let missing = [&self.item_name, &self.charity, &self.starting_bid]
            .iter()
            .any(|value| value.trim().is_empty());

        if missing {
            return Err(AuctionError::Validation(
                "Please fill all required fields".into(),
            ));
        }
        Ok(())
    }

    /// Build the initial record for this auction.
    pub fn into_record(self, creator: &str, created_at: u64) -> AuctionRecord {
        AuctionRecord {
            bid: SealedBid::seal(&self.starting_bid),
            bidder: creator.to_string(),
            timestamp: created_at,
            status: AuctionStatus::Active,
            item_name: self.item_name,
            charity: self.charity,
        }
    }
}
