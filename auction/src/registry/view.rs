//! Filtering and summary helpers over a loaded auction list.

use serde::{Deserialize, Serialize};

use crate::marketplace::{Auction, AuctionStatus};
use crate::wallet::addresses_match;

/// Status constraint for `AuctionFilter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatusFilter {
    #[default]
    All,
    Only(AuctionStatus),
}

impl StatusFilter {
    fn accepts(self, status: AuctionStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }
}

/// Search and status filter applied to the displayed list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuctionFilter {
    /// Case-insensitive substring matched against item name or charity.
    pub search: String,
    pub status: StatusFilter,
}

impl AuctionFilter {
    pub fn matches(&self, auction: &Auction) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = needle.is_empty()
            || auction.record.item_name.to_lowercase().contains(&needle)
            || auction.record.charity.to_lowercase().contains(&needle);

        matches_search && self.status.accepts(auction.record.status)
    }

    /// Keep the matching auctions, preserving order.
    pub fn apply<'a>(&self, auctions: &'a [Auction]) -> Vec<&'a Auction> {
        auctions.iter().filter(|a| self.matches(a)).collect()
    }
}

/// Per-status counts over a list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionStats {
    pub active: usize,
    pub won: usize,
    pub closed: usize,
}

impl AuctionStats {
    pub fn from_auctions(auctions: &[Auction]) -> Self {
        auctions.iter().fold(Self::default(), |mut stats, auction| {
            match auction.record.status {
                AuctionStatus::Active => stats.active += 1,
                AuctionStatus::Won => stats.won += 1,
                AuctionStatus::Closed => stats.closed += 1,
            }
            stats
        })
    }

    pub const fn total(&self) -> usize {
        self.active + self.won + self.closed
    }
}

/// Whether the bid action should be offered for `auction`.
pub fn can_bid(auction: &Auction) -> bool {
    auction.is_active()
}

/// Whether the close action should be offered to `account`.
///
/// This only drives what the caller displays; `RegistrySync::close_auction`
/// does not check it.
pub fn can_close(auction: &Auction, account: &str) -> bool {
    auction.is_active() && addresses_match(account, &auction.record.bidder)
}
