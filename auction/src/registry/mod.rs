//! Auction registry stored in the contract's key/value space.
//!
//! Layout:
//! - `auction_keys`: JSON array of every auction id ([`KeyIndex`])
//! - `auction_{id}`: JSON auction record ([`codec`])

pub mod codec;
pub mod key_index;
pub mod sync;
pub mod view;

pub use key_index::KeyIndex;
pub use sync::{MutationOutcome, Refresh, RegistrySync};
pub use view::{can_bid, can_close, AuctionFilter, AuctionStats, StatusFilter};
