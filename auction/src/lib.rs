pub mod config;
pub mod error;
pub mod marketplace;
pub mod registry;
pub mod store;
pub mod traits;
pub mod util;
pub mod wallet;

#[cfg(any(test, feature = "test-support"))]
pub mod mocks;

pub use config::AuctionConfig;
pub use error::{AuctionError, AuctionResult, Operation};
pub use marketplace::{Auction, AuctionRecord, AuctionStatus, NewAuction, SealedBid};
pub use registry::{
    AuctionFilter, AuctionStats, KeyIndex, MutationOutcome, Refresh, RegistrySync, StatusFilter,
};
pub use store::{JsonFileStore, LocalSigner};
pub use traits::{KvStore, RandomSource, TimeProvider, WriteReceipt};
pub use wallet::Wallet;
