pub mod auction;
pub mod bid;

pub use auction::{generate_auction_id, Auction, AuctionRecord, AuctionStatus, NewAuction};
pub use bid::SealedBid;
