//! Trait abstractions for dependency injection and testability.
//!
//! This module provides trait-based abstractions for the external
//! collaborators (the contract's key/value storage, the clock and the
//! random source), enabling unit testing without a wallet or a chain.

pub mod random;
pub mod store;
pub mod time;

// Re-export all traits for crate-internal use.
// The public API surface is controlled by lib.rs re-exports.
pub use random::RandomSource;
pub use store::{KvStore, WriteReceipt};
pub use time::TimeProvider;

// Re-export default implementations
pub use random::ThreadRng;
pub use time::SystemTimeProvider;
