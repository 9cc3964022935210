//! Mock implementations for testing.
//!
//! This module provides mock implementations of the trait abstractions
//! that allow unit testing without a wallet or a deployed contract.

pub mod random;
pub mod store;
pub mod time;

pub use random::MockRandom;
pub use store::{MockSigner, MockStore, MockStoreFailure, WriteLogEntry};
pub use time::MockTime;
