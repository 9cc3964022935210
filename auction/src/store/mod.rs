//! Concrete `KvStore` implementations.

pub mod file;

pub use file::{JsonFileStore, LocalSigner};
