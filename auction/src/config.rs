//! Configuration constants and environment-driven settings.
//!
//! Storage key names live here so that every component agrees on the
//! layout of the remote key/value store.

use std::path::PathBuf;

use crate::error::{AuctionError, AuctionResult};

/// Key holding the JSON array of every known auction id.
pub const INDEX_KEY: &str = "auction_keys";

/// Prefix of the key holding a single auction record (`auction_{id}`).
pub const RECORD_KEY_PREFIX: &str = "auction_";

/// Number of base-36 characters in the random part of an auction id.
pub const ID_SUFFIX_LEN: usize = 7;

/// Largest stored value the codec will attempt to parse.
pub const MAX_VALUE_SIZE: usize = 32_768;

/// Environment variable for the local store file.
pub const STORE_PATH_ENV: &str = "AUCTION_STORE_PATH";

/// Environment variable for an account to connect on startup.
pub const ACCOUNT_ENV: &str = "AUCTION_ACCOUNT";

/// Default file name of the local store (placed in the OS temp dir).
pub const DEFAULT_STORE_FILE: &str = "auction-store.json";

/// Runtime settings for the headless driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuctionConfig {
    /// Path of the JSON file backing the local store.
    pub store_path: PathBuf,
    /// Account connected at startup, if any.
    pub default_account: Option<String>,
}

impl Default for AuctionConfig {
    fn default() -> Self {
        Self {
            store_path: std::env::temp_dir().join(DEFAULT_STORE_FILE),
            default_account: None,
        }
    }
}

impl AuctionConfig {
    /// Read settings from the environment, falling back to defaults.
    ///
    /// A variable that is set but empty is rejected rather than silently
    /// replaced by the default.
    pub fn from_env() -> AuctionResult<Self> {
        let mut config = Self::default();

        if let Some(path) = read_env(STORE_PATH_ENV)? {
            config.store_path = PathBuf::from(path);
        }
        config.default_account = read_env(ACCOUNT_ENV)?;

        Ok(config)
    }
}

fn read_env(name: &str) -> AuctionResult<Option<String>> {
    match std::env::var(name) {
        Ok(value) if value.trim().is_empty() => {
            Err(AuctionError::Config(format!("{name} is set but empty")))
        }
        Ok(value) => Ok(Some(value)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(AuctionError::Config(format!("{name}: {e}"))),
    }
}
