//! The shared list of auction ids stored under `auction_keys`.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::INDEX_KEY;
use crate::error::{AuctionError, AuctionResult};
use crate::traits::{KvStore, WriteReceipt};

/// Ordered, append-only list of every known auction id.
///
/// Stored as a bare JSON array of strings. Order is insertion order and
/// carries no meaning beyond that.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyIndex {
    ids: Vec<String>,
}

impl KeyIndex {
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    /// Append `id`, ignoring duplicates. Returns whether the index changed.
    pub fn push(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    pub fn to_json(&self) -> AuctionResult<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| AuctionError::Encode(format!("key index: {e}")))
    }

    /// Parse a stored index. No size limit applies: the index grows with
    /// every auction ever created.
    pub fn from_json(data: &[u8]) -> AuctionResult<Self> {
        serde_json::from_slice(data)
            .map_err(|e| AuctionError::Decode(format!("key index: {e}")))
    }

    /// Read the index from the store.
    ///
    /// An unset key yields an empty index. So does a corrupted value; the
    /// corruption is logged and the next append overwrites it.
    pub async fn load<S: KvStore>(store: &S) -> AuctionResult<Self> {
        let bytes = store
            .get_data(INDEX_KEY)
            .await
            .context("Failed to read auction index")
            .map_err(|e| AuctionError::Store(format!("{e:#}")))?;

        if bytes.is_empty() {
            debug!("Auction index is empty");
            return Ok(Self::default());
        }

        match Self::from_json(&bytes) {
            Ok(index) => {
                debug!("Loaded auction index with {} ids", index.len());
                Ok(index)
            }
            Err(e) => {
                warn!("Auction index corrupted, treating as empty: {}", e);
                Ok(Self::default())
            }
        }
    }

    /// Overwrite the stored index with this one.
    ///
    /// Unconditional write: a concurrent writer's ids that are not in
    /// `self` are lost.
    pub async fn save<S: KvStore>(
        &self,
        store: &S,
        signer: &S::Signer,
    ) -> anyhow::Result<WriteReceipt> {
        let data = self.to_json()?;
        store.set_data(signer, INDEX_KEY, data).await
    }

    /// Re-read the index, append `id` and write it back.
    ///
    /// Read-modify-write without compare-and-swap: two sessions appending
    /// at the same time can each overwrite the other's id.
    pub async fn append_and_save<S: KvStore>(
        store: &S,
        signer: &S::Signer,
        id: &str,
    ) -> anyhow::Result<Option<WriteReceipt>> {
        let mut index = Self::load(store).await?;

        if !index.push(id) {
            info!("Auction '{}' already indexed, skipping", id);
            return Ok(None);
        }

        let receipt = index.save(store, signer).await?;
        info!("Appended auction '{}' to index ({} ids)", id, index.len());
        Ok(Some(receipt))
    }
}
