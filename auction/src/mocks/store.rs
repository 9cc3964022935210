//! Mock key/value store for testing.

use crate::traits::{KvStore, WriteReceipt};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Barrier, RwLock};

/// Write capability of a mock wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockSigner {
    pub address: String,
}

impl MockSigner {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }
}

/// Types of failures that can be simulated.
#[derive(Debug, Clone)]
pub enum MockStoreFailure {
    /// Fail all operations.
    All,
    /// Fail only read operations.
    Reads,
    /// Fail only write operations.
    Writes,
    /// Fail reads and writes on a specific key.
    OnKey(String),
    /// Report the contract as unavailable.
    Unavailable,
    /// Fail writes the way a wallet does when the user declines to sign.
    RejectWrites,
}

/// One committed write, recorded for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteLogEntry {
    pub key: String,
    pub address: String,
    pub tx_id: String,
}

#[derive(Debug)]
struct MockStoreInner {
    storage: RwLock<HashMap<String, Vec<u8>>>,
    next_tx: AtomicU64,
    write_log: RwLock<Vec<WriteLogEntry>>,
    fail_mode: RwLock<Option<MockStoreFailure>>,
    /// Writes to a gated key wait until every party has arrived.
    write_gates: RwLock<HashMap<String, Arc<Barrier>>>,
}

/// Mock key/value store for testing.
///
/// Every clone shares the same underlying map, so several sessions built
/// from clones of one `MockStore` observe each other's writes, like
/// browser tabs talking to the same contract.
#[derive(Debug, Clone)]
pub struct MockStore {
    inner: Arc<MockStoreInner>,
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MockStoreInner {
                storage: RwLock::new(HashMap::new()),
                next_tx: AtomicU64::new(1),
                write_log: RwLock::new(Vec::new()),
                fail_mode: RwLock::new(None),
                write_gates: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Set failure mode for testing error handling.
    pub async fn set_fail_mode(&self, mode: Option<MockStoreFailure>) {
        *self.inner.fail_mode.write().await = mode;
    }

    /// Make writes to `key` block until `parties` writers are waiting.
    ///
    /// Used to force two sessions to read the same snapshot before either
    /// writes back.
    pub async fn gate_writes(&self, key: &str, parties: usize) {
        self.inner
            .write_gates
            .write()
            .await
            .insert(key.to_string(), Arc::new(Barrier::new(parties)));
    }

    /// Remove a gate installed by `gate_writes`.
    pub async fn clear_write_gate(&self, key: &str) {
        self.inner.write_gates.write().await.remove(key);
    }

    /// Write a raw value without a signer (for seeding test fixtures).
    pub async fn put_raw(&self, key: &str, value: impl Into<Vec<u8>>) {
        self.inner
            .storage
            .write()
            .await
            .insert(key.to_string(), value.into());
    }

    /// Read a raw value, bypassing failure modes.
    pub async fn get_raw(&self, key: &str) -> Option<Vec<u8>> {
        self.inner.storage.read().await.get(key).cloned()
    }

    /// Get a snapshot of all stored data (for test assertions).
    pub async fn snapshot(&self) -> HashMap<String, Vec<u8>> {
        self.inner.storage.read().await.clone()
    }

    /// Number of committed writes.
    pub async fn write_count(&self) -> usize {
        self.inner.write_log.read().await.len()
    }

    /// All committed writes in commit order.
    pub async fn write_log(&self) -> Vec<WriteLogEntry> {
        self.inner.write_log.read().await.clone()
    }

    async fn check_fail(&self, is_write: bool, key: Option<&str>) -> Result<()> {
        let mode = self.inner.fail_mode.read().await;
        match &*mode {
            None | Some(MockStoreFailure::Unavailable) => Ok(()),
            Some(MockStoreFailure::All) => Err(anyhow!("MockStore: simulated failure")),
            Some(MockStoreFailure::Reads) if !is_write => {
                Err(anyhow!("MockStore: simulated read failure"))
            }
            Some(MockStoreFailure::Writes) if is_write => {
                Err(anyhow!("MockStore: simulated write failure"))
            }
            Some(MockStoreFailure::RejectWrites) if is_write => Err(anyhow!(
                "MockStore: user rejected transaction (ACTION_REJECTED)"
            )),
            Some(MockStoreFailure::OnKey(k)) if key == Some(k.as_str()) => {
                Err(anyhow!("MockStore: simulated failure on key {k}"))
            }
            Some(_) => Ok(()),
        }
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KvStore for MockStore {
    type Signer = MockSigner;

    fn signer_address(signer: &Self::Signer) -> String {
        signer.address.clone()
    }

    async fn is_available(&self) -> Result<bool> {
        let mode = self.inner.fail_mode.read().await;
        match &*mode {
            Some(MockStoreFailure::Unavailable) => Ok(false),
            Some(MockStoreFailure::All) => Err(anyhow!("MockStore: simulated failure")),
            _ => Ok(true),
        }
    }

    async fn get_data(&self, key: &str) -> Result<Vec<u8>> {
        self.check_fail(false, Some(key)).await?;

        let storage = self.inner.storage.read().await;
        Ok(storage.get(key).cloned().unwrap_or_default())
    }

    async fn set_data(
        &self,
        signer: &Self::Signer,
        key: &str,
        value: Vec<u8>,
    ) -> Result<WriteReceipt> {
        self.check_fail(true, Some(key)).await?;

        let gate = self.inner.write_gates.read().await.get(key).cloned();
        if let Some(barrier) = gate {
            barrier.wait().await;
        }

        let tx_id = format!(
            "0x{:064x}",
            self.inner.next_tx.fetch_add(1, Ordering::SeqCst)
        );
        self.inner
            .storage
            .write()
            .await
            .insert(key.to_string(), value);
        self.inner.write_log.write().await.push(WriteLogEntry {
            key: key.to_string(),
            address: signer.address.clone(),
            tx_id: tx_id.clone(),
        });

        Ok(WriteReceipt { tx_id })
    }
}
