//! Key/value store abstraction for the remote auction contract.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Receipt returned by a committed write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteReceipt {
    /// Opaque transaction identifier assigned by the store.
    pub tx_id: String,
}

/// Abstraction over the contract's generic `getData`/`setData` storage.
///
/// This trait enables testing of registry code without a wallet or a
/// deployed contract. Values are opaque bytes; an empty value means the
/// key has never been written.
#[async_trait]
pub trait KvStore: Send + Sync + Clone {
    /// Write capability handed out by the connected wallet.
    type Signer: Send + Sync + Clone;

    /// Address that writes made with `signer` are attributed to.
    fn signer_address(signer: &Self::Signer) -> String;

    /// Whether the contract is deployed and answering.
    async fn is_available(&self) -> Result<bool>;

    /// Read the value stored under `key`.
    ///
    /// Returns an empty vector if the key is unset.
    async fn get_data(&self, key: &str) -> Result<Vec<u8>>;

    /// Overwrite the value stored under `key`.
    ///
    /// The write is unconditional: there is no compare-and-swap.
    async fn set_data(
        &self,
        signer: &Self::Signer,
        key: &str,
        value: Vec<u8>,
    ) -> Result<WriteReceipt>;
}
