use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use data_encoding::BASE64;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::MAX_VALUE_SIZE;
use crate::traits::{KvStore, WriteReceipt};

/// Signer for the local store: writes are attributed to `address`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSigner {
    pub address: String,
}

impl LocalSigner {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }
}

/// On-disk layout: base64 values keyed by store key.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    next_tx: u64,
    entries: BTreeMap<String, String>,
}

/// `KvStore` kept in a single JSON file.
///
/// Stands in for the contract during local runs. Writes within one process
/// are serialized; separate processes sharing a file get last-writer-wins.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: Arc<PathBuf>,
    write_lock: Arc<Mutex<()>>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    async fn read_file(&self) -> Result<StoreFile> {
        match tokio::fs::read(self.path.as_ref()).await {
            Ok(bytes) if bytes.is_empty() => Ok(StoreFile::default()),
            Ok(bytes) => serde_json::from_slice(&bytes)
                .with_context(|| format!("Corrupted store file {}", self.path.display())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(StoreFile::default()),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", self.path.display())),
        }
    }

    async fn write_file(&self, file: &StoreFile) -> Result<()> {
        let data = serde_json::to_vec_pretty(file)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &data)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, self.path.as_ref())
            .await
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

#[async_trait]
impl KvStore for JsonFileStore {
    type Signer = LocalSigner;

    fn signer_address(signer: &Self::Signer) -> String {
        signer.address.clone()
    }

    async fn is_available(&self) -> Result<bool> {
        Ok(tokio::fs::metadata(self.parent_dir())
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn get_data(&self, key: &str) -> Result<Vec<u8>> {
        let file = self.read_file().await?;
        match file.entries.get(key) {
            Some(encoded) => BASE64
                .decode(encoded.as_bytes())
                .map_err(|e| anyhow!("Stored value for '{key}' is not base64: {e}")),
            None => Ok(Vec::new()),
        }
    }

    async fn set_data(
        &self,
        signer: &Self::Signer,
        key: &str,
        value: Vec<u8>,
    ) -> Result<WriteReceipt> {
        if value.len() > MAX_VALUE_SIZE {
            return Err(anyhow!(
                "Value size {} exceeds maximum {} bytes",
                value.len(),
                MAX_VALUE_SIZE
            ));
        }

        let _guard = self.write_lock.lock().await;
        let mut file = self.read_file().await?;

        file.next_tx += 1;
        let tx_id = format!("0x{:064x}", file.next_tx);
        file.entries.insert(key.to_string(), BASE64.encode(&value));
        self.write_file(&file).await?;

        debug!("{} wrote {} bytes to '{}'", signer.address, value.len(), key);
        info!("Committed {} for key '{}'", tx_id, key);
        Ok(WriteReceipt { tx_id })
    }
}
