//! Keeps a local view of the auction list consistent with the remote store.
//!
//! Every mutation is a whole-record overwrite followed by a full reload,
//! so the list handed back to the caller is always what the store
//! actually holds, never a locally patched copy.

use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::codec;
use super::key_index::KeyIndex;
use super::view::{AuctionFilter, AuctionStats};
use crate::error::{AuctionError, AuctionResult, Operation};
use crate::marketplace::{
    generate_auction_id, Auction, AuctionRecord, AuctionStatus, NewAuction, SealedBid,
};
use crate::traits::{
    KvStore, RandomSource, SystemTimeProvider, ThreadRng, TimeProvider, WriteReceipt,
};
use crate::wallet::Wallet;

/// State of the caller's view after a committed mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "detail")]
pub enum Refresh {
    /// The list was reloaded after the write.
    Fresh(Vec<Auction>),
    /// The write committed but reloading failed; the cached list is stale.
    Stale(String),
}

impl Refresh {
    pub fn is_fresh(&self) -> bool {
        matches!(self, Self::Fresh(_))
    }
}

/// Result of a successful create, bid or close.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutationOutcome {
    /// Auction the mutation applied to.
    pub id: String,
    /// Receipt of the record write.
    pub receipt: WriteReceipt,
    pub refresh: Refresh,
}

/// Client-side coordinator for the auction registry.
///
/// One instance corresponds to one user session. Operations are meant to
/// be issued one at a time; nothing here serializes them against other
/// sessions writing to the same store.
pub struct RegistrySync<S, T = SystemTimeProvider, R = ThreadRng>
where
    S: KvStore,
    T: TimeProvider,
    R: RandomSource,
{
    store: S,
    time: T,
    rng: R,
    wallet: RwLock<Option<Wallet<S::Signer>>>,
    /// Last successfully loaded list, newest first.
    auctions: RwLock<Vec<Auction>>,
}

impl<S: KvStore> RegistrySync<S> {
    pub fn new(store: S) -> Self {
        Self::with_providers(store, SystemTimeProvider::new(), ThreadRng::new())
    }
}

impl<S, T, R> RegistrySync<S, T, R>
where
    S: KvStore,
    T: TimeProvider,
    R: RandomSource,
{
    pub fn with_providers(store: S, time: T, rng: R) -> Self {
        Self {
            store,
            time,
            rng,
            wallet: RwLock::new(None),
            auctions: RwLock::new(Vec::new()),
        }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    // ── Wallet ───────────────────────────────────────────────────────

    pub fn connect(&self, wallet: Wallet<S::Signer>) {
        info!("Wallet connected: {}", wallet.address);
        *self.wallet.write() = Some(wallet);
    }

    pub fn disconnect(&self) {
        if self.wallet.write().take().is_some() {
            info!("Wallet disconnected");
        }
    }

    /// Follow an account switch inside the connected wallet.
    ///
    /// Returns `false` if no wallet is connected.
    pub fn switch_account(&self, address: impl Into<String>) -> bool {
        let mut guard = self.wallet.write();
        match guard.as_mut() {
            Some(wallet) => {
                wallet.address = address.into();
                info!("Active account changed to {}", wallet.address);
                true
            }
            None => false,
        }
    }

    /// Address of the connected account, if any.
    pub fn account(&self) -> Option<String> {
        self.wallet.read().as_ref().map(|w| w.address.clone())
    }

    /// Identity the store attributes writes to, if connected.
    pub fn signer_address(&self) -> Option<String> {
        self.wallet
            .read()
            .as_ref()
            .map(|w| S::signer_address(&w.signer))
    }

    fn require_wallet(&self) -> AuctionResult<Wallet<S::Signer>> {
        self.wallet.read().clone().ok_or(AuctionError::NotConnected)
    }

    // ── Cached view ──────────────────────────────────────────────────

    /// The list from the last successful `load_all`.
    pub fn auctions(&self) -> Vec<Auction> {
        self.auctions.read().clone()
    }

    pub fn filtered(&self, filter: &AuctionFilter) -> Vec<Auction> {
        filter
            .apply(&self.auctions.read())
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn stats(&self) -> AuctionStats {
        AuctionStats::from_auctions(&self.auctions.read())
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Rebuild the auction list from the store.
    ///
    /// Records that are missing, unreadable or malformed are skipped; the
    /// result is sorted newest first, keeping index order among equal
    /// timestamps. On error the cached list is left as it was.
    pub async fn load_all(&self) -> AuctionResult<Vec<Auction>> {
        match self.store.is_available().await {
            Ok(true) => {}
            Ok(false) => {
                warn!("Auction contract is not available");
                return Err(AuctionError::StoreUnavailable);
            }
            Err(e) => {
                warn!("Availability check failed: {:#}", e);
                return Err(AuctionError::StoreUnavailable);
            }
        }

        let index = KeyIndex::load(&self.store).await?;
        let mut list = Vec::with_capacity(index.len());

        for id in index.ids() {
            match self.fetch_record(id).await {
                Ok(Some(record)) => list.push(Auction {
                    id: id.clone(),
                    record,
                }),
                Ok(None) => warn!("Auction '{}' is indexed but has no record, skipping", id),
                Err(e) => warn!("Skipping auction '{}': {}", id, e),
            }
        }

        // Stable sort keeps index order for equal timestamps
        list.sort_by(|a, b| b.record.timestamp.cmp(&a.record.timestamp));

        debug!(
            "Loaded {} of {} indexed auctions",
            list.len(),
            index.len()
        );
        *self.auctions.write() = list.clone();
        Ok(list)
    }

    /// Create an auction owned by the connected account.
    ///
    /// The record is written before the index. If the index append fails,
    /// the record stays in the store unreferenced and `load_all` never
    /// shows it.
    pub async fn create(&self, draft: NewAuction) -> AuctionResult<MutationOutcome> {
        draft.validate()?;
        let wallet = self.require_wallet()?;

        let id = generate_auction_id(&self.time, &self.rng);
        let item_name = draft.item_name.clone();
        let record = draft.into_record(&wallet.address, self.time.now_unix());

        let receipt = self
            .write_record(&wallet, Operation::Create, &id, &record)
            .await?;

        KeyIndex::append_and_save(&self.store, &wallet.signer, &id)
            .await
            .map_err(|e| {
                warn!(
                    "Auction '{}' written but not indexed, record is orphaned: {:#}",
                    id, e
                );
                AuctionError::from_write_failure(Operation::Create, &e)
            })?;

        info!("Created auction '{}' ({})", item_name, id);
        Ok(self.finish(id, receipt).await)
    }

    /// Replace the current bid and bidder of an auction.
    ///
    /// Any non-empty amount is accepted; it is not compared against the
    /// previous bid.
    pub async fn place_bid(
        &self,
        auction_id: &str,
        bid_amount: &str,
    ) -> AuctionResult<MutationOutcome> {
        let wallet = self.require_wallet()?;
        if bid_amount.is_empty() {
            return Err(AuctionError::Validation("Bid amount is required".into()));
        }

        let mut record = self.fetch_existing(auction_id).await?;
        if record.status != AuctionStatus::Active {
            warn!(
                "Bidding on auction '{}' which is {}",
                auction_id,
                record.status.as_str()
            );
        }

        record.bid = SealedBid::seal(bid_amount);
        record.bidder = wallet.address.clone();

        let receipt = self
            .write_record(&wallet, Operation::PlaceBid, auction_id, &record)
            .await?;

        info!("Placed bid on auction '{}' as {}", auction_id, wallet.address);
        Ok(self.finish(auction_id.to_string(), receipt).await)
    }

    /// Mark an auction closed.
    ///
    /// No ownership check is made here; deciding who may close is left to
    /// the caller (see `view::can_close`).
    pub async fn close_auction(&self, auction_id: &str) -> AuctionResult<MutationOutcome> {
        let wallet = self.require_wallet()?;

        let mut record = self.fetch_existing(auction_id).await?;
        if !wallet.is_owner(&record.bidder) {
            debug!(
                "Closing auction '{}' on behalf of {}, current bidder is {}",
                auction_id, wallet.address, record.bidder
            );
        }
        record.status = AuctionStatus::Closed;

        let receipt = self
            .write_record(&wallet, Operation::Close, auction_id, &record)
            .await?;

        info!("Closed auction '{}'", auction_id);
        Ok(self.finish(auction_id.to_string(), receipt).await)
    }

    // ── Helpers ──────────────────────────────────────────────────────

    async fn fetch_record(&self, id: &str) -> AuctionResult<Option<AuctionRecord>> {
        let bytes = self
            .store
            .get_data(&codec::record_key(id))
            .await
            .map_err(|e| AuctionError::Store(format!("Failed to read auction '{id}': {e:#}")))?;

        if bytes.is_empty() {
            return Ok(None);
        }
        codec::decode(&bytes).map(Some)
    }

    async fn fetch_existing(&self, id: &str) -> AuctionResult<AuctionRecord> {
        self.fetch_record(id)
            .await?
            .ok_or_else(|| AuctionError::NotFound(format!("auction '{id}'")))
    }

    async fn write_record(
        &self,
        wallet: &Wallet<S::Signer>,
        op: Operation,
        id: &str,
        record: &AuctionRecord,
    ) -> AuctionResult<WriteReceipt> {
        let data = codec::encode(record)?;
        debug!(
            "Writing auction '{}' ({} bytes) as {}",
            id,
            data.len(),
            S::signer_address(&wallet.signer)
        );
        self.store
            .set_data(&wallet.signer, &codec::record_key(id), data)
            .await
            .map_err(|e| AuctionError::from_write_failure(op, &e))
    }

    /// Reload after a committed write. A failed reload does not undo or
    /// fail the mutation.
    async fn finish(&self, id: String, receipt: WriteReceipt) -> MutationOutcome {
        let refresh = match self.load_all().await {
            Ok(list) => Refresh::Fresh(list),
            Err(e) => {
                warn!("Mutation on '{}' committed but refresh failed: {}", id, e);
                Refresh::Stale(e.to_string())
            }
        };
        MutationOutcome {
            id,
            receipt,
            refresh,
        }
    }
}
