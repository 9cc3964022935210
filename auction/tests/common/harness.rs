//! Multi-session test harness for integration testing.
//!
//! Simulates several wallets (browser sessions) talking to one contract,
//! using mock implementations so that races between sessions can be
//! staged deterministically.

use charity_auction::mocks::{MockRandom, MockSigner, MockStore, MockTime};
use charity_auction::registry::codec;
use charity_auction::{Auction, AuctionRecord, NewAuction, RegistrySync, Wallet};

pub type TestSession = RegistrySync<MockStore, MockTime, MockRandom>;

/// Context for a single session.
pub struct SessionContext {
    pub address: String,
    pub sync: TestSession,
}

/// Several sessions sharing one mock store and one clock.
pub struct MultiSessionHarness {
    sessions: Vec<SessionContext>,
    store: MockStore,
    time: MockTime,
}

#[allow(dead_code)]
impl MultiSessionHarness {
    /// Create `num_sessions` connected sessions with addresses `0xA`, `0xB`, ...
    pub fn new(num_sessions: usize) -> Self {
        let store = MockStore::new();
        let time = MockTime::new(1_700_000_000);

        let sessions = (0..num_sessions)
            .map(|i| {
                let address = format!("0x{}", (b'A' + i as u8) as char);
                // Distinct seeds so ids never collide across sessions
                let rng = MockRandom::new(0xC0FF_EE00 + i as u64);
                let sync = RegistrySync::with_providers(store.clone(), time.clone(), rng);
                sync.connect(Wallet::new(address.clone(), MockSigner::new(address.clone())));
                SessionContext { address, sync }
            })
            .collect();

        Self {
            sessions,
            store,
            time,
        }
    }

    pub fn session(&self, index: usize) -> &TestSession {
        &self.sessions[index].sync
    }

    pub fn address(&self, index: usize) -> &str {
        &self.sessions[index].address
    }

    pub fn store(&self) -> &MockStore {
        &self.store
    }

    pub fn time(&self) -> &MockTime {
        &self.time
    }

    pub fn advance_time(&self, seconds: u64) {
        self.time.advance(seconds);
    }

    /// Session `index` creates an auction and returns its id.
    pub async fn create(&self, index: usize, item: &str, charity: &str, starting_bid: &str) -> String {
        self.session(index)
            .create(NewAuction::new(item, charity, starting_bid))
            .await
            .expect("create should succeed")
            .id
    }

    /// Read a record straight from the store, bypassing any session cache.
    pub async fn stored_record(&self, id: &str) -> Option<AuctionRecord> {
        let bytes = self.store.get_raw(&codec::record_key(id)).await?;
        codec::decode(&bytes).ok()
    }

    /// Fresh list as seen by session `index`.
    pub async fn list(&self, index: usize) -> Vec<Auction> {
        self.session(index)
            .load_all()
            .await
            .expect("load_all should succeed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sessions_share_the_store() {
        let harness = MultiSessionHarness::new(2);
        let id = harness.create(0, "Vase", "Red Cross", "100").await;

        let seen_by_other = harness.list(1).await;
        assert_eq!(seen_by_other.len(), 1);
        assert_eq!(seen_by_other[0].id, id);
    }

    #[test]
    fn test_addresses_are_distinct() {
        let harness = MultiSessionHarness::new(3);
        assert_eq!(harness.address(0), "0xA");
        assert_eq!(harness.address(2), "0xC");
    }
}
