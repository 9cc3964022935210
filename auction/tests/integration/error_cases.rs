//! Corruption tolerance and the error taxonomy.

use charity_auction::config::INDEX_KEY;
use charity_auction::mocks::{MockStore, MockStoreFailure};
use charity_auction::registry::codec;
use charity_auction::{AuctionError, NewAuction, Operation, RegistrySync};

use crate::common::MultiSessionHarness;

#[tokio::test]
async fn test_malformed_index_yields_empty_list() {
    let harness = MultiSessionHarness::new(1);
    harness.create(0, "Vase", "Red Cross", "100").await;
    harness.store().put_raw(INDEX_KEY, b"[\"unterminated".to_vec()).await;

    assert!(harness.list(0).await.is_empty());
}

#[tokio::test]
async fn test_malformed_index_is_replaced_on_next_create() {
    let harness = MultiSessionHarness::new(1);
    harness.store().put_raw(INDEX_KEY, b"42".to_vec()).await;

    let id = harness.create(0, "Vase", "Red Cross", "100").await;
    let list = harness.list(0).await;
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id, id);
}

#[tokio::test]
async fn test_dangling_index_entry_is_skipped() {
    let harness = MultiSessionHarness::new(1);
    let id = harness.create(0, "Vase", "Red Cross", "100").await;
    harness
        .store()
        .put_raw(
            INDEX_KEY,
            format!("[\"ghost\",\"{id}\",\"another-ghost\"]").into_bytes(),
        )
        .await;

    let list = harness.list(0).await;
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id, id);
}

#[tokio::test]
async fn test_corrupt_record_does_not_hide_others() {
    let harness = MultiSessionHarness::new(1);
    let broken = harness.create(0, "Broken", "A", "1").await;
    let fine = harness.create(0, "Fine", "B", "1").await;
    harness
        .store()
        .put_raw(&codec::record_key(&broken), b"\xff\xfe".to_vec())
        .await;

    let list = harness.list(0).await;
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id, fine);
}

#[tokio::test]
async fn test_unavailable_store() {
    let store = MockStore::new();
    store.set_fail_mode(Some(MockStoreFailure::Unavailable)).await;
    let sync = RegistrySync::new(store);

    let err = sync.load_all().await.unwrap_err();
    assert!(matches!(err, AuctionError::StoreUnavailable));
    assert!(sync.auctions().is_empty());
}

#[tokio::test]
async fn test_close_missing_auction_reports_not_found() {
    let harness = MultiSessionHarness::new(1);

    let err = harness
        .session(0)
        .close_auction("1700000000000-nothere")
        .await
        .unwrap_err();
    assert!(matches!(err, AuctionError::NotFound(_)));
    assert_eq!(err.user_message(Operation::Close), "Close failed: Auction not found");
    assert_eq!(harness.store().write_count().await, 0);
}

#[tokio::test]
async fn test_rejected_signature_is_distinct_from_failure() {
    let harness = MultiSessionHarness::new(1);
    let id = harness.create(0, "Vase", "Red Cross", "100").await;

    harness
        .store()
        .set_fail_mode(Some(MockStoreFailure::RejectWrites))
        .await;
    let rejected = harness.session(0).place_bid(&id, "200").await.unwrap_err();
    assert!(matches!(rejected, AuctionError::UserRejected));
    assert_eq!(
        rejected.user_message(Operation::PlaceBid),
        "Transaction rejected by user"
    );

    harness
        .store()
        .set_fail_mode(Some(MockStoreFailure::Writes))
        .await;
    let failed = harness.session(0).place_bid(&id, "200").await.unwrap_err();
    assert!(matches!(failed, AuctionError::WriteFailed(_)));
    assert!(failed
        .user_message(Operation::PlaceBid)
        .starts_with("Bid failed: "));

    let failed_create = harness
        .session(0)
        .create(NewAuction::new("Lamp", "Oxfam", "5"))
        .await
        .unwrap_err();
    assert!(matches!(failed_create, AuctionError::CreateFailed(_)));
}

#[tokio::test]
async fn test_read_failure_during_bid_aborts_without_write() {
    let harness = MultiSessionHarness::new(1);
    let id = harness.create(0, "Vase", "Red Cross", "100").await;
    let writes_before = harness.store().write_count().await;

    harness
        .store()
        .set_fail_mode(Some(MockStoreFailure::Reads))
        .await;
    let err = harness.session(0).place_bid(&id, "200").await.unwrap_err();
    assert!(matches!(err, AuctionError::Store(_)));
    assert_eq!(harness.store().write_count().await, writes_before);
}

#[tokio::test]
async fn test_index_larger_than_value_limit_survives_create() {
    let harness = MultiSessionHarness::new(1);
    let mut ids = Vec::new();
    for i in 0..1500 {
        let id = format!("1600000000{i:03}-seed{i:03}");
        let record = NewAuction::new(format!("Lot {i}"), "Red Cross", "10")
            .into_record("0xA", 1_600_000_000 + i);
        harness
            .store()
            .put_raw(&codec::record_key(&id), codec::encode(&record).unwrap())
            .await;
        ids.push(id);
    }
    let raw_index = serde_json::to_vec(&ids).unwrap();
    assert!(raw_index.len() > charity_auction::config::MAX_VALUE_SIZE);
    harness.store().put_raw(INDEX_KEY, raw_index).await;

    assert_eq!(harness.list(0).await.len(), 1500);

    let id = harness.create(0, "Vase", "Red Cross", "100").await;
    let list = harness.list(0).await;
    assert_eq!(list.len(), 1501);
    assert_eq!(list[0].id, id);
}

#[tokio::test]
async fn test_record_with_null_status_is_listed_as_active() {
    let harness = MultiSessionHarness::new(1);
    let id = harness.create(0, "Vase", "Red Cross", "100").await;
    harness
        .store()
        .put_raw(
            &codec::record_key(&id),
            br#"{"bid":"FHE-x","bidder":"0xA","timestamp":1700000000,"status":null,"itemName":"Vase","charity":"Red Cross"}"#.to_vec(),
        )
        .await;

    let list = harness.list(0).await;
    assert_eq!(list.len(), 1);
    assert!(list[0].is_active());
}
