//! End-to-end create / bid / close flows across sessions.

use charity_auction::{AuctionStatus, Refresh, SealedBid};

use crate::common::MultiSessionHarness;

#[tokio::test]
async fn test_create_bid_close_lifecycle() {
    let harness = MultiSessionHarness::new(2);
    let seller = harness.session(0);
    let bidder = harness.session(1);

    // create("Vase", "Red Cross", "100") as 0xA
    let id = harness.create(0, "Vase", "Red Cross", "100").await;
    let list = harness.list(0).await;
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id, id);
    assert_eq!(list[0].record.item_name, "Vase");
    assert_eq!(list[0].record.charity, "Red Cross");
    assert_eq!(list[0].status(), AuctionStatus::Active);

    // placeBid(id, "150") as 0xB
    bidder.place_bid(&id, "150").await.unwrap();
    let list = harness.list(0).await;
    assert_eq!(list[0].record.bidder, "0xB");
    assert_eq!(list[0].record.bid, SealedBid::seal("150"));

    // closeAuction(id) as 0xA
    seller.close_auction(&id).await.unwrap();
    let list = harness.list(1).await;
    assert_eq!(list[0].status(), AuctionStatus::Closed);
    assert_eq!(list[0].record.bidder, "0xB");
}

#[tokio::test]
async fn test_mutation_outcome_carries_reloaded_list() {
    let harness = MultiSessionHarness::new(1);

    let outcome = harness
        .session(0)
        .create(charity_auction::NewAuction::new("Quilt", "Shelter", "20"))
        .await
        .unwrap();

    match outcome.refresh {
        Refresh::Fresh(list) => {
            assert_eq!(list.len(), 1);
            assert_eq!(list[0].id, outcome.id);
        }
        Refresh::Stale(reason) => panic!("unexpected stale refresh: {reason}"),
    }
    assert_eq!(harness.session(0).auctions().len(), 1);
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let harness = MultiSessionHarness::new(1);

    let first = harness.create(0, "Old", "A", "1").await;
    harness.advance_time(60);
    let second = harness.create(0, "Middle", "B", "1").await;
    harness.advance_time(60);
    let third = harness.create(0, "New", "C", "1").await;

    let ids: Vec<_> = harness.list(0).await.into_iter().map(|a| a.id).collect();
    assert_eq!(ids, [third, second, first]);
}

#[tokio::test]
async fn test_same_second_creations_keep_index_order() {
    let harness = MultiSessionHarness::new(1);

    // Distinct millisecond ids, same `timestamp` second
    let first = harness.create(0, "One", "A", "1").await;
    harness.time().advance_millis(5);
    let second = harness.create(0, "Two", "B", "1").await;

    let list = harness.list(0).await;
    assert_eq!(list[0].record.timestamp, list[1].record.timestamp);
    let ids: Vec<_> = list.into_iter().map(|a| a.id).collect();
    assert_eq!(ids, [first, second]);
}

#[tokio::test]
async fn test_sequential_bids_keep_only_the_last() {
    let harness = MultiSessionHarness::new(3);
    let id = harness.create(0, "Vase", "Red Cross", "100").await;

    let first = harness.session(1).place_bid(&id, "150").await;
    let second = harness.session(2).place_bid(&id, "120").await;
    assert!(first.is_ok());
    assert!(second.is_ok());

    let record = harness.stored_record(&id).await.unwrap();
    assert_eq!(record.bidder, "0xC");
    assert_eq!(record.bid, SealedBid::seal("120"));
}

#[tokio::test]
async fn test_records_are_never_removed() {
    let harness = MultiSessionHarness::new(1);
    let a = harness.create(0, "A", "X", "1").await;
    let b = harness.create(0, "B", "Y", "1").await;

    harness.session(0).close_auction(&a).await.unwrap();
    harness.session(0).close_auction(&b).await.unwrap();

    let list = harness.list(0).await;
    assert_eq!(list.len(), 2);
    assert!(list.iter().all(|a| a.status() == AuctionStatus::Closed));
}
