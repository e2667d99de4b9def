//! PostgresStore integration tests.
//!
//! Require Docker: cargo test --test postgres_store_tests -- --ignored

mod common;

use std::sync::Arc;

use studio_core::common::{Actor, CoreError};
use studio_core::domains::reviews::actions::{
    edit_review, list_public_reviews, publish_review, submit_review,
};
use studio_core::domains::reviews::{NewReview, ReviewContent, ReviewEdit};
use studio_core::domains::selection::actions::{
    create_selection_version, list_edit_requests, list_selection_versions, set_selection_lock,
    submit_edit_request,
};
use studio_core::domains::selection::models::NewSelectionVersion;
use studio_core::kernel::{BaseProjectStore, BaseReviewStore, BaseSelectionStore, StoreError};
use test_context::test_context;

use crate::common::TestHarness;

fn admin() -> Actor {
    Actor::new("studio-owner".to_string(), true)
}

fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn content(name: &str, rating: i16) -> ReviewContent {
    ReviewContent {
        name: name.to_string(),
        rating,
        text: "Lovely shoot".to_string(),
        images: vec!["IMG_001".to_string()],
    }
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn versions_stop_at_lock(ctx: &TestHarness) {
    let r = ctx.fresh_reference();

    let v1 = create_selection_version(&r, ids(&["a", "b"]), 5, &ctx.store).await.unwrap();
    let v2 = create_selection_version(&r, ids(&["a", "c"]), 5, &ctx.store).await.unwrap();
    assert_eq!((v1.version, v2.version), (1, 2));

    set_selection_lock(&admin(), &r, true, &ctx.store).await.unwrap();

    let rejected = create_selection_version(&r, ids(&["a", "d"]), 5, &ctx.store).await;
    assert!(matches!(rejected, Err(CoreError::Locked(_))));

    let versions = list_selection_versions(&r, &ctx.store).await.unwrap();
    let sets: Vec<Vec<String>> = versions.into_iter().map(|v| v.selected_asset_ids).collect();
    assert_eq!(sets, vec![ids(&["a", "b"]), ids(&["a", "c"])]);
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn insert_after_lock_is_refused_by_the_store(ctx: &TestHarness) {
    let r = ctx.fresh_reference();
    ctx.store.set_lock(&r, true).await.unwrap();

    // Skips the action layer entirely: the store itself checks the lock
    let result = ctx
        .store
        .insert_version(NewSelectionVersion {
            reference_id: r.clone(),
            version: 1,
            selected_asset_ids: ids(&["a"]),
        })
        .await;
    assert!(matches!(result, Err(StoreError::Locked)));
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn duplicate_version_hits_unique_index(ctx: &TestHarness) {
    let r = ctx.fresh_reference();
    let version = NewSelectionVersion {
        reference_id: r.clone(),
        version: 1,
        selected_asset_ids: ids(&["a"]),
    };

    ctx.store.insert_version(version.clone()).await.unwrap();
    let result = ctx.store.insert_version(version).await;

    match result {
        Err(StoreError::Duplicate { index }) => assert_eq!(index, "reference_id_version"),
        other => panic!("expected duplicate, got {:?}", other.map(|v| v.version)),
    }
}

#[test_context(TestHarness)]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requires Docker"]
async fn concurrent_writers_get_distinct_versions(ctx: &TestHarness) {
    let r = ctx.fresh_reference();
    let store = Arc::new(ctx.store.clone());

    let mut handles = Vec::new();
    for i in 0..8 {
        let store = store.clone();
        let r = r.clone();
        handles.push(tokio::spawn(async move {
            create_selection_version(&r, vec![format!("img-{}", i)], 20, store.as_ref()).await
        }));
    }

    let mut versions = Vec::new();
    for handle in handles {
        versions.push(handle.await.unwrap().unwrap().version);
    }
    versions.sort_unstable();
    assert_eq!(versions, (1..=8).collect::<Vec<_>>());
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn lock_toggle_round_trip(ctx: &TestHarness) {
    let r = ctx.fresh_reference();

    let locked = ctx.store.set_lock(&r, true).await.unwrap();
    let again = ctx.store.set_lock(&r, true).await.unwrap();
    assert_eq!(locked.selection_locked_at, again.selection_locked_at);

    let unlocked = ctx.store.set_lock(&r, false).await.unwrap();
    assert!(!unlocked.selection_locked);
    assert!(unlocked.selection_locked_at.is_none());

    let relocked = ctx.store.set_lock(&r, true).await.unwrap();
    assert!(relocked.selection_locked);
    assert!(relocked.selection_locked_at.is_some());
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn edit_requests_newest_first(ctx: &TestHarness) {
    let r = ctx.fresh_reference();
    ctx.store.set_lock(&r, true).await.unwrap();

    submit_edit_request(&r, "first", &ctx.store).await.unwrap();
    submit_edit_request(&r, "second", &ctx.store).await.unwrap();

    let requests = list_edit_requests(&admin(), &r, &ctx.store).await.unwrap();
    let details: Vec<&str> = requests.iter().map(|r| r.details.as_str()).collect();
    assert_eq!(details, vec!["second", "first"]);
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn review_uniqueness_and_snapshot(ctx: &TestHarness) {
    let r = ctx.fresh_reference();
    let customer = format!("cust-{}", r);

    let review = submit_review(
        NewReview::new(Some(r.clone()), Some(customer.clone()), content("Dana", 5)).unwrap(),
        &ctx.store,
    )
    .await
    .unwrap();

    let duplicate = submit_review(
        NewReview::new(Some(r.clone()), None, content("Eli", 4)).unwrap(),
        &ctx.store,
    )
    .await;
    assert!(matches!(duplicate, Err(CoreError::Conflict(_))));

    publish_review(&admin(), review.id, &ctx.store).await.unwrap();
    edit_review(
        &admin(),
        review.id,
        ReviewEdit {
            name: Some("Dana R.".to_string()),
            ..Default::default()
        },
        &ctx.store,
    )
    .await
    .unwrap();

    let public = list_public_reviews(&ctx.store).await.unwrap();
    let shown = public
        .iter()
        .find(|p| p.id == review.id.to_string())
        .expect("published review is listed");
    assert_eq!(shown.name, "Dana");
    assert_eq!(shown.reference_id.as_deref(), Some(r.as_ref()));
    assert_eq!(shown.customer_ref.as_deref(), Some(customer.as_str()));
}

#[test_context(TestHarness)]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requires Docker"]
async fn concurrent_review_edits_keep_every_field(ctx: &TestHarness) {
    let r = ctx.fresh_reference();
    let review = submit_review(
        NewReview::new(Some(r), None, content("Fay", 5)).unwrap(),
        &ctx.store,
    )
    .await
    .unwrap();
    let store = Arc::new(ctx.store.clone());

    let edits = vec![
        ReviewEdit {
            text: Some("new text".to_string()),
            ..Default::default()
        },
        ReviewEdit {
            rating: Some(2),
            ..Default::default()
        },
        ReviewEdit {
            name: Some("Fay B.".to_string()),
            ..Default::default()
        },
    ];
    let mut handles = Vec::new();
    for edit in edits {
        let store = store.clone();
        let id = review.id;
        handles.push(tokio::spawn(async move {
            edit_review(&admin(), id, edit, store.as_ref()).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let stored = ctx.store.find_review(review.id).await.unwrap().unwrap();
    assert_eq!(stored.text, "new text");
    assert_eq!(stored.rating, 2);
    assert_eq!(stored.name, "Fay B.");
    assert_eq!(stored.images, ids(&["IMG_001"]));
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn migrations_are_idempotent(ctx: &TestHarness) {
    use studio_core::kernel::BaseDocumentStore;

    ctx.store.ensure_indexes().await.unwrap();
    ctx.store.ping().await.unwrap();
}
