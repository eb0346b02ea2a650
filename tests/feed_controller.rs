//! Feed controller behaviour against a scripted endpoint.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{chip, layout, page, page_with_chips, song, titles, MockEndpoint, MockResponse};
use songfeed_rs::controller::{FeedConfig, SongFeedController};
use songfeed_rs::error::FeedError;
use songfeed_rs::model::{ArtistRef, FeedLoadState, MediaItem, SongFeedCache, NO_ROW_HINT};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

fn controller(endpoint: &Arc<MockEndpoint>, dir: &TempDir) -> SongFeedController {
    SongFeedController::new(endpoint.clone(), SongFeedCache::in_dir(dir.path()), FeedConfig::default())
}

async fn seed_cache(dir: &TempDir, titles: &[&str], ctoken: Option<&str>) {
    let layouts: Vec<_> = titles.iter().map(|t| layout(t, vec![song(t, "UCcached")])).collect();
    SongFeedCache::in_dir(dir.path())
        .save_feed_layouts(&layouts, Some(&[chip("Cached", "pc")][..]), ctoken)
        .await
        .unwrap();
}

#[tokio::test]
async fn cached_feed_is_used_without_network() {
    let dir = tempfile::tempdir().unwrap();
    seed_cache(&dir, &["Listen again"], Some("cached-token")).await;
    let endpoint = MockEndpoint::new(Vec::new());
    let feed = controller(&endpoint, &dir);

    feed.load_feed(true, false, None).await.unwrap();

    let state = feed.state();
    assert_eq!(endpoint.call_count(), 0);
    assert_eq!(titles(state.layouts()), vec!["Listen again"]);
    assert_eq!(state.continuation.as_deref(), Some("cached-token"));
    assert_eq!(state.filter_chips.unwrap()[0].text, "Cached");
    assert_eq!(state.load_state, FeedLoadState::Idle);
}

#[tokio::test]
async fn cache_miss_fetches_and_saves() {
    let dir = tempfile::tempdir().unwrap();
    let endpoint = MockEndpoint::new([MockResponse::Page(page(
        vec![layout("Quick picks", vec![song("a", "UC1")])],
        Some("t1"),
    ))]);
    let feed = controller(&endpoint, &dir);

    feed.load_feed(true, false, None).await.unwrap();

    assert_eq!(endpoint.calls()[0].min_rows, 10);
    assert_eq!(endpoint.calls()[0].continuation, None);
    let saved = SongFeedCache::in_dir(dir.path()).load_feed_layouts().await.unwrap().unwrap();
    assert_eq!(titles(Some(saved.layouts.as_slice())), vec!["Quick picks"]);
    assert_eq!(saved.continuation_token.as_deref(), Some("t1"));
    assert!(saved.saved_at.is_some());
}

#[tokio::test]
async fn continuation_pages_accumulate() {
    let dir = tempfile::tempdir().unwrap();
    let endpoint = MockEndpoint::new([
        MockResponse::Page(page(vec![layout("One", vec![song("a", "UC1")])], Some("c1"))),
        MockResponse::Page(page(vec![layout("Two", vec![song("b", "UC1")])], Some("c2"))),
    ]);
    let feed = controller(&endpoint, &dir);

    feed.load_feed(false, false, None).await.unwrap();
    feed.load_feed(false, true, None).await.unwrap();

    let calls = endpoint.calls();
    assert_eq!(calls[1].min_rows, NO_ROW_HINT);
    assert_eq!(calls[1].continuation.as_deref(), Some("c1"));

    let state = feed.state();
    assert_eq!(titles(state.layouts()), vec!["One", "Two"]);
    assert_eq!(state.continuation.as_deref(), Some("c2"));
    // UC1 appears twice across both pages
    assert_eq!(state.artists_layout().items, vec![MediaItem::Artist(ArtistRef::new("UC1"))]);
}

#[tokio::test]
async fn continuing_without_token_uses_initial_hint() {
    let dir = tempfile::tempdir().unwrap();
    let endpoint = MockEndpoint::new([MockResponse::Page(page(vec![layout("One", vec![song("a", "UC1")])], None))]);
    let feed = SongFeedController::new(
        endpoint.clone(),
        SongFeedCache::in_dir(dir.path()),
        FeedConfig {
            initial_rows: 6,
            own_channel_id: None,
        },
    );

    feed.load_feed(false, true, None).await.unwrap();

    assert_eq!(
        endpoint.calls()[0],
        common::RecordedCall {
            min_rows: 6,
            params: None,
            continuation: None,
        }
    );
    assert_eq!(titles(feed.state().layouts()), vec!["One"]);
}

#[tokio::test]
async fn empty_layouts_are_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let endpoint = MockEndpoint::new([MockResponse::Page(page(
        vec![
            layout("Empty", vec![]),
            layout("Full", vec![song("a", "UC1")]),
        ],
        None,
    ))]);
    let feed = controller(&endpoint, &dir);

    feed.load_feed(false, false, None).await.unwrap();

    assert_eq!(titles(feed.state().layouts()), vec!["Full"]);
}

#[tokio::test]
async fn failure_without_cache_clears_feed() {
    let dir = tempfile::tempdir().unwrap();
    let endpoint = MockEndpoint::new([
        MockResponse::Page(page_with_chips(
            vec![layout("One", vec![song("a", "UC1")])],
            vec![chip("Relax", "p1")],
            Some("c1"),
        )),
        MockResponse::Fail(FeedError::Network("connection reset".into())),
    ]);
    let feed = controller(&endpoint, &dir);
    feed.load_feed(false, false, None).await.unwrap();

    let result = feed.load_feed(false, false, None).await;

    assert_eq!(result, Err(FeedError::Network("connection reset".into())));
    let state = feed.state();
    assert!(state.layouts().is_none());
    assert!(state.artists_layout().items.is_empty());
    assert_eq!(state.filter_chips, None);
    assert_eq!(state.continuation, None);
    assert_eq!(state.load_error, Some(FeedError::Network("connection reset".into())));
    assert_eq!(state.load_state, FeedLoadState::Idle);
    assert!(state.can_retry());
}

#[tokio::test]
async fn failure_falls_back_to_cache_and_still_reports_error() {
    let dir = tempfile::tempdir().unwrap();
    seed_cache(&dir, &["Cached row"], Some("cached-token")).await;
    let endpoint = MockEndpoint::new([MockResponse::Fail(FeedError::Status {
        status: 503,
        message: "busy".into(),
    })]);
    let feed = controller(&endpoint, &dir);

    // Continuing skips the cache-first path, so the fetch happens and fails
    let result = feed.load_feed(true, true, None).await;

    assert!(matches!(result, Err(FeedError::Status { status: 503, .. })));
    let state = feed.state();
    assert_eq!(titles(state.layouts()), vec!["Cached row"]);
    assert_eq!(state.continuation.as_deref(), Some("cached-token"));
    assert!(matches!(state.load_error, Some(FeedError::Status { status: 503, .. })));
    assert_eq!(state.load_state, FeedLoadState::Idle);
}

#[tokio::test]
async fn cancellation_is_not_masked_by_cache() {
    let dir = tempfile::tempdir().unwrap();
    seed_cache(&dir, &["Cached row"], None).await;
    let endpoint = MockEndpoint::new([MockResponse::Hang]);
    let feed = controller(&endpoint, &dir);
    let cancel = CancellationToken::new();

    let task = {
        let feed = feed.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move { feed.load_feed_cancellable(true, true, None, &cancel).await })
    };
    endpoint.wait_for_calls(1).await;
    assert_eq!(feed.state().load_state, FeedLoadState::Continuing);

    cancel.cancel();
    let result = task.await.unwrap();

    assert_eq!(result, Err(FeedError::Cancelled));
    let state = feed.state();
    assert!(state.layouts().is_none());
    assert_eq!(state.load_error, None);
    assert_eq!(state.load_state, FeedLoadState::Idle);
}

#[tokio::test]
async fn filtered_loads_send_params_and_skip_cache_save() {
    let dir = tempfile::tempdir().unwrap();
    let endpoint = MockEndpoint::new([
        MockResponse::Page(page_with_chips(
            vec![layout("Home", vec![song("a", "UC1")])],
            vec![chip("Relax", "p-relax"), chip("Focus", "p-focus")],
            None,
        )),
        MockResponse::Page(page_with_chips(
            vec![layout("Focus row", vec![song("f", "UC2")])],
            vec![chip("Relax", "p-relax"), chip("Focus", "p-focus")],
            None,
        )),
    ]);
    let feed = controller(&endpoint, &dir);

    feed.load_feed(false, false, None).await.unwrap();
    feed.load_feed(false, false, Some(1)).await.unwrap();

    assert_eq!(endpoint.calls()[1].params.as_deref(), Some("p-focus"));
    let state = feed.state();
    assert_eq!(state.selected_filter_chip, Some(1));
    assert_eq!(titles(state.layouts()), vec!["Focus row"]);
    assert_eq!(state.filter_chips.as_ref().map(Vec::len), Some(2));

    let saved = SongFeedCache::in_dir(dir.path()).load_feed_layouts().await.unwrap().unwrap();
    assert_eq!(titles(Some(saved.layouts.as_slice())), vec!["Home"]);
}

#[tokio::test]
async fn selecting_the_selected_chip_clears_it() {
    let dir = tempfile::tempdir().unwrap();
    let endpoint = MockEndpoint::new([
        MockResponse::Page(page_with_chips(
            vec![layout("Home", vec![song("a", "UC1")])],
            vec![chip("Relax", "p-relax")],
            None,
        )),
        MockResponse::Page(page(vec![layout("Relax row", vec![song("r", "UC1")])], None)),
        MockResponse::Page(page_with_chips(
            vec![layout("Home again", vec![song("a", "UC1")])],
            vec![chip("Relax", "p-relax")],
            None,
        )),
    ]);
    let feed = controller(&endpoint, &dir);
    feed.load_feed(false, false, None).await.unwrap();

    feed.select_filter_chip(Some(0)).await.unwrap();
    assert_eq!(feed.state().selected_filter_chip, Some(0));

    feed.select_filter_chip(Some(0)).await.unwrap();
    let state = feed.state();
    assert_eq!(state.selected_filter_chip, None);
    assert_eq!(titles(state.layouts()), vec!["Home again"]);

    let params: Vec<Option<String>> = endpoint.calls().into_iter().map(|call| call.params).collect();
    assert_eq!(params, vec![None, Some("p-relax".to_string()), None]);
}

#[tokio::test]
async fn concurrent_loads_run_one_at_a_time() {
    let dir = tempfile::tempdir().unwrap();
    let endpoint = MockEndpoint::with_delay(
        [
            MockResponse::Page(page(vec![layout("First", vec![song("a", "UC1")])], Some("c1"))),
            MockResponse::Page(page(vec![layout("Second", vec![song("b", "UC1")])], None)),
        ],
        Duration::from_millis(30),
    );
    let feed = controller(&endpoint, &dir);

    let (first, second) = tokio::join!(
        feed.load_feed(false, false, None),
        feed.load_feed(false, true, None),
    );

    assert!(first.is_ok());
    assert!(second.is_ok());
    assert_eq!(endpoint.max_in_flight(), 1);
    assert_eq!(endpoint.call_count(), 2);
    assert_eq!(feed.state().load_state, FeedLoadState::Idle);
}

#[tokio::test]
async fn new_detached_load_supersedes_pending_one() {
    let dir = tempfile::tempdir().unwrap();
    let endpoint = MockEndpoint::new([
        MockResponse::Hang,
        MockResponse::Page(page(vec![layout("Fresh", vec![song("a", "UC1")])], None)),
    ]);
    let feed = controller(&endpoint, &dir);

    let stale = feed.load_feed_detached(false);
    endpoint.wait_for_calls(1).await;
    assert!(feed.is_reloading());

    let fresh = feed.on_reload();
    stale.await.unwrap();
    fresh.await.unwrap();

    let state = feed.state();
    assert_eq!(titles(state.layouts()), vec!["Fresh"]);
    assert_eq!(state.load_error, None);
    assert_eq!(state.load_state, FeedLoadState::Idle);
    assert!(!feed.is_reloading());
}

#[tokio::test]
async fn open_page_prefers_cache_and_retry_bypasses_it() {
    let dir = tempfile::tempdir().unwrap();
    seed_cache(&dir, &["Cached row"], None).await;
    let endpoint = MockEndpoint::new([MockResponse::Page(page(
        vec![layout("Network row", vec![song("a", "UC1")])],
        None,
    ))]);
    let feed = controller(&endpoint, &dir);

    feed.open_page().unwrap().await.unwrap();
    assert_eq!(endpoint.call_count(), 0);
    assert_eq!(titles(feed.state().layouts()), vec!["Cached row"]);

    // Already showing content
    assert!(feed.open_page().is_none());

    feed.retry().await.unwrap();
    assert_eq!(endpoint.call_count(), 1);
    assert_eq!(titles(feed.state().layouts()), vec!["Network row"]);
    assert!(feed.can_reload());
}

#[tokio::test]
async fn own_channel_is_left_out_of_artists_row() {
    let dir = tempfile::tempdir().unwrap();
    let endpoint = MockEndpoint::new([MockResponse::Page(page(
        vec![layout(
            "Mix",
            vec![song("a", "UCme"), song("b", "UCme"), song("c", "UCx")],
        )],
        None,
    ))]);
    let feed = SongFeedController::new(
        endpoint.clone(),
        SongFeedCache::in_dir(dir.path()),
        FeedConfig {
            own_channel_id: Some("UCme".into()),
            ..FeedConfig::default()
        },
    );

    feed.load_feed(false, false, None).await.unwrap();

    let ids: Vec<String> = feed
        .state()
        .artists_layout()
        .items
        .iter()
        .map(|item| item.id().to_string())
        .collect();
    assert_eq!(ids, vec!["UCx"]);
}

#[tokio::test]
async fn retry_superseding_open_page_still_skips_cache() {
    let dir = tempfile::tempdir().unwrap();
    let endpoint = MockEndpoint::new([
        MockResponse::Hang,
        MockResponse::Page(page(vec![layout("Network row", vec![song("a", "UC1")])], None)),
    ]);
    let feed = controller(&endpoint, &dir);

    let opening = feed.open_page().unwrap();
    endpoint.wait_for_calls(1).await;

    // A snapshot appears while the first load is still pending
    seed_cache(&dir, &["Cached row"], None).await;
    let retrying = feed.retry();
    opening.await.unwrap();
    retrying.await.unwrap();

    assert_eq!(endpoint.call_count(), 2);
    let state = feed.state();
    assert_eq!(titles(state.layouts()), vec!["Network row"]);
    assert_eq!(state.load_error, None);
}

#[tokio::test]
async fn filtered_load_ignores_cached_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    seed_cache(&dir, &["Cached row"], None).await;
    let endpoint = MockEndpoint::new([MockResponse::Page(page(
        vec![layout("Cached chip row", vec![song("c", "UC1")])],
        None,
    ))]);
    let feed = controller(&endpoint, &dir);

    // Adopts the snapshot, which also provides the chips
    feed.load_feed(true, false, None).await.unwrap();
    assert_eq!(endpoint.call_count(), 0);

    feed.load_feed(true, false, Some(0)).await.unwrap();

    assert_eq!(endpoint.call_count(), 1);
    assert_eq!(endpoint.calls()[0].params.as_deref(), Some("pc"));
    assert_eq!(titles(feed.state().layouts()), vec!["Cached chip row"]);

    let saved = SongFeedCache::in_dir(dir.path()).load_feed_layouts().await.unwrap().unwrap();
    assert_eq!(titles(Some(saved.layouts.as_slice())), vec!["Cached row"]);
}

#[tokio::test]
async fn continuation_leaves_saved_snapshot_alone() {
    let dir = tempfile::tempdir().unwrap();
    let endpoint = MockEndpoint::new([
        MockResponse::Page(page(vec![layout("One", vec![song("a", "UC1")])], Some("c1"))),
        MockResponse::Page(page(vec![layout("Two", vec![song("b", "UC2")])], Some("c2"))),
    ]);
    let feed = controller(&endpoint, &dir);

    feed.load_feed(false, false, None).await.unwrap();
    feed.load_feed(false, true, None).await.unwrap();

    assert_eq!(titles(feed.state().layouts()), vec!["One", "Two"]);
    let saved = SongFeedCache::in_dir(dir.path()).load_feed_layouts().await.unwrap().unwrap();
    assert_eq!(titles(Some(saved.layouts.as_slice())), vec!["One"]);
    assert_eq!(saved.continuation_token.as_deref(), Some("c1"));
}
