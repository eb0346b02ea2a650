//! Common test utilities for integration tests.
//!
//! Provides a scripted feed endpoint and small builders for feed content.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use songfeed_rs::error::FeedError;
use songfeed_rs::model::{
    ArtistRef, ContentLayout, FilterChip, MediaItem, SongFeedEndpoint, SongFeedLoadResult,
};

/// What the mock endpoint does for one request
pub enum MockResponse {
    Page(SongFeedLoadResult),
    Fail(FeedError),
    /// Never completes; only cancellation ends the request
    Hang,
}

/// Arguments of one `get_song_feed` call
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedCall {
    pub min_rows: i32,
    pub params: Option<String>,
    pub continuation: Option<String>,
}

/// Endpoint that replays queued responses in order and records every call.
#[derive(Default)]
pub struct MockEndpoint {
    responses: Mutex<VecDeque<MockResponse>>,
    calls: Mutex<Vec<RecordedCall>>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockEndpoint {
    pub fn new(responses: impl IntoIterator<Item = MockResponse>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().collect()),
            ..Self::default()
        })
    }

    pub fn with_delay(responses: impl IntoIterator<Item = MockResponse>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().collect()),
            delay: Some(delay),
            ..Self::default()
        })
    }

    pub fn push(&self, response: MockResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Wait until at least `count` requests have reached the endpoint
    pub async fn wait_for_calls(&self, count: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.call_count() < count {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("endpoint was not called in time");
    }
}

/// Decrements the in-flight counter even when the request future is dropped
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl SongFeedEndpoint for MockEndpoint {
    async fn get_song_feed(
        &self,
        min_rows: i32,
        params: Option<&str>,
        continuation: Option<&str>,
    ) -> Result<SongFeedLoadResult, FeedError> {
        self.calls.lock().unwrap().push(RecordedCall {
            min_rows,
            params: params.map(str::to_string),
            continuation: continuation.map(str::to_string),
        });

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        let _in_flight = InFlight(&self.in_flight);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let response = self.responses.lock().unwrap().pop_front();
        match response {
            Some(MockResponse::Page(page)) => Ok(page),
            Some(MockResponse::Fail(error)) => Err(error),
            Some(MockResponse::Hang) => std::future::pending().await,
            None => Err(FeedError::Network("no response queued".to_string())),
        }
    }
}

pub fn song(id: &str, artist_id: &str) -> MediaItem {
    MediaItem::song(id, format!("Song {}", id), vec![ArtistRef::new(artist_id)])
}

pub fn layout(title: &str, items: Vec<MediaItem>) -> ContentLayout {
    ContentLayout::new(title, items)
}

pub fn chip(text: &str, params: &str) -> FilterChip {
    FilterChip {
        text: text.to_string(),
        params: params.to_string(),
    }
}

pub fn page(layouts: Vec<ContentLayout>, ctoken: Option<&str>) -> SongFeedLoadResult {
    SongFeedLoadResult {
        layouts,
        filter_chips: None,
        ctoken: ctoken.map(str::to_string),
    }
}

pub fn page_with_chips(layouts: Vec<ContentLayout>, chips: Vec<FilterChip>, ctoken: Option<&str>) -> SongFeedLoadResult {
    SongFeedLoadResult {
        filter_chips: Some(chips),
        ..page(layouts, ctoken)
    }
}

pub fn titles(layouts: Option<&[ContentLayout]>) -> Vec<String> {
    layouts
        .unwrap_or_default()
        .iter()
        .map(|layout| layout.title.clone().unwrap_or_default())
        .collect()
}
