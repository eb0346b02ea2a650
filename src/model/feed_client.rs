//! Song feed endpoint and its HTTP client for the feed server

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::FeedError;

use super::content::{ContentLayout, SongFeedLoadResult};

/// `min_rows` value that leaves the page size to the server
pub const NO_ROW_HINT: i32 = -1;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Source of personalised feed pages
#[async_trait]
pub trait SongFeedEndpoint: Send + Sync {
    async fn get_song_feed(
        &self,
        min_rows: i32,
        params: Option<&str>,
        continuation: Option<&str>,
    ) -> Result<SongFeedLoadResult, FeedError>;
}

/// The feed server answers either with a full page or a bare layout list
#[derive(Deserialize)]
#[serde(untagged)]
enum FeedResponse {
    Page(SongFeedLoadResult),
    Layouts(Vec<ContentLayout>),
}

impl From<FeedResponse> for SongFeedLoadResult {
    fn from(response: FeedResponse) -> Self {
        match response {
            FeedResponse::Page(page) => page,
            FeedResponse::Layouts(layouts) => SongFeedLoadResult {
                layouts,
                filter_chips: None,
                ctoken: None,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ServerStatus {
    /// Seconds since the server started
    pub uptime: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
    Started,
    AlreadyRefreshing,
}

#[derive(Deserialize)]
struct RefreshResponse {
    result: i32,
    #[serde(default)]
    error: Option<String>,
}

/// HTTP client for the feed server
#[derive(Clone)]
pub struct HttpSongFeedClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpSongFeedClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, FeedError> {
        let mut request = self.http.get(self.url(path)).query(query);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key)]);
        }

        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(FeedError::Unauthorized);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FeedError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn server_status(&self) -> Result<ServerStatus, FeedError> {
        let result = self.get_json("status/", &[]).await;
        crate::log_api_result!("server_status", result);
        result
    }

    /// Ask the server to rebuild its feed in the background
    pub async fn request_refresh(&self) -> Result<RefreshOutcome, FeedError> {
        let response: RefreshResponse = self.get_json("feed/refresh/", &[]).await?;
        match response.result {
            0 => Ok(RefreshOutcome::Started),
            1 => Ok(RefreshOutcome::AlreadyRefreshing),
            other => Err(FeedError::Status {
                status: StatusCode::OK.as_u16(),
                message: response.error.unwrap_or_else(|| format!("refresh result {}", other)),
            }),
        }
    }
}

#[async_trait]
impl SongFeedEndpoint for HttpSongFeedClient {
    async fn get_song_feed(
        &self,
        min_rows: i32,
        params: Option<&str>,
        continuation: Option<&str>,
    ) -> Result<SongFeedLoadResult, FeedError> {
        crate::log_api_request!("get_song_feed", min_rows, has_params = params.is_some(), continuing = continuation.is_some());

        let mut query = vec![("min_rows", min_rows.to_string())];
        if let Some(params) = params {
            query.push(("params", params.to_string()));
        }
        if let Some(continuation) = continuation {
            query.push(("ctoken", continuation.to_string()));
        }

        let result = self
            .get_json::<FeedResponse>("feed/", &query)
            .await
            .map(SongFeedLoadResult::from);
        crate::log_api_result!("get_song_feed", result);
        result
    }
}
