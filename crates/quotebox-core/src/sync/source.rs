//! Remote quote sources
//!
//! The server publishes a JSON array of posts. Only the `title` of each post
//! is used: it becomes the text of a quote in the [`SERVER_CATEGORY`].

use std::future::Future;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::error::{QuoteError, QuoteResult};
use crate::models::Quote;

/// Category given to every quote fetched from the server
pub const SERVER_CATEGORY: &str = "Server";

/// Number of posts taken from each response
pub const MAX_REMOTE_QUOTES: usize = 5;

/// Default endpoint polled for server quotes
pub const DEFAULT_SYNC_URL: &str = "https://jsonplaceholder.typicode.com/posts";

/// Fetch timeout in seconds
const FETCH_TIMEOUT: u64 = 10;

/// Something the sync engine can pull quotes from
pub trait RemoteSource: Send + Sync {
    /// Fetch the current remote quote set
    fn fetch(&self) -> impl Future<Output = QuoteResult<Vec<Quote>>> + Send;
}

/// HTTP source reading a posts endpoint
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
    limit: usize,
}

impl HttpSource {
    /// Create a source for `url` taking at most [`MAX_REMOTE_QUOTES`] posts
    pub fn new(url: impl Into<String>) -> QuoteResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT))
            .user_agent(concat!("quotebox/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
            limit: MAX_REMOTE_QUOTES,
        })
    }

    /// Override how many posts are taken per fetch
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

impl RemoteSource for HttpSource {
    async fn fetch(&self) -> QuoteResult<Vec<Quote>> {
        debug!("Fetching server quotes from {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuoteError::Transport(format!(
                "{} returned {}",
                self.url, status
            )));
        }

        let body = response.text().await?;
        parse_posts(&body, self.limit)
    }
}

/// Map a posts document to server quotes
///
/// Takes the first `limit` elements. Elements without a non-blank string
/// `title` are dropped.
pub fn parse_posts(body: &str, limit: usize) -> QuoteResult<Vec<Quote>> {
    let value: Value = serde_json::from_str(body)?;
    let Value::Array(posts) = value else {
        return Err(QuoteError::Format(
            "expected a JSON array of posts".to_string(),
        ));
    };

    Ok(posts
        .iter()
        .take(limit)
        .filter_map(|post| post.get("title")?.as_str())
        .filter_map(|title| Quote::new(title, SERVER_CATEGORY).ok())
        .collect())
}
