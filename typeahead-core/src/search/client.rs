//! ``src/search/client.rs``
//! ============================================================================
//! # Query Executor: remote lookup over HTTP
//!
//! `SearchBackend` is the seam between the widget and the network. The HTTP
//! implementation issues a single GET per query and reports status,
//! transport and body errors as `AppError`; it never retries.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::{debug, instrument};

use crate::{
    config::SearchConfig,
    error::AppError,
    search::response::{SearchHits, SearchResponse},
};

/// Anything that can answer a trimmed, non-empty query.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &str) -> Result<SearchHits, AppError>;
}

/// `GET {endpoint}?{param}={query}` against a JSON search endpoint.
#[derive(Debug, Clone)]
pub struct HttpSearchClient {
    client: Client,
    endpoint: Url,
    query_param: String,
}

impl HttpSearchClient {
    pub fn new(cfg: &SearchConfig) -> Result<Self, AppError> {
        let endpoint = Url::parse(&cfg.endpoint)
            .map_err(|e| AppError::invalid_endpoint(&cfg.endpoint, e.to_string()))?;

        let client = Client::builder()
            .timeout(cfg.request_timeout)
            .user_agent(cfg.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            endpoint,
            query_param: cfg.query_param.clone(),
        })
    }

    /// Full request URL for `query`, percent-encoded.
    #[must_use]
    pub fn request_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair(&self.query_param, query);
        url
    }
}

#[async_trait]
impl SearchBackend for HttpSearchClient {
    #[instrument(level = "debug", skip(self), fields(endpoint = %self.endpoint))]
    async fn search(&self, query: &str) -> Result<SearchHits, AppError> {
        let url = self.request_url(query);
        let start = Instant::now();

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::status(status.as_u16(), url.as_str()));
        }

        let body = response.bytes().await?;
        let parsed = SearchResponse::from_slice(&body)?;

        debug!(
            docs = parsed.docs.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "search response parsed"
        );
        Ok(parsed.into())
    }
}
