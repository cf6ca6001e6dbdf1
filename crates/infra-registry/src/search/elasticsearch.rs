//! Elasticsearch implementation of the search index
//!
//! Sends a `query_string` query against the `searchText` field of the
//! configured index and maps the hits into a [`Page`].

use super::{ApplicationDocument, SearchIndex, require_query};
use crate::{
    error::{RegistryError, Result},
    page::{Page, PageRequest},
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, warn};

/// Field the query string is matched against when the query names none
pub const DEFAULT_FIELD: &str = "searchText";

/// Deepest hit a cluster serves with its default `index.max_result_window`
pub const MAX_RESULT_WINDOW: u64 = 10_000;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Hits,
}

#[derive(Debug, Deserialize)]
struct Hits {
    total: Option<Total>,
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Total {
    value: u64,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_source")]
    source: Option<ApplicationDocument>,
}

/// Reject pages the cluster would refuse to serve
fn check_result_window(page: PageRequest) -> Result<()> {
    if page.offset() + page.limit() > MAX_RESULT_WINDOW {
        return Err(RegistryError::invalid_argument(format!(
            "page {} of size {} is beyond the first {} search results",
            page.page, page.size, MAX_RESULT_WINDOW
        )));
    }
    Ok(())
}

/// Build the `_search` request body for one page of a free-text query
fn query_body(page: PageRequest, text: &str) -> Value {
    json!({
        "query": {
            "query_string": {
                "default_field": DEFAULT_FIELD,
                "query": text,
            }
        },
        "from": page.offset(),
        "size": page.size,
    })
}

/// Turn a `_search` response into a page of documents
fn parse_response(response: SearchResponse, page: PageRequest) -> Page<ApplicationDocument> {
    let documents: Vec<ApplicationDocument> = response
        .hits
        .hits
        .into_iter()
        .filter_map(|hit| hit.source)
        .collect();
    let total = response
        .hits
        .total
        .map(|t| t.value)
        .unwrap_or(documents.len() as u64);

    Page::new(documents, page, total)
}

/// Search index backed by an Elasticsearch cluster
#[derive(Clone)]
pub struct ElasticsearchIndex {
    http: reqwest::Client,
    base_url: String,
    index: String,
}

impl std::fmt::Debug for ElasticsearchIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElasticsearchIndex")
            .field("base_url", &self.base_url)
            .field("index", &self.index)
            .finish()
    }
}

impl ElasticsearchIndex {
    /// Create a client for `index` on the cluster at `base_url`
    pub fn new(base_url: impl Into<String>, index: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("infra-registry/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| RegistryError::Search(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            index: index.into(),
        })
    }

    fn search_url(&self) -> String {
        format!("{}/{}/_search", self.base_url, self.index)
    }
}

#[async_trait]
impl SearchIndex for ElasticsearchIndex {
    async fn search(&self, page: PageRequest, text: &str) -> Result<Page<ApplicationDocument>> {
        let text = require_query(text)?;
        check_result_window(page)?;
        debug!("Searching index {} for {:?} ({:?})", self.index, text, page);

        let response = self
            .http
            .post(self.search_url())
            .json(&query_body(page, text))
            .send()
            .await
            .map_err(|e| RegistryError::Search(format!("Search request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Search index {} returned {}: {}", self.index, status, body);
            // Malformed query strings come back as 400
            if status == reqwest::StatusCode::BAD_REQUEST {
                return Err(RegistryError::invalid_argument(format!(
                    "Search query rejected: {}",
                    body
                )));
            }
            return Err(RegistryError::Search(format!(
                "Search index returned {}: {}",
                status, body
            )));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| RegistryError::Search(format!("Invalid search response: {}", e)))?;

        Ok(parse_response(parsed, page))
    }
}
