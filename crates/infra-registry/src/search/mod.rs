//! Free-text search over denormalized application documents
//!
//! The index is populated by an external ingestion process; this module only
//! reads from it. Documents may be stale relative to the registries.

use crate::{
    error::{RegistryError, Result},
    page::{Page, PageRequest},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

#[cfg(feature = "elasticsearch")]
pub mod elasticsearch;

/// An application flattened together with its team, members, project and owner
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplicationDocument {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub appteam_id: Option<i64>,
    pub project_id: Option<i64>,
    pub team_name: Option<String>,
    pub team_description: Option<String>,
    pub team_member_count: Option<i64>,
    pub team_member_ids: Vec<i64>,
    pub team_member_names: Vec<String>,
    pub team_member_emails: Vec<String>,
    pub project_name: Option<String>,
    pub project_description: Option<String>,
    pub project_owner_id: Option<i64>,
    pub project_owner_name: Option<String>,
    pub project_owner_email: Option<String>,
    /// Concatenated text the query string runs against
    pub search_text: Option<String>,
}

/// Read-only access to an application search index
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Run a free-text query and return one page of matching documents
    async fn search(&self, page: PageRequest, text: &str) -> Result<Page<ApplicationDocument>>;
}

pub(crate) fn require_query(text: &str) -> Result<&str> {
    let text = text.trim();
    if text.is_empty() {
        return Err(RegistryError::invalid_argument("searchText cannot be blank"));
    }
    Ok(text)
}

/// In-memory search index for testing
///
/// A document matches when any whitespace-separated query term occurs,
/// case-insensitively, in its `search_text`.
#[derive(Debug, Default)]
pub struct MemorySearchIndex {
    documents: RwLock<Vec<ApplicationDocument>>,
}

impl MemorySearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(documents: Vec<ApplicationDocument>) -> Self {
        Self {
            documents: RwLock::new(documents),
        }
    }
}

#[async_trait]
impl SearchIndex for MemorySearchIndex {
    async fn search(&self, page: PageRequest, text: &str) -> Result<Page<ApplicationDocument>> {
        let terms: Vec<String> = require_query(text)?
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();

        let documents = self.documents.read().await;
        let hits = documents
            .iter()
            .filter(|doc| {
                let haystack = doc.search_text.as_deref().unwrap_or_default().to_lowercase();
                terms.iter().any(|term| haystack.contains(term))
            })
            .cloned()
            .collect();

        Ok(Page::from_ordered(hits, page))
    }
}
