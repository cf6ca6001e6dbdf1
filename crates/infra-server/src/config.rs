//! Server configuration management

use crate::error::{ApiError, Result};
use serde::{Deserialize, Serialize};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// sqlx connection string for the relational store
    pub database_url: String,

    pub database_max_connections: u32,

    /// Base URL of the Elasticsearch cluster
    pub elasticsearch_url: String,

    /// Index holding the application documents
    pub search_index: String,

    /// Accepted bearer tokens. Empty disables authentication.
    #[serde(skip_serializing)]
    pub api_tokens: Vec<String>,

    /// CORS allowed origins
    pub cors_origins: Vec<String>,
}

/// Split a comma separated variable, dropping empty entries
fn list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ApiError::Config("Invalid PORT value".to_string()))?,
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:infra.db".to_string()),
            database_max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| {
                    ApiError::Config("Invalid DATABASE_MAX_CONNECTIONS value".to_string())
                })?,
            elasticsearch_url: std::env::var("ELASTICSEARCH_URL")
                .unwrap_or_else(|_| "http://localhost:9200".to_string()),
            search_index: std::env::var("SEARCH_INDEX")
                .unwrap_or_else(|_| "applications".to_string()),
            api_tokens: list(&std::env::var("API_TOKENS").unwrap_or_default()),
            cors_origins: list(
                &std::env::var("CORS_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            ),
        })
    }

    pub fn auth_enabled(&self) -> bool {
        !self.api_tokens.is_empty()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: "sqlite:infra.db".to_string(),
            database_max_connections: 5,
            elasticsearch_url: "http://localhost:9200".to_string(),
            search_index: "applications".to_string(),
            api_tokens: Vec::new(),
            cors_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_drops_blank_entries() {
        assert_eq!(list(" a, b ,,c "), vec!["a", "b", "c"]);
        assert!(list("").is_empty());
    }

    #[test]
    fn test_default_has_auth_disabled() {
        assert!(!ServerConfig::default().auth_enabled());
    }
}
