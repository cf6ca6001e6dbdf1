//! Free-text search over the application index

use crate::{
    AppState,
    error::{ApiError, Result},
    models::{PaginatedResponse, PaginationQuery},
};
use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use axum_extra::extract::WithRejection;
use infra_registry::ApplicationDocument;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(rename = "searchText")]
    pub search_text: Option<String>,
}

/// Create search routes
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(search_applications))
}

async fn search_applications(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<SearchParams>, ApiError>,
    WithRejection(Query(query), _): WithRejection<Query<PaginationQuery>, ApiError>,
) -> Result<Json<PaginatedResponse<ApplicationDocument>>> {
    let text = params
        .search_text
        .ok_or_else(|| ApiError::validation("searchText is required"))?;
    debug!("Searching applications for {:?}", text);

    let page = state.search.search(query.to_request()?, &text).await?;
    Ok(Json(PaginatedResponse::from_page(page, |doc| doc)))
}
