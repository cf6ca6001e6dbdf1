//! Application team routes

use crate::{
    AppState,
    error::{ApiError, Result},
    models::{ApiResponse, PaginatedResponse, PaginationQuery, TeamRequest, TeamResponse},
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use axum_extra::extract::WithRejection;
use infra_registry::TeamId;
use tracing::{debug, info};

/// Create team routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_teams).post(create_team))
        .route("/{id}", get(get_team).put(update_team).delete(delete_team))
}

async fn list_teams(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<PaginationQuery>, ApiError>,
) -> Result<Json<PaginatedResponse<TeamResponse>>> {
    debug!("Listing teams page {} size {}", query.page, query.size);

    let page = state.registries.teams.list(query.to_request()?).await?;
    Ok(Json(PaginatedResponse::from_page(page, TeamResponse::from)))
}

async fn create_team(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<TeamRequest>, ApiError>,
) -> Result<impl IntoResponse> {
    request.validate()?;

    let team = state
        .registries
        .teams
        .create(&request.name, request.description.clone(), &request.member_ids())
        .await?;
    info!("Created team {} with {} members via API", team.id, team.members.len());

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/appteams/{}", team.id))],
        Json(ApiResponse::new(TeamResponse::from(team))),
    ))
}

async fn get_team(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<Json<ApiResponse<TeamResponse>>> {
    let team = state.registries.teams.get(TeamId(id)).await?;
    Ok(Json(ApiResponse::new(team.into())))
}

async fn update_team(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(request), _): WithRejection<Json<TeamRequest>, ApiError>,
) -> Result<Json<ApiResponse<TeamResponse>>> {
    request.validate()?;

    let team = state
        .registries
        .teams
        .update(
            TeamId(id),
            &request.name,
            request.description.clone(),
            &request.member_ids(),
        )
        .await?;
    Ok(Json(ApiResponse::new(team.into())))
}

async fn delete_team(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<StatusCode> {
    state.registries.teams.delete(TeamId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
