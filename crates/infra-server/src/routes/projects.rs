//! Project management routes

use crate::{
    AppState,
    error::{ApiError, Result},
    models::{ApiResponse, PaginatedResponse, PaginationQuery, ProjectRequest, ProjectResponse},
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use axum_extra::extract::WithRejection;
use infra_registry::ProjectId;
use tracing::{debug, info};

/// Create project routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_projects).post(create_project))
        .route("/by-name/{name}", get(get_project_by_name))
        .route(
            "/{id}",
            get(get_project).put(update_project).delete(delete_project),
        )
}

async fn list_projects(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<PaginationQuery>, ApiError>,
) -> Result<Json<PaginatedResponse<ProjectResponse>>> {
    debug!("Listing projects page {} size {}", query.page, query.size);

    let page = state.registries.projects.list(query.to_request()?).await?;
    Ok(Json(PaginatedResponse::from_page(page, ProjectResponse::from)))
}

async fn create_project(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<ProjectRequest>, ApiError>,
) -> Result<impl IntoResponse> {
    request.validate()?;

    let project = state
        .registries
        .projects
        .create(&request.name, request.description, request.owner_name)
        .await?;
    info!("Created project {} via API", project.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/projects/{}", project.id))],
        Json(ApiResponse::new(ProjectResponse::from(project))),
    ))
}

async fn get_project(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<Json<ApiResponse<ProjectResponse>>> {
    let project = state.registries.projects.get(ProjectId(id)).await?;
    Ok(Json(ApiResponse::new(project.into())))
}

async fn get_project_by_name(
    State(state): State<AppState>,
    WithRejection(Path(name), _): WithRejection<Path<String>, ApiError>,
) -> Result<Json<ApiResponse<ProjectResponse>>> {
    let project = state.registries.projects.get_by_name(&name).await?;
    Ok(Json(ApiResponse::new(project.into())))
}

async fn update_project(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(request), _): WithRejection<Json<ProjectRequest>, ApiError>,
) -> Result<Json<ApiResponse<ProjectResponse>>> {
    request.validate()?;

    let project = state
        .registries
        .projects
        .update(ProjectId(id), request.into())
        .await?;
    Ok(Json(ApiResponse::new(project.into())))
}

async fn delete_project(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<StatusCode> {
    state.registries.projects.delete(ProjectId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
