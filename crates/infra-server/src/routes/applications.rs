//! Application routes

use crate::{
    AppState,
    error::{ApiError, Result},
    models::{
        ApiResponse, ApplicationRequest, ApplicationResponse, PaginatedResponse, PaginationQuery,
    },
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use axum_extra::extract::WithRejection;
use infra_registry::ApplicationId;
use tracing::{debug, info};

/// Create application routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_applications).post(create_application))
        .route(
            "/{id}",
            get(get_application)
                .put(update_application)
                .delete(delete_application),
        )
}

async fn list_applications(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<PaginationQuery>, ApiError>,
) -> Result<Json<PaginatedResponse<ApplicationResponse>>> {
    debug!("Listing applications page {} size {}", query.page, query.size);

    let page = state.registries.applications.list(query.to_request()?).await?;
    Ok(Json(PaginatedResponse::from_page(
        page,
        ApplicationResponse::from,
    )))
}

async fn create_application(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<ApplicationRequest>, ApiError>,
) -> Result<impl IntoResponse> {
    request.validate()?;

    let app = state
        .registries
        .applications
        .create(
            &request.name,
            request.description.clone(),
            request.team_id(),
            request.project_id(),
        )
        .await?;
    info!("Created application {} via API", app.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/applications/{}", app.id))],
        Json(ApiResponse::new(ApplicationResponse::from(app))),
    ))
}

async fn get_application(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<Json<ApiResponse<ApplicationResponse>>> {
    let app = state.registries.applications.get(ApplicationId(id)).await?;
    Ok(Json(ApiResponse::new(app.into())))
}

async fn update_application(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(request), _): WithRejection<Json<ApplicationRequest>, ApiError>,
) -> Result<Json<ApiResponse<ApplicationResponse>>> {
    request.validate()?;

    let app = state
        .registries
        .applications
        .update(ApplicationId(id), request.into())
        .await?;
    Ok(Json(ApiResponse::new(app.into())))
}

async fn delete_application(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<StatusCode> {
    state.registries.applications.delete(ApplicationId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
