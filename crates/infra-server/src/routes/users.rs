//! User management routes

use crate::{
    AppState,
    error::{ApiError, Result},
    models::{
        ApiResponse, CreateUserRequest, PaginatedResponse, PaginationQuery, UpdateUserRequest,
        UserResponse,
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
use infra_registry::UserId;
use tracing::{debug, info};

/// Create user routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/by-name/{name}", get(get_user_by_name))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
}

async fn list_users(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<PaginationQuery>, ApiError>,
) -> Result<Json<PaginatedResponse<UserResponse>>> {
    debug!("Listing users page {} size {}", query.page, query.size);

    let page = state.registries.users.list(query.to_request()?).await?;
    Ok(Json(PaginatedResponse::from_page(page, UserResponse::from)))
}

async fn create_user(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<CreateUserRequest>, ApiError>,
) -> Result<impl IntoResponse> {
    request.validate()?;

    let user = state
        .registries
        .users
        .create(&request.name, &request.email, &request.password)
        .await?;
    info!("Created user {} via API", user.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/users/{}", user.id))],
        Json(ApiResponse::new(UserResponse::from(user))),
    ))
}

async fn get_user(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<Json<ApiResponse<UserResponse>>> {
    let user = state.registries.users.get(UserId(id)).await?;
    Ok(Json(ApiResponse::new(user.into())))
}

async fn get_user_by_name(
    State(state): State<AppState>,
    WithRejection(Path(name), _): WithRejection<Path<String>, ApiError>,
) -> Result<Json<ApiResponse<UserResponse>>> {
    let user = state.registries.users.get_by_name(&name).await?;
    Ok(Json(ApiResponse::new(user.into())))
}

async fn update_user(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateUserRequest>, ApiError>,
) -> Result<Json<ApiResponse<UserResponse>>> {
    request.validate()?;

    let user = state
        .registries
        .users
        .update(UserId(id), request.into())
        .await?;
    Ok(Json(ApiResponse::new(user.into())))
}

async fn delete_user(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<StatusCode> {
    state.registries.users.delete(UserId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
