//! Room endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::room::{CreateRoom, Room, UpdateRoom},
};

use super::AuthenticatedUser;

/// List rooms
#[utoipa::path(
    get,
    path = "/rooms",
    tag = "rooms",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Rooms", body = Vec<Room>))
)]
pub async fn list_rooms(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Room>>> {
    Ok(Json(state.services.catalog.list_rooms().await?))
}

/// Get room by ID
#[utoipa::path(
    get,
    path = "/rooms/{id}",
    tag = "rooms",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Room ID")),
    responses((status = 200, description = "Room", body = Room))
)]
pub async fn get_room(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Room>> {
    Ok(Json(state.services.catalog.get_room(id).await?))
}

/// Create room
#[utoipa::path(
    post,
    path = "/rooms",
    tag = "rooms",
    security(("bearer_auth" = [])),
    request_body = CreateRoom,
    responses((status = 201, description = "Room created", body = Room))
)]
pub async fn create_room(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateRoom>,
) -> AppResult<(StatusCode, Json<Room>)> {
    claims.principal().require_staff()?;
    let room = state.services.catalog.create_room(data).await?;
    Ok((StatusCode::CREATED, Json(room)))
}

/// Update room
#[utoipa::path(
    put,
    path = "/rooms/{id}",
    tag = "rooms",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Room ID")),
    request_body = UpdateRoom,
    responses((status = 200, description = "Room updated", body = Room))
)]
pub async fn update_room(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateRoom>,
) -> AppResult<Json<Room>> {
    claims.principal().require_staff()?;
    Ok(Json(state.services.catalog.update_room(id, data).await?))
}

/// Delete room
#[utoipa::path(
    delete,
    path = "/rooms/{id}",
    tag = "rooms",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Room ID")),
    responses((status = 204, description = "Room deleted"))
)]
pub async fn delete_room(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.principal().require_staff()?;
    state.services.catalog.delete_room(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
