//! Acquisition request endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::acquisition::{Acquisition, AcquisitionQuery, ApproveAcquisition, CreateAcquisition, UpdateAcquisition},
};

use super::AuthenticatedUser;

/// List acquisition requests; trainers only see their own
#[utoipa::path(
    get,
    path = "/acquisitions",
    tag = "acquisitions",
    security(("bearer_auth" = [])),
    params(
        ("status" = Option<String>, Query, description = "pending, approved, rejected or delivered"),
        ("requested_by" = Option<i32>, Query, description = "Requester user ID")
    ),
    responses((status = 200, description = "Acquisitions", body = Vec<Acquisition>))
)]
pub async fn list_acquisitions(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<AcquisitionQuery>,
) -> AppResult<Json<Vec<Acquisition>>> {
    let rows = state
        .services
        .acquisitions
        .list(&claims.principal(), &query)
        .await?;
    Ok(Json(rows))
}

/// Get acquisition request by ID
#[utoipa::path(
    get,
    path = "/acquisitions/{id}",
    tag = "acquisitions",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Acquisition ID")),
    responses(
        (status = 200, description = "Acquisition", body = Acquisition),
        (status = 404, description = "Acquisition not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_acquisition(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Acquisition>> {
    let acquisition = state.services.acquisitions.get(&claims.principal(), id).await?;
    Ok(Json(acquisition))
}

/// Request an acquisition
#[utoipa::path(
    post,
    path = "/acquisitions",
    tag = "acquisitions",
    security(("bearer_auth" = [])),
    request_body = CreateAcquisition,
    responses(
        (status = 201, description = "Acquisition requested", body = Acquisition),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_acquisition(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateAcquisition>,
) -> AppResult<(StatusCode, Json<Acquisition>)> {
    let outcome = state
        .services
        .acquisitions
        .create(&claims.principal(), data)
        .await?;
    state.services.notifications.deliver(&outcome.notifications).await;
    Ok((StatusCode::CREATED, Json(outcome.entity)))
}

/// Edit a pending acquisition request
#[utoipa::path(
    put,
    path = "/acquisitions/{id}",
    tag = "acquisitions",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Acquisition ID")),
    request_body = UpdateAcquisition,
    responses(
        (status = 200, description = "Acquisition updated", body = Acquisition),
        (status = 403, description = "Not the requester or no longer pending", body = crate::error::ErrorResponse),
        (status = 409, description = "Modified concurrently", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_acquisition(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateAcquisition>,
) -> AppResult<Json<Acquisition>> {
    let acquisition = state
        .services
        .acquisitions
        .update(&claims.principal(), id, data)
        .await?;
    Ok(Json(acquisition))
}

/// Withdraw a pending acquisition request
#[utoipa::path(
    delete,
    path = "/acquisitions/{id}",
    tag = "acquisitions",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Acquisition ID")),
    responses(
        (status = 204, description = "Acquisition deleted"),
        (status = 403, description = "Not the requester or no longer pending", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_acquisition(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.acquisitions.delete(&claims.principal(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Approve a pending acquisition
#[utoipa::path(
    post,
    path = "/acquisitions/{id}/approve",
    tag = "acquisitions",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Acquisition ID")),
    request_body = ApproveAcquisition,
    responses(
        (status = 200, description = "Acquisition approved", body = Acquisition),
        (status = 400, description = "Negative amount", body = crate::error::ErrorResponse),
        (status = 403, description = "Not allowed", body = crate::error::ErrorResponse)
    )
)]
pub async fn approve_acquisition(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<ApproveAcquisition>,
) -> AppResult<Json<Acquisition>> {
    let outcome = state
        .services
        .acquisitions
        .approve(&claims.principal(), id, data)
        .await?;
    state.services.notifications.deliver(&outcome.notifications).await;
    Ok(Json(outcome.entity))
}

/// Reject a pending acquisition
#[utoipa::path(
    post,
    path = "/acquisitions/{id}/reject",
    tag = "acquisitions",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Acquisition ID")),
    responses(
        (status = 200, description = "Acquisition rejected", body = Acquisition),
        (status = 403, description = "Not allowed", body = crate::error::ErrorResponse)
    )
)]
pub async fn reject_acquisition(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Acquisition>> {
    let outcome = state.services.acquisitions.reject(&claims.principal(), id).await?;
    state.services.notifications.deliver(&outcome.notifications).await;
    Ok(Json(outcome.entity))
}

/// Mark an approved acquisition as delivered
#[utoipa::path(
    post,
    path = "/acquisitions/{id}/deliver",
    tag = "acquisitions",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Acquisition ID")),
    responses(
        (status = 200, description = "Acquisition delivered", body = Acquisition),
        (status = 422, description = "Acquisition is not approved", body = crate::error::ErrorResponse)
    )
)]
pub async fn deliver_acquisition(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Acquisition>> {
    let outcome = state
        .services
        .acquisitions
        .mark_delivered(&claims.principal(), id)
        .await?;
    state.services.notifications.deliver(&outcome.notifications).await;
    Ok(Json(outcome.entity))
}
