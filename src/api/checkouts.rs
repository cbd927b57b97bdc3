//! Checkout endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::AppResult,
    models::checkout::{CheckInRequest, Checkout, CheckoutStatus, CreateCheckout},
    services::sweep::SweepResult,
};

use super::AuthenticatedUser;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CheckoutQuery {
    pub status: Option<CheckoutStatus>,
}

/// List checkouts
#[utoipa::path(
    get,
    path = "/checkouts",
    tag = "checkouts",
    security(("bearer_auth" = [])),
    params(CheckoutQuery),
    responses((status = 200, description = "Checkouts", body = Vec<Checkout>))
)]
pub async fn list_checkouts(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<CheckoutQuery>,
) -> AppResult<Json<Vec<Checkout>>> {
    Ok(Json(state.services.checkouts.list(query.status).await?))
}

/// Get checkout by ID
#[utoipa::path(
    get,
    path = "/checkouts/{id}",
    tag = "checkouts",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Checkout ID")),
    responses(
        (status = 200, description = "Checkout", body = Checkout),
        (status = 404, description = "Checkout not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_checkout(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Checkout>> {
    Ok(Json(state.services.checkouts.get(id).await?))
}

/// Check equipment out to a user
#[utoipa::path(
    post,
    path = "/checkouts",
    tag = "checkouts",
    security(("bearer_auth" = [])),
    request_body = CreateCheckout,
    responses(
        (status = 201, description = "Equipment checked out", body = Checkout),
        (status = 409, description = "Equipment already checked out", body = crate::error::ErrorResponse),
        (status = 422, description = "Equipment in maintenance or retired", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_checkout(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateCheckout>,
) -> AppResult<(StatusCode, Json<Checkout>)> {
    let outcome = state
        .services
        .checkouts
        .check_out(&claims.principal(), data)
        .await?;
    state.services.notifications.deliver(&outcome.notifications).await;
    Ok((StatusCode::CREATED, Json(outcome.entity)))
}

/// Register the return of checked out equipment
#[utoipa::path(
    post,
    path = "/checkouts/{id}/checkin",
    tag = "checkouts",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Checkout ID")),
    request_body = CheckInRequest,
    responses(
        (status = 200, description = "Equipment returned", body = Checkout),
        (status = 422, description = "Already returned", body = crate::error::ErrorResponse)
    )
)]
pub async fn checkin(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    body: Option<Json<CheckInRequest>>,
) -> AppResult<Json<Checkout>> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let outcome = state
        .services
        .checkouts
        .check_in(&claims.principal(), id, request)
        .await?;
    state.services.notifications.deliver(&outcome.notifications).await;
    Ok(Json(outcome.entity))
}

/// Mark late checkouts as overdue now
#[utoipa::path(
    post,
    path = "/checkouts/update-overdue",
    tag = "checkouts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Sweep result", body = SweepResult),
        (status = 403, description = "Staff only", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_overdue(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<SweepResult>> {
    claims.principal().require_staff()?;
    let result = state.services.sweep.run().await?;
    state.services.notifications.deliver(&result.notifications).await;
    Ok(Json(result))
}
