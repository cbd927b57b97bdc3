//! Provider (supplier) endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::provider::{CreateProvider, Provider, UpdateProvider},
};

use super::AuthenticatedUser;

/// List providers
#[utoipa::path(
    get,
    path = "/providers",
    tag = "providers",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Providers", body = Vec<Provider>))
)]
pub async fn list_providers(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Provider>>> {
    Ok(Json(state.services.catalog.list_providers().await?))
}

/// Get provider by ID
#[utoipa::path(
    get,
    path = "/providers/{id}",
    tag = "providers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Provider ID")),
    responses((status = 200, description = "Provider", body = Provider))
)]
pub async fn get_provider(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Provider>> {
    Ok(Json(state.services.catalog.get_provider(id).await?))
}

/// Create provider
#[utoipa::path(
    post,
    path = "/providers",
    tag = "providers",
    security(("bearer_auth" = [])),
    request_body = CreateProvider,
    responses((status = 201, description = "Provider created", body = Provider))
)]
pub async fn create_provider(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateProvider>,
) -> AppResult<(StatusCode, Json<Provider>)> {
    claims.principal().require_staff()?;
    let provider = state.services.catalog.create_provider(data).await?;
    Ok((StatusCode::CREATED, Json(provider)))
}

/// Update provider
#[utoipa::path(
    put,
    path = "/providers/{id}",
    tag = "providers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Provider ID")),
    request_body = UpdateProvider,
    responses((status = 200, description = "Provider updated", body = Provider))
)]
pub async fn update_provider(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateProvider>,
) -> AppResult<Json<Provider>> {
    claims.principal().require_staff()?;
    Ok(Json(state.services.catalog.update_provider(id, data).await?))
}

/// Delete provider
#[utoipa::path(
    delete,
    path = "/providers/{id}",
    tag = "providers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Provider ID")),
    responses((status = 204, description = "Provider deleted"))
)]
pub async fn delete_provider(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.principal().require_staff()?;
    state.services.catalog.delete_provider(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
