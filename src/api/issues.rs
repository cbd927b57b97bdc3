//! Equipment issue endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::AppResult,
    models::issue::{CreateIssue, Issue, IssueStatus, ResolveIssue},
};

use super::AuthenticatedUser;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IssueQuery {
    pub status: Option<IssueStatus>,
}

/// List issues
#[utoipa::path(
    get,
    path = "/issues",
    tag = "issues",
    security(("bearer_auth" = [])),
    params(IssueQuery),
    responses((status = 200, description = "Issues", body = Vec<Issue>))
)]
pub async fn list_issues(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<IssueQuery>,
) -> AppResult<Json<Vec<Issue>>> {
    Ok(Json(state.services.issues.list(query.status).await?))
}

/// Get issue by ID
#[utoipa::path(
    get,
    path = "/issues/{id}",
    tag = "issues",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Issue ID")),
    responses(
        (status = 200, description = "Issue", body = Issue),
        (status = 404, description = "Issue not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_issue(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Issue>> {
    Ok(Json(state.services.issues.get(id).await?))
}

/// Report an issue on a piece of equipment
#[utoipa::path(
    post,
    path = "/issues",
    tag = "issues",
    security(("bearer_auth" = [])),
    request_body = CreateIssue,
    responses(
        (status = 201, description = "Issue reported", body = Issue),
        (status = 404, description = "Equipment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_issue(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateIssue>,
) -> AppResult<(StatusCode, Json<Issue>)> {
    let outcome = state.services.issues.report(&claims.principal(), data).await?;
    state.services.notifications.deliver(&outcome.notifications).await;
    Ok((StatusCode::CREATED, Json(outcome.entity)))
}

/// Take charge of a reported issue
#[utoipa::path(
    post,
    path = "/issues/{id}/take-charge",
    tag = "issues",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Issue ID")),
    responses(
        (status = 200, description = "Issue in progress", body = Issue),
        (status = 422, description = "Issue is not in reported state", body = crate::error::ErrorResponse)
    )
)]
pub async fn take_charge(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Issue>> {
    let outcome = state.services.issues.take_charge(&claims.principal(), id).await?;
    state.services.notifications.deliver(&outcome.notifications).await;
    Ok(Json(outcome.entity))
}

/// Resolve an issue in progress
#[utoipa::path(
    post,
    path = "/issues/{id}/resolve",
    tag = "issues",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Issue ID")),
    request_body = ResolveIssue,
    responses(
        (status = 200, description = "Issue resolved", body = Issue),
        (status = 403, description = "Not the assignee", body = crate::error::ErrorResponse),
        (status = 422, description = "Issue is not in progress", body = crate::error::ErrorResponse)
    )
)]
pub async fn resolve_issue(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<ResolveIssue>,
) -> AppResult<Json<Issue>> {
    let outcome = state
        .services
        .issues
        .resolve(&claims.principal(), id, data)
        .await?;
    state.services.notifications.deliver(&outcome.notifications).await;
    Ok(Json(outcome.entity))
}
