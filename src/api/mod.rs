//! API handlers for Equipdesk REST endpoints

pub mod acquisitions;
pub mod auth;
pub mod checkouts;
pub mod equipment;
pub mod health;
pub mod issues;
pub mod notifications;
pub mod openapi;
pub mod providers;
pub mod rooms;
pub mod users;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, models::principal::UserClaims, AppState};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        // Users
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/:id",
            get(users::get_user).put(users::update_user).delete(users::delete_user),
        )
        // Rooms
        .route("/rooms", get(rooms::list_rooms).post(rooms::create_room))
        .route(
            "/rooms/:id",
            get(rooms::get_room).put(rooms::update_room).delete(rooms::delete_room),
        )
        // Providers
        .route("/providers", get(providers::list_providers).post(providers::create_provider))
        .route(
            "/providers/:id",
            get(providers::get_provider)
                .put(providers::update_provider)
                .delete(providers::delete_provider),
        )
        // Equipment
        .route("/equipment", get(equipment::list_equipment).post(equipment::create_equipment))
        .route(
            "/equipment/:id",
            get(equipment::get_equipment)
                .put(equipment::update_equipment)
                .delete(equipment::delete_equipment),
        )
        // Acquisitions
        .route(
            "/acquisitions",
            get(acquisitions::list_acquisitions).post(acquisitions::create_acquisition),
        )
        .route(
            "/acquisitions/:id",
            get(acquisitions::get_acquisition)
                .put(acquisitions::update_acquisition)
                .delete(acquisitions::delete_acquisition),
        )
        .route("/acquisitions/:id/approve", post(acquisitions::approve_acquisition))
        .route("/acquisitions/:id/reject", post(acquisitions::reject_acquisition))
        .route("/acquisitions/:id/deliver", post(acquisitions::deliver_acquisition))
        // Checkouts
        .route("/checkouts", get(checkouts::list_checkouts).post(checkouts::create_checkout))
        .route("/checkouts/update-overdue", post(checkouts::update_overdue))
        .route("/checkouts/:id", get(checkouts::get_checkout))
        .route("/checkouts/:id/checkin", post(checkouts::checkin))
        // Issues
        .route("/issues", get(issues::list_issues).post(issues::create_issue))
        .route("/issues/:id", get(issues::get_issue))
        .route("/issues/:id/take-charge", post(issues::take_charge))
        .route("/issues/:id/resolve", post(issues::resolve_issue))
        // Notifications
        .route("/notifications", get(notifications::list_notifications))
        .route("/notifications/read-all", post(notifications::mark_all_read))
        .route("/notifications/:id/read", post(notifications::mark_read))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
