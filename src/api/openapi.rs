//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{
    acquisitions, auth, checkouts, equipment, health, issues, notifications, providers, rooms, users,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Equipdesk API",
        version = "1.0.0",
        description = "Training center equipment inventory REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        // Rooms
        rooms::list_rooms,
        rooms::get_room,
        rooms::create_room,
        rooms::update_room,
        rooms::delete_room,
        // Providers
        providers::list_providers,
        providers::get_provider,
        providers::create_provider,
        providers::update_provider,
        providers::delete_provider,
        // Equipment
        equipment::list_equipment,
        equipment::get_equipment,
        equipment::create_equipment,
        equipment::update_equipment,
        equipment::delete_equipment,
        // Acquisitions
        acquisitions::list_acquisitions,
        acquisitions::get_acquisition,
        acquisitions::create_acquisition,
        acquisitions::update_acquisition,
        acquisitions::delete_acquisition,
        acquisitions::approve_acquisition,
        acquisitions::reject_acquisition,
        acquisitions::deliver_acquisition,
        // Checkouts
        checkouts::list_checkouts,
        checkouts::get_checkout,
        checkouts::create_checkout,
        checkouts::checkin,
        checkouts::update_overdue,
        // Issues
        issues::list_issues,
        issues::get_issue,
        issues::create_issue,
        issues::take_charge,
        issues::resolve_issue,
        // Notifications
        notifications::list_notifications,
        notifications::mark_read,
        notifications::mark_all_read,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            // Users
            crate::models::principal::Role,
            crate::models::user::User,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            // Inventory
            crate::models::room::Room,
            crate::models::room::CreateRoom,
            crate::models::room::UpdateRoom,
            crate::models::provider::Provider,
            crate::models::provider::CreateProvider,
            crate::models::provider::UpdateProvider,
            crate::models::equipment::Equipment,
            crate::models::equipment::EquipmentStatus,
            crate::models::equipment::CreateEquipment,
            crate::models::equipment::UpdateEquipment,
            // Acquisitions
            crate::models::acquisition::Acquisition,
            crate::models::acquisition::AcquisitionStatus,
            crate::models::acquisition::Urgency,
            crate::models::acquisition::CreateAcquisition,
            crate::models::acquisition::UpdateAcquisition,
            crate::models::acquisition::ApproveAcquisition,
            // Checkouts
            crate::models::checkout::Checkout,
            crate::models::checkout::CheckoutStatus,
            crate::models::checkout::CreateCheckout,
            crate::models::checkout::CheckInRequest,
            crate::services::sweep::SweepResult,
            // Issues
            crate::models::issue::Issue,
            crate::models::issue::IssueStatus,
            crate::models::issue::CreateIssue,
            crate::models::issue::ResolveIssue,
            // Notifications
            crate::models::notification::Notification,
            crate::models::notification::NotificationKind,
            notifications::MarkAllReadResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "User management"),
        (name = "rooms", description = "Rooms"),
        (name = "providers", description = "Equipment providers"),
        (name = "equipment", description = "Equipment inventory"),
        (name = "acquisitions", description = "Acquisition requests"),
        (name = "checkouts", description = "Equipment checkouts"),
        (name = "issues", description = "Equipment issues"),
        (name = "notifications", description = "User notifications")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
