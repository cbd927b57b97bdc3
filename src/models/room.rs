//! Room model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Room where equipment is stored or used
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Room {
    pub id: i32,
    pub name: String,
    pub building: Option<String>,
    pub floor: Option<String>,
    pub capacity: Option<i32>,
    pub notes: Option<String>,
}

/// Create room request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRoom {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    pub building: Option<String>,
    pub floor: Option<String>,
    #[validate(range(min = 0))]
    pub capacity: Option<i32>,
    pub notes: Option<String>,
}

/// Update room request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRoom {
    #[validate(length(min = 1, max = 255, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub building: Option<String>,
    pub floor: Option<String>,
    #[validate(range(min = 0))]
    pub capacity: Option<i32>,
    pub notes: Option<String>,
}
