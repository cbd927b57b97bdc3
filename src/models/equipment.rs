//! Equipment model

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Equipment availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentStatus {
    #[default]
    Available,
    CheckedOut,
    Maintenance,
    Retired,
}

text_enum!(EquipmentStatus {
    Available => "available",
    CheckedOut => "checked_out",
    Maintenance => "maintenance",
    Retired => "retired",
});

/// Equipment record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Equipment {
    pub id: i32,
    pub name: String,
    pub serial_number: Option<String>,
    pub category: Option<String>,
    pub status: EquipmentStatus,
    pub room_id: Option<i32>,
    pub provider_id: Option<i32>,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_price: Option<Decimal>,
    pub notes: Option<String>,
    pub crea_date: Option<DateTime<Utc>>,
    pub modif_date: Option<DateTime<Utc>>,
}

/// Create equipment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEquipment {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    pub serial_number: Option<String>,
    pub category: Option<String>,
    pub room_id: Option<i32>,
    pub provider_id: Option<i32>,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_price: Option<Decimal>,
    pub notes: Option<String>,
}

/// Update equipment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateEquipment {
    #[validate(length(min = 1, max = 255, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub serial_number: Option<String>,
    pub category: Option<String>,
    /// `checked_out` is managed by checkouts and cannot be set directly
    pub status: Option<EquipmentStatus>,
    pub room_id: Option<i32>,
    pub provider_id: Option<i32>,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_price: Option<Decimal>,
    pub notes: Option<String>,
}
