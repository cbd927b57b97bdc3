//! Acquisition (purchase request) model

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Acquisition status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionStatus {
    Pending,
    Approved,
    Rejected,
    Delivered,
}

text_enum!(AcquisitionStatus {
    Pending => "pending",
    Approved => "approved",
    Rejected => "rejected",
    Delivered => "delivered",
});

impl AcquisitionStatus {
    /// Whether a decision (approval or rejection) has been recorded
    pub fn is_decided(&self) -> bool {
        match self {
            AcquisitionStatus::Pending => false,
            AcquisitionStatus::Approved | AcquisitionStatus::Rejected | AcquisitionStatus::Delivered => true,
        }
    }
}

/// Request urgency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    High,
    #[default]
    Normal,
    Low,
}

text_enum!(Urgency {
    High => "high",
    Normal => "normal",
    Low => "low",
});

/// Acquisition record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Acquisition {
    pub id: i32,
    /// What is being requested
    pub equipment_name: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub provider_id: Option<i32>,
    pub justification: Option<String>,
    pub status: AcquisitionStatus,
    pub urgency: Urgency,
    pub requested_by: i32,
    pub approved_by: Option<i32>,
    /// Amount granted on approval
    pub amount: Option<Decimal>,
    pub request_date: NaiveDate,
    pub approval_date: Option<NaiveDate>,
    pub delivery_date: Option<NaiveDate>,
    /// Optimistic concurrency token
    pub version: i32,
}

/// Validated acquisition ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct NewAcquisition {
    pub equipment_name: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub provider_id: Option<i32>,
    pub justification: Option<String>,
    pub urgency: Urgency,
    pub requested_by: i32,
    pub request_date: NaiveDate,
}

/// Create acquisition request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAcquisition {
    #[validate(length(min = 1, max = 255, message = "Equipment name is required"))]
    pub equipment_name: String,
    pub description: Option<String>,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: Option<i32>,
    pub provider_id: Option<i32>,
    pub justification: Option<String>,
    pub urgency: Option<Urgency>,
}

/// Update acquisition request (only while pending)
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAcquisition {
    #[validate(length(min = 1, max = 255, message = "Equipment name cannot be empty"))]
    pub equipment_name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: Option<i32>,
    pub provider_id: Option<i32>,
    pub justification: Option<String>,
    pub urgency: Option<Urgency>,
}

/// Approve acquisition request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ApproveAcquisition {
    /// Granted amount, must be non-negative
    #[schema(value_type = String, example = "1299.90")]
    pub amount: Decimal,
}

/// Acquisition list filter
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AcquisitionQuery {
    pub status: Option<AcquisitionStatus>,
    pub requested_by: Option<i32>,
}
