//! Checkout (equipment loan) model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Checkout status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStatus {
    InProgress,
    Returned,
    /// Recomputed by the overdue sweep, not real-time
    Overdue,
}

text_enum!(CheckoutStatus {
    InProgress => "in_progress",
    Returned => "returned",
    Overdue => "overdue",
});

impl CheckoutStatus {
    /// Equipment is still out with the borrower
    pub fn is_open(&self) -> bool {
        match self {
            CheckoutStatus::InProgress | CheckoutStatus::Overdue => true,
            CheckoutStatus::Returned => false,
        }
    }
}

/// Checkout record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Checkout {
    pub id: i32,
    pub status: CheckoutStatus,
    pub equipment_id: i32,
    /// Borrower
    pub user_id: i32,
    pub checkout_date: NaiveDate,
    pub expected_return_date: NaiveDate,
    pub actual_return_date: Option<NaiveDate>,
    pub checked_out_by: i32,
    pub checked_in_by: Option<i32>,
    pub notes: Option<String>,
    pub version: i32,
}

/// Validated checkout ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct NewCheckout {
    pub equipment_id: i32,
    pub user_id: i32,
    pub checkout_date: NaiveDate,
    pub expected_return_date: NaiveDate,
    pub checked_out_by: i32,
    pub notes: Option<String>,
}

/// Check out request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCheckout {
    pub equipment_id: i32,
    /// Borrower user ID
    pub user_id: i32,
    pub expected_return_date: NaiveDate,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Check in request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CheckInRequest {
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}
