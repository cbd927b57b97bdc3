//! Equipment issue (incident report) model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::acquisition::Urgency;

/// Issue status, strictly linear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    Reported,
    InProgress,
    Resolved,
}

text_enum!(IssueStatus {
    Reported => "reported",
    InProgress => "in_progress",
    Resolved => "resolved",
});

/// Issue record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Issue {
    pub id: i32,
    pub status: IssueStatus,
    pub equipment_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub priority: Urgency,
    pub reported_by: i32,
    pub assigned_to: Option<i32>,
    pub reported_date: NaiveDate,
    pub resolved_date: Option<NaiveDate>,
    pub resolution_notes: Option<String>,
    pub version: i32,
}

/// Validated issue ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct NewIssue {
    pub equipment_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub priority: Urgency,
    pub reported_by: i32,
    pub reported_date: NaiveDate,
}

/// Report issue request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateIssue {
    pub equipment_id: i32,
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<Urgency>,
}

/// Resolve issue request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ResolveIssue {
    pub resolution_notes: String,
}
