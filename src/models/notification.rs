//! Notifications and the intents that produce them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::principal::Role;

/// Kind of entity a notification points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Acquisition,
    Checkout,
    Issue,
    Equipment,
}

text_enum!(EntityKind {
    Acquisition => "acquisition",
    Checkout => "checkout",
    Issue => "issue",
    Equipment => "equipment",
});

/// Typed reference to a related entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum EntityRef {
    Acquisition(i32),
    Checkout(i32),
    Issue(i32),
    Equipment(i32),
}

impl EntityRef {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRef::Acquisition(_) => EntityKind::Acquisition,
            EntityRef::Checkout(_) => EntityKind::Checkout,
            EntityRef::Issue(_) => EntityKind::Issue,
            EntityRef::Equipment(_) => EntityKind::Equipment,
        }
    }

    pub fn id(&self) -> i32 {
        match *self {
            EntityRef::Acquisition(id)
            | EntityRef::Checkout(id)
            | EntityRef::Issue(id)
            | EntityRef::Equipment(id) => id,
        }
    }

    pub fn from_parts(kind: EntityKind, id: i32) -> Self {
        match kind {
            EntityKind::Acquisition => EntityRef::Acquisition(id),
            EntityKind::Checkout => EntityRef::Checkout(id),
            EntityKind::Issue => EntityRef::Issue(id),
            EntityKind::Equipment => EntityRef::Equipment(id),
        }
    }

    /// API path of the referenced entity
    pub fn path(&self) -> String {
        match self {
            EntityRef::Acquisition(id) => format!("/acquisitions/{}", id),
            EntityRef::Checkout(id) => format!("/checkouts/{}", id),
            EntityRef::Issue(id) => format!("/issues/{}", id),
            EntityRef::Equipment(id) => format!("/equipment/{}", id),
        }
    }
}

/// What happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    AcquisitionRequested,
    AcquisitionApproved,
    AcquisitionRejected,
    AcquisitionDelivered,
    CheckoutCreated,
    CheckoutOverdue,
    IssueReported,
    IssueAssigned,
    IssueResolved,
}

text_enum!(NotificationKind {
    AcquisitionRequested => "acquisition_requested",
    AcquisitionApproved => "acquisition_approved",
    AcquisitionRejected => "acquisition_rejected",
    AcquisitionDelivered => "acquisition_delivered",
    CheckoutCreated => "checkout_created",
    CheckoutOverdue => "checkout_overdue",
    IssueReported => "issue_reported",
    IssueAssigned => "issue_assigned",
    IssueResolved => "issue_resolved",
});

impl NotificationKind {
    /// Human readable message for this kind of event on `entity`
    pub fn message(&self, entity: &EntityRef) -> String {
        let id = entity.id();
        match self {
            NotificationKind::AcquisitionRequested => format!("New acquisition request #{}", id),
            NotificationKind::AcquisitionApproved => format!("Acquisition request #{} was approved", id),
            NotificationKind::AcquisitionRejected => format!("Acquisition request #{} was rejected", id),
            NotificationKind::AcquisitionDelivered => format!("Acquisition #{} has been delivered", id),
            NotificationKind::CheckoutCreated => format!("Equipment checked out to you (checkout #{})", id),
            NotificationKind::CheckoutOverdue => format!("Checkout #{} is overdue, please return the equipment", id),
            NotificationKind::IssueReported => format!("New issue reported (#{})", id),
            NotificationKind::IssueAssigned => format!("Issue #{} is being handled", id),
            NotificationKind::IssueResolved => format!("Issue #{} has been resolved", id),
        }
    }
}

/// Who should be told
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Recipient {
    User(i32),
    /// Every active user holding the role
    Role(Role),
}

/// Side-effect request emitted by a lifecycle transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationIntent {
    pub kind: NotificationKind,
    pub entity: EntityRef,
    pub recipients: Vec<Recipient>,
}

impl NotificationIntent {
    pub fn new(kind: NotificationKind, entity: EntityRef, recipients: Vec<Recipient>) -> Self {
        Self { kind, entity, recipients }
    }

    /// Intent addressed to managers and administrators
    pub fn to_staff(kind: NotificationKind, entity: EntityRef) -> Self {
        Self::new(
            kind,
            entity,
            vec![Recipient::Role(Role::Administrator), Recipient::Role(Role::Manager)],
        )
    }

    pub fn to_user(kind: NotificationKind, entity: EntityRef, user_id: i32) -> Self {
        Self::new(kind, entity, vec![Recipient::User(user_id)])
    }
}

/// Notification ready for insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub user_id: i32,
    pub kind: NotificationKind,
    pub entity: EntityRef,
    pub message: String,
}

/// Internal row structure for database queries
#[derive(Debug, Clone, FromRow)]
pub struct NotificationRow {
    id: i32,
    user_id: i32,
    kind: NotificationKind,
    entity_kind: EntityKind,
    entity_id: i32,
    message: String,
    created_at: DateTime<Utc>,
    read_at: Option<DateTime<Utc>>,
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        Notification {
            id: row.id,
            user_id: row.user_id,
            kind: row.kind,
            entity: EntityRef::from_parts(row.entity_kind, row.entity_id),
            message: row.message,
            created_at: row.created_at,
            read_at: row.read_at,
        }
    }
}

/// Stored notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Notification {
    pub id: i32,
    pub user_id: i32,
    pub kind: NotificationKind,
    /// `{"kind": "...", "id": ...}`
    #[schema(value_type = Object)]
    pub entity: EntityRef,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_ref_round_trips_through_parts() {
        let entity = EntityRef::Issue(12);
        assert_eq!(EntityRef::from_parts(entity.kind(), entity.id()), entity);
        assert_eq!(entity.path(), "/issues/12");
    }

    #[test]
    fn entity_ref_serializes_as_tagged_pair() {
        let json = serde_json::to_value(EntityRef::Checkout(4)).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "checkout", "id": 4}));
    }
}
