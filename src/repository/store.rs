//! Persistence interface consumed by the lifecycle services

use async_trait::async_trait;
use chrono::NaiveDate;

use super::Repository;
use crate::{
    error::AppResult,
    models::{
        acquisition::{Acquisition, AcquisitionQuery, NewAcquisition},
        checkout::{Checkout, CheckoutStatus, NewCheckout},
        equipment::{Equipment, EquipmentStatus},
        issue::{Issue, IssueStatus, NewIssue},
        notification::NewNotification,
        principal::Role,
        user::User,
    },
};

/// Storage backend for lifecycle entities.
///
/// `get_*` fail with `NotFound`. `save_*` persist a snapshot only if its
/// `version` still matches the stored row, bumping it, and fail with
/// `Conflict` otherwise.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LifecycleStore: Send + Sync {
    async fn get_user(&self, id: i32) -> AppResult<User>;

    /// Active users holding `role`
    async fn users_with_role(&self, role: Role) -> AppResult<Vec<User>>;

    async fn get_equipment(&self, id: i32) -> AppResult<Equipment>;

    /// Conditional status change, `Conflict` if the equipment is not in `from`
    async fn transition_equipment(&self, id: i32, from: EquipmentStatus, to: EquipmentStatus) -> AppResult<()>;

    async fn list_acquisitions(&self, query: &AcquisitionQuery) -> AppResult<Vec<Acquisition>>;
    async fn get_acquisition(&self, id: i32) -> AppResult<Acquisition>;
    async fn insert_acquisition(&self, acquisition: &NewAcquisition) -> AppResult<Acquisition>;
    async fn save_acquisition(&self, acquisition: &Acquisition) -> AppResult<Acquisition>;
    async fn delete_acquisition(&self, acquisition: &Acquisition) -> AppResult<()>;

    async fn list_checkouts(&self, status: Option<CheckoutStatus>) -> AppResult<Vec<Checkout>>;
    async fn get_checkout(&self, id: i32) -> AppResult<Checkout>;
    async fn insert_checkout(&self, checkout: &NewCheckout) -> AppResult<Checkout>;
    async fn save_checkout(&self, checkout: &Checkout) -> AppResult<Checkout>;

    /// In-progress checkouts whose expected return date is before `today`
    async fn overdue_candidates(&self, today: NaiveDate) -> AppResult<Vec<Checkout>>;

    async fn list_issues(&self, status: Option<IssueStatus>) -> AppResult<Vec<Issue>>;
    async fn get_issue(&self, id: i32) -> AppResult<Issue>;
    async fn insert_issue(&self, issue: &NewIssue) -> AppResult<Issue>;
    async fn save_issue(&self, issue: &Issue) -> AppResult<Issue>;

    async fn insert_notifications(&self, notifications: &[NewNotification]) -> AppResult<usize>;
}

#[async_trait]
impl LifecycleStore for Repository {
    async fn get_user(&self, id: i32) -> AppResult<User> {
        self.users_get_by_id(id).await
    }

    async fn users_with_role(&self, role: Role) -> AppResult<Vec<User>> {
        self.users_list_active_by_role(role).await
    }

    async fn get_equipment(&self, id: i32) -> AppResult<Equipment> {
        self.equipment_get_by_id(id).await
    }

    async fn transition_equipment(&self, id: i32, from: EquipmentStatus, to: EquipmentStatus) -> AppResult<()> {
        self.equipment_transition_status(id, from, to).await
    }

    async fn list_acquisitions(&self, query: &AcquisitionQuery) -> AppResult<Vec<Acquisition>> {
        self.acquisitions_list(query).await
    }

    async fn get_acquisition(&self, id: i32) -> AppResult<Acquisition> {
        self.acquisitions_get_by_id(id).await
    }

    async fn insert_acquisition(&self, acquisition: &NewAcquisition) -> AppResult<Acquisition> {
        self.acquisitions_create(acquisition).await
    }

    async fn save_acquisition(&self, acquisition: &Acquisition) -> AppResult<Acquisition> {
        self.acquisitions_save(acquisition).await
    }

    async fn delete_acquisition(&self, acquisition: &Acquisition) -> AppResult<()> {
        self.acquisitions_delete(acquisition).await
    }

    async fn list_checkouts(&self, status: Option<CheckoutStatus>) -> AppResult<Vec<Checkout>> {
        self.checkouts_list(status).await
    }

    async fn get_checkout(&self, id: i32) -> AppResult<Checkout> {
        self.checkouts_get_by_id(id).await
    }

    async fn insert_checkout(&self, checkout: &NewCheckout) -> AppResult<Checkout> {
        self.checkouts_create(checkout).await
    }

    async fn save_checkout(&self, checkout: &Checkout) -> AppResult<Checkout> {
        self.checkouts_save(checkout).await
    }

    async fn overdue_candidates(&self, today: NaiveDate) -> AppResult<Vec<Checkout>> {
        self.checkouts_overdue_candidates(today).await
    }

    async fn list_issues(&self, status: Option<IssueStatus>) -> AppResult<Vec<Issue>> {
        self.issues_list(status).await
    }

    async fn get_issue(&self, id: i32) -> AppResult<Issue> {
        self.issues_get_by_id(id).await
    }

    async fn insert_issue(&self, issue: &NewIssue) -> AppResult<Issue> {
        self.issues_create(issue).await
    }

    async fn save_issue(&self, issue: &Issue) -> AppResult<Issue> {
        self.issues_save(issue).await
    }

    async fn insert_notifications(&self, notifications: &[NewNotification]) -> AppResult<usize> {
        self.notifications_create_many(notifications).await
    }
}
