//! In-process lifecycle store, used by tests and local tooling

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use super::store::LifecycleStore;
use crate::{
    error::{AppError, AppResult},
    models::{
        acquisition::{Acquisition, AcquisitionQuery, AcquisitionStatus, NewAcquisition},
        checkout::{Checkout, CheckoutStatus, NewCheckout},
        equipment::{Equipment, EquipmentStatus},
        issue::{Issue, IssueStatus, NewIssue},
        notification::NewNotification,
        principal::Role,
        user::User,
    },
};

#[derive(Default)]
struct State {
    next_id: i32,
    users: BTreeMap<i32, User>,
    equipment: BTreeMap<i32, Equipment>,
    acquisitions: BTreeMap<i32, Acquisition>,
    checkouts: BTreeMap<i32, Checkout>,
    issues: BTreeMap<i32, Issue>,
    notifications: Vec<NewNotification>,
}

impl State {
    fn allocate_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// [`LifecycleStore`] over in-memory maps with the same versioning rules as Postgres
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put_user(&self, user: User) {
        let mut state = self.state.write().await;
        state.next_id = state.next_id.max(user.id);
        state.users.insert(user.id, user);
    }

    pub async fn put_equipment(&self, equipment: Equipment) {
        let mut state = self.state.write().await;
        state.next_id = state.next_id.max(equipment.id);
        state.equipment.insert(equipment.id, equipment);
    }

    /// Store a checkout as-is, bypassing the check-out policy
    pub async fn put_checkout(&self, checkout: Checkout) {
        let mut state = self.state.write().await;
        state.next_id = state.next_id.max(checkout.id);
        state.checkouts.insert(checkout.id, checkout);
    }

    /// Everything passed to `insert_notifications` so far
    pub async fn notifications(&self) -> Vec<NewNotification> {
        self.state.read().await.notifications.clone()
    }
}

fn check_version(stored: Option<i32>, label: &str, id: i32, version: i32) -> AppResult<()> {
    match stored {
        None => Err(AppError::NotFound(format!("{} {} not found", label, id))),
        Some(current) if current != version => {
            Err(AppError::Conflict(format!("{} {} was modified concurrently", label, id)))
        }
        Some(_) => Ok(()),
    }
}

#[async_trait]
impl LifecycleStore for MemoryStore {
    async fn get_user(&self, id: i32) -> AppResult<User> {
        self.state
            .read()
            .await
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    async fn users_with_role(&self, role: Role) -> AppResult<Vec<User>> {
        Ok(self
            .state
            .read()
            .await
            .users
            .values()
            .filter(|u| u.role == role && u.active)
            .cloned()
            .collect())
    }

    async fn get_equipment(&self, id: i32) -> AppResult<Equipment> {
        self.state
            .read()
            .await
            .equipment
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    async fn transition_equipment(&self, id: i32, from: EquipmentStatus, to: EquipmentStatus) -> AppResult<()> {
        let mut state = self.state.write().await;
        let equipment = state
            .equipment
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))?;
        if equipment.status != from {
            return Err(AppError::Conflict(format!(
                "Equipment {} is {}, expected {}",
                id, equipment.status, from
            )));
        }
        equipment.status = to;
        Ok(())
    }

    async fn list_acquisitions(&self, query: &AcquisitionQuery) -> AppResult<Vec<Acquisition>> {
        let state = self.state.read().await;
        let mut rows: Vec<Acquisition> = state
            .acquisitions
            .values()
            .filter(|a| query.status.map_or(true, |s| a.status == s))
            .filter(|a| query.requested_by.map_or(true, |u| a.requested_by == u))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.request_date.cmp(&a.request_date).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn get_acquisition(&self, id: i32) -> AppResult<Acquisition> {
        self.state
            .read()
            .await
            .acquisitions
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Acquisition {} not found", id)))
    }

    async fn insert_acquisition(&self, new: &NewAcquisition) -> AppResult<Acquisition> {
        let mut state = self.state.write().await;
        let acquisition = Acquisition {
            id: state.allocate_id(),
            equipment_name: new.equipment_name.clone(),
            description: new.description.clone(),
            quantity: new.quantity,
            provider_id: new.provider_id,
            justification: new.justification.clone(),
            status: AcquisitionStatus::Pending,
            urgency: new.urgency,
            requested_by: new.requested_by,
            approved_by: None,
            amount: None,
            request_date: new.request_date,
            approval_date: None,
            delivery_date: None,
            version: 1,
        };
        state.acquisitions.insert(acquisition.id, acquisition.clone());
        Ok(acquisition)
    }

    async fn save_acquisition(&self, acquisition: &Acquisition) -> AppResult<Acquisition> {
        let mut state = self.state.write().await;
        let stored = state.acquisitions.get(&acquisition.id).map(|a| a.version);
        check_version(stored, "Acquisition", acquisition.id, acquisition.version)?;
        let mut saved = acquisition.clone();
        saved.version += 1;
        state.acquisitions.insert(saved.id, saved.clone());
        Ok(saved)
    }

    async fn delete_acquisition(&self, acquisition: &Acquisition) -> AppResult<()> {
        let mut state = self.state.write().await;
        let stored = state.acquisitions.get(&acquisition.id);
        check_version(stored.map(|a| a.version), "Acquisition", acquisition.id, acquisition.version)?;
        if stored.map_or(false, |a| a.status != AcquisitionStatus::Pending) {
            return Err(AppError::Conflict(format!(
                "Acquisition {} was modified concurrently",
                acquisition.id
            )));
        }
        state.acquisitions.remove(&acquisition.id);
        Ok(())
    }

    async fn list_checkouts(&self, status: Option<CheckoutStatus>) -> AppResult<Vec<Checkout>> {
        let state = self.state.read().await;
        let mut rows: Vec<Checkout> = state
            .checkouts
            .values()
            .filter(|c| status.map_or(true, |s| c.status == s))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.checkout_date.cmp(&a.checkout_date).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn get_checkout(&self, id: i32) -> AppResult<Checkout> {
        self.state
            .read()
            .await
            .checkouts
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Checkout {} not found", id)))
    }

    async fn insert_checkout(&self, new: &NewCheckout) -> AppResult<Checkout> {
        let mut state = self.state.write().await;
        let checkout = Checkout {
            id: state.allocate_id(),
            status: CheckoutStatus::InProgress,
            equipment_id: new.equipment_id,
            user_id: new.user_id,
            checkout_date: new.checkout_date,
            expected_return_date: new.expected_return_date,
            actual_return_date: None,
            checked_out_by: new.checked_out_by,
            checked_in_by: None,
            notes: new.notes.clone(),
            version: 1,
        };
        state.checkouts.insert(checkout.id, checkout.clone());
        Ok(checkout)
    }

    async fn save_checkout(&self, checkout: &Checkout) -> AppResult<Checkout> {
        let mut state = self.state.write().await;
        let stored = state.checkouts.get(&checkout.id).map(|c| c.version);
        check_version(stored, "Checkout", checkout.id, checkout.version)?;
        let mut saved = checkout.clone();
        saved.version += 1;
        state.checkouts.insert(saved.id, saved.clone());
        Ok(saved)
    }

    async fn overdue_candidates(&self, today: NaiveDate) -> AppResult<Vec<Checkout>> {
        let state = self.state.read().await;
        let mut rows: Vec<Checkout> = state
            .checkouts
            .values()
            .filter(|c| c.status == CheckoutStatus::InProgress && c.expected_return_date < today)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.expected_return_date.cmp(&b.expected_return_date).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn list_issues(&self, status: Option<IssueStatus>) -> AppResult<Vec<Issue>> {
        let state = self.state.read().await;
        let mut rows: Vec<Issue> = state
            .issues
            .values()
            .filter(|i| status.map_or(true, |s| i.status == s))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.reported_date.cmp(&a.reported_date).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn get_issue(&self, id: i32) -> AppResult<Issue> {
        self.state
            .read()
            .await
            .issues
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Issue {} not found", id)))
    }

    async fn insert_issue(&self, new: &NewIssue) -> AppResult<Issue> {
        let mut state = self.state.write().await;
        let issue = Issue {
            id: state.allocate_id(),
            status: IssueStatus::Reported,
            equipment_id: new.equipment_id,
            title: new.title.clone(),
            description: new.description.clone(),
            priority: new.priority,
            reported_by: new.reported_by,
            assigned_to: None,
            reported_date: new.reported_date,
            resolved_date: None,
            resolution_notes: None,
            version: 1,
        };
        state.issues.insert(issue.id, issue.clone());
        Ok(issue)
    }

    async fn save_issue(&self, issue: &Issue) -> AppResult<Issue> {
        let mut state = self.state.write().await;
        let stored = state.issues.get(&issue.id).map(|i| i.version);
        check_version(stored, "Issue", issue.id, issue.version)?;
        let mut saved = issue.clone();
        saved.version += 1;
        state.issues.insert(saved.id, saved.clone());
        Ok(saved)
    }

    async fn insert_notifications(&self, notifications: &[NewNotification]) -> AppResult<usize> {
        self.state.write().await.notifications.extend_from_slice(notifications);
        Ok(notifications.len())
    }
}
