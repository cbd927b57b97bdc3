//! Acquisition request workflow

use std::sync::Arc;

use validator::Validate;

use crate::{
    clock::Clock,
    error::{AppError, AppResult},
    lifecycle::{self, Outcome},
    models::{
        acquisition::{Acquisition, AcquisitionQuery, ApproveAcquisition, CreateAcquisition, UpdateAcquisition},
        principal::Principal,
    },
    repository::LifecycleStore,
};

#[derive(Clone)]
pub struct AcquisitionsService {
    store: Arc<dyn LifecycleStore>,
    clock: Arc<dyn Clock>,
}

impl AcquisitionsService {
    pub fn new(store: Arc<dyn LifecycleStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Trainers only see their own requests
    pub async fn list(&self, principal: &Principal, query: &AcquisitionQuery) -> AppResult<Vec<Acquisition>> {
        let mut query = query.clone();
        if !principal.role.is_staff() {
            query.requested_by = Some(principal.id);
        }
        self.store.list_acquisitions(&query).await
    }

    pub async fn get(&self, principal: &Principal, id: i32) -> AppResult<Acquisition> {
        let acquisition = self.store.get_acquisition(id).await?;
        if !principal.role.is_staff() && acquisition.requested_by != principal.id {
            return Err(AppError::Authorization(format!(
                "Acquisition {} belongs to another user",
                id
            )));
        }
        Ok(acquisition)
    }

    pub async fn create(&self, principal: &Principal, input: CreateAcquisition) -> AppResult<Outcome<Acquisition>> {
        input.validate()?;
        let new = lifecycle::acquisition::create(principal, &input, self.clock.today())?;
        let stored = self.store.insert_acquisition(&new).await?;

        tracing::info!(acquisition_id = stored.id, requested_by = principal.id, "Acquisition requested");
        let transition = lifecycle::acquisition::requested(stored);
        let notifications = transition.intents();
        Ok(Outcome::new(transition.entity, notifications))
    }

    pub async fn update(&self, principal: &Principal, id: i32, input: UpdateAcquisition) -> AppResult<Acquisition> {
        input.validate()?;
        let current = self.store.get_acquisition(id).await?;
        let next = lifecycle::acquisition::update(principal, &current, &input)?;
        self.store.save_acquisition(&next).await
    }

    pub async fn delete(&self, principal: &Principal, id: i32) -> AppResult<()> {
        let current = self.store.get_acquisition(id).await?;
        lifecycle::acquisition::ensure_deletable(principal, &current)?;
        self.store.delete_acquisition(&current).await?;
        tracing::info!(acquisition_id = id, deleted_by = principal.id, "Acquisition deleted");
        Ok(())
    }

    pub async fn approve(
        &self,
        principal: &Principal,
        id: i32,
        input: ApproveAcquisition,
    ) -> AppResult<Outcome<Acquisition>> {
        let current = self.store.get_acquisition(id).await?;
        let transition = lifecycle::acquisition::approve(principal, &current, input.amount, self.clock.today())?;
        let saved = self.store.save_acquisition(&transition.entity).await?;

        tracing::info!(acquisition_id = id, approved_by = principal.id, amount = %input.amount, "Acquisition approved");
        Ok(Outcome::new(saved, transition.intents()))
    }

    pub async fn reject(&self, principal: &Principal, id: i32) -> AppResult<Outcome<Acquisition>> {
        let current = self.store.get_acquisition(id).await?;
        let transition = lifecycle::acquisition::reject(principal, &current, self.clock.today())?;
        let saved = self.store.save_acquisition(&transition.entity).await?;

        tracing::info!(acquisition_id = id, rejected_by = principal.id, "Acquisition rejected");
        Ok(Outcome::new(saved, transition.intents()))
    }

    pub async fn mark_delivered(&self, principal: &Principal, id: i32) -> AppResult<Outcome<Acquisition>> {
        let current = self.store.get_acquisition(id).await?;
        let transition = lifecycle::acquisition::mark_delivered(principal, &current, self.clock.today())?;
        let saved = self.store.save_acquisition(&transition.entity).await?;

        tracing::info!(acquisition_id = id, "Acquisition delivered");
        Ok(Outcome::new(saved, transition.intents()))
    }
}
