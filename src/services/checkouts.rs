//! Equipment checkout and return

use std::sync::Arc;

use validator::Validate;

use crate::{
    clock::Clock,
    error::{AppError, AppResult},
    lifecycle::{self, Effect, Outcome, Transition},
    models::{
        checkout::{CheckInRequest, Checkout, CheckoutStatus, CreateCheckout},
        principal::Principal,
    },
    repository::LifecycleStore,
};

#[derive(Clone)]
pub struct CheckoutsService {
    store: Arc<dyn LifecycleStore>,
    clock: Arc<dyn Clock>,
}

impl CheckoutsService {
    pub fn new(store: Arc<dyn LifecycleStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn list(&self, status: Option<CheckoutStatus>) -> AppResult<Vec<Checkout>> {
        self.store.list_checkouts(status).await
    }

    pub async fn get(&self, id: i32) -> AppResult<Checkout> {
        self.store.get_checkout(id).await
    }

    /// Lend equipment: reserve it first, then record the checkout
    pub async fn check_out(&self, principal: &Principal, input: CreateCheckout) -> AppResult<Outcome<Checkout>> {
        input.validate()?;
        let equipment = self.store.get_equipment(input.equipment_id).await?;
        let borrower = self.store.get_user(input.user_id).await?;
        let transition = lifecycle::checkout::check_out(
            principal,
            &equipment,
            &borrower,
            input.expected_return_date,
            input.notes,
            self.clock.today(),
        )?;

        let reserved = self.apply_equipment_effects(&transition).await?;
        let stored = match self.store.insert_checkout(&transition.entity).await {
            Ok(stored) => stored,
            Err(e) => {
                self.revert_equipment_effects(&reserved).await;
                return Err(e);
            }
        };

        tracing::info!(
            checkout_id = stored.id,
            equipment_id = stored.equipment_id,
            user_id = stored.user_id,
            "Equipment checked out"
        );
        let transition = lifecycle::checkout::checked_out(stored);
        let notifications = transition.intents();
        Ok(Outcome::new(transition.entity, notifications))
    }

    /// Register a return and release the equipment
    pub async fn check_in(&self, principal: &Principal, id: i32, input: CheckInRequest) -> AppResult<Outcome<Checkout>> {
        input.validate()?;
        let current = self.store.get_checkout(id).await?;
        let transition = lifecycle::checkout::check_in(principal, &current, input.notes, self.clock.today())?;
        let saved = self.store.save_checkout(&transition.entity).await?;

        // The checkout is returned either way; a mismatch only means the
        // equipment status was changed by hand in the meantime.
        for effect in &transition.effects {
            if let Effect::EquipmentStatus { equipment_id, from, to } = effect {
                match self.store.transition_equipment(*equipment_id, *from, *to).await {
                    Ok(()) => {}
                    Err(AppError::Conflict(msg)) | Err(AppError::NotFound(msg)) => {
                        tracing::warn!(checkout_id = id, equipment_id, "Equipment not released: {}", msg);
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        tracing::info!(checkout_id = id, checked_in_by = principal.id, "Equipment checked in");
        Ok(Outcome::new(saved, transition.intents()))
    }

    /// Apply equipment moves in order, undoing the applied ones if one fails
    async fn apply_equipment_effects<T>(&self, transition: &Transition<T>) -> AppResult<Vec<Effect>> {
        let mut applied = Vec::new();
        for effect in &transition.effects {
            if let Effect::EquipmentStatus { equipment_id, from, to } = effect {
                if let Err(e) = self.store.transition_equipment(*equipment_id, *from, *to).await {
                    self.revert_equipment_effects(&applied).await;
                    return Err(e);
                }
                applied.push(effect.clone());
            }
        }
        Ok(applied)
    }

    async fn revert_equipment_effects(&self, applied: &[Effect]) {
        for effect in applied.iter().rev() {
            if let Effect::EquipmentStatus { equipment_id, from, to } = effect {
                if let Err(e) = self.store.transition_equipment(*equipment_id, *to, *from).await {
                    tracing::error!(equipment_id, error = %e, "Failed to restore equipment status");
                }
            }
        }
    }
}
