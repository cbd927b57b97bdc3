//! Lifecycle policies and transitions for acquisitions, checkouts and issues.
//!
//! Every function here is pure: it receives a principal, an entity snapshot
//! and the current date, and either refuses with a typed [`AppError`] or
//! returns the next entity state together with the side effects the caller
//! must carry out. Persistence and delivery live in `services`.
//!
//! [`AppError`]: crate::error::AppError

pub mod acquisition;
pub mod checkout;
pub mod issue;

use crate::models::{equipment::EquipmentStatus, notification::NotificationIntent};

/// Side effect requested by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Deliver a notification once the transition is persisted
    Notify(NotificationIntent),
    /// Move equipment from `from` to `to`; fails with a conflict if it is not in `from`
    EquipmentStatus {
        equipment_id: i32,
        from: EquipmentStatus,
        to: EquipmentStatus,
    },
}

/// Next entity state plus the effects that accompany it
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<T> {
    pub entity: T,
    pub effects: Vec<Effect>,
}

impl<T> Transition<T> {
    pub fn new(entity: T) -> Self {
        Self { entity, effects: Vec::new() }
    }

    pub fn notify(mut self, intent: NotificationIntent) -> Self {
        self.effects.push(Effect::Notify(intent));
        self
    }

    pub fn equipment_status(mut self, equipment_id: i32, from: EquipmentStatus, to: EquipmentStatus) -> Self {
        self.effects.push(Effect::EquipmentStatus { equipment_id, from, to });
        self
    }

    /// Notification intents carried by this transition
    pub fn intents(&self) -> Vec<NotificationIntent> {
        self.effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::Notify(intent) => Some(intent.clone()),
                Effect::EquipmentStatus { .. } => None,
            })
            .collect()
    }
}

/// Persisted entity plus the notifications still to be delivered
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub entity: T,
    pub notifications: Vec<NotificationIntent>,
}

impl<T> Outcome<T> {
    pub fn new(entity: T, notifications: Vec<NotificationIntent>) -> Self {
        Self { entity, notifications }
    }
}
