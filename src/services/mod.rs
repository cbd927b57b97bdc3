//! Business logic services

pub mod acquisitions;
pub mod catalog;
pub mod checkouts;
pub mod email;
pub mod issues;
pub mod notifications;
pub mod scheduler;
pub mod sweep;
pub mod users;

use std::sync::Arc;

use crate::{
    clock::Clock,
    config::{AuthConfig, EmailConfig},
    repository::{LifecycleStore, Repository},
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub repository: Repository,
    pub users: users::UsersService,
    pub catalog: catalog::CatalogService,
    pub acquisitions: acquisitions::AcquisitionsService,
    pub checkouts: checkouts::CheckoutsService,
    pub issues: issues::IssuesService,
    pub sweep: sweep::OverdueSweep,
    pub notifications: notifications::NotificationsService,
    pub clock: Arc<dyn Clock>,
}

impl Services {
    /// Wire the services. Lifecycle workflows go through `store`, which is
    /// the repository itself in production.
    pub fn new(
        repository: Repository,
        store: Arc<dyn LifecycleStore>,
        clock: Arc<dyn Clock>,
        auth_config: AuthConfig,
        email_config: EmailConfig,
    ) -> Self {
        let email = email::EmailService::new(email_config);
        Self {
            users: users::UsersService::new(repository.clone(), auth_config),
            catalog: catalog::CatalogService::new(repository.clone()),
            acquisitions: acquisitions::AcquisitionsService::new(store.clone(), clock.clone()),
            checkouts: checkouts::CheckoutsService::new(store.clone(), clock.clone()),
            issues: issues::IssuesService::new(store.clone(), clock.clone()),
            sweep: sweep::OverdueSweep::new(store.clone(), clock.clone()),
            notifications: notifications::NotificationsService::new(repository.clone(), store, email),
            repository,
            clock,
        }
    }

    /// Scheduler for the daily overdue sweep, not started yet
    pub fn sweep_scheduler(&self) -> scheduler::SweepScheduler {
        scheduler::SweepScheduler::new(self.sweep.clone(), self.notifications.clone(), self.clock.clone())
    }
}
