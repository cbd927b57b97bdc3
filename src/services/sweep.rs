//! Overdue checkout sweep

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    clock::Clock,
    error::{AppError, AppResult},
    lifecycle,
    models::notification::NotificationIntent,
    repository::LifecycleStore,
};

/// Outcome of one sweep
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct SweepResult {
    /// Number of checkouts moved to overdue
    pub count: usize,
    pub ids: Vec<i32>,
    /// Checkouts that could not be saved
    pub failed: Vec<i32>,
    #[serde(skip)]
    pub notifications: Vec<NotificationIntent>,
}

#[derive(Clone)]
pub struct OverdueSweep {
    store: Arc<dyn LifecycleStore>,
    clock: Arc<dyn Clock>,
}

impl OverdueSweep {
    pub fn new(store: Arc<dyn LifecycleStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Sweep as of the clock's current date
    pub async fn run(&self) -> AppResult<SweepResult> {
        self.sweep_overdue_checkouts(self.clock.today()).await
    }

    /// Move every in-progress checkout whose expected return date is before
    /// `today` to overdue. Rows are saved one by one; a failed row is logged
    /// and skipped. The whole sweep fails only when the candidate query fails
    /// or when every attempted row hit a database error.
    pub async fn sweep_overdue_checkouts(&self, today: NaiveDate) -> AppResult<SweepResult> {
        let candidates = self.store.overdue_candidates(today).await?;
        let mut result = SweepResult::default();
        let mut database_failures = 0;
        let mut last_database_error = None;

        for checkout in &candidates {
            let Some(transition) = lifecycle::checkout::mark_overdue(checkout, today) else {
                continue;
            };

            match self.store.save_checkout(&transition.entity).await {
                Ok(saved) => {
                    result.ids.push(saved.id);
                    result.notifications.extend(transition.intents());
                }
                Err(e) => {
                    tracing::warn!(checkout_id = checkout.id, error = %e, "Failed to mark checkout overdue");
                    result.failed.push(checkout.id);
                    if matches!(e, AppError::Database(_)) {
                        database_failures += 1;
                        last_database_error = Some(e);
                    }
                }
            }
        }

        if result.ids.is_empty() && !result.failed.is_empty() && database_failures == result.failed.len() {
            if let Some(e) = last_database_error {
                tracing::error!(failed = result.failed.len(), "Overdue sweep aborted");
                return Err(e);
            }
        }

        result.count = result.ids.len();
        tracing::info!(
            %today,
            candidates = candidates.len(),
            marked = result.count,
            failed = result.failed.len(),
            "Overdue sweep completed"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clock::FixedClock,
        models::checkout::{Checkout, CheckoutStatus},
        repository::store::MockLifecycleStore,
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn checkout(id: i32, user_id: i32) -> Checkout {
        Checkout {
            id,
            status: CheckoutStatus::InProgress,
            equipment_id: 100 + id,
            user_id,
            checkout_date: date(2024, 1, 1),
            expected_return_date: date(2024, 1, 5),
            actual_return_date: None,
            checked_out_by: 1,
            checked_in_by: None,
            notes: None,
            version: 1,
        }
    }

    fn sweep(store: MockLifecycleStore) -> OverdueSweep {
        OverdueSweep::new(Arc::new(store), Arc::new(FixedClock(date(2024, 1, 6))))
    }

    #[tokio::test]
    async fn failed_row_does_not_stop_the_batch() {
        let mut store = MockLifecycleStore::new();
        store
            .expect_overdue_candidates()
            .returning(|_| Ok(vec![checkout(1, 10), checkout(2, 20)]));
        store
            .expect_save_checkout()
            .withf(|c| c.id == 1)
            .returning(|_| Err(AppError::Database(sqlx::Error::PoolTimedOut)));
        store
            .expect_save_checkout()
            .withf(|c| c.id == 2 && c.status == CheckoutStatus::Overdue)
            .returning(|c| {
                let mut saved = c.clone();
                saved.version += 1;
                Ok(saved)
            });

        let result = sweep(store).run().await.unwrap();

        assert_eq!(result.count, 1);
        assert_eq!(result.ids, vec![2]);
        assert_eq!(result.failed, vec![1]);
        assert_eq!(result.notifications.len(), 1);
    }

    #[tokio::test]
    async fn aborts_when_every_row_hits_the_database() {
        let mut store = MockLifecycleStore::new();
        store
            .expect_overdue_candidates()
            .returning(|_| Ok(vec![checkout(1, 10), checkout(2, 20)]));
        store
            .expect_save_checkout()
            .times(2)
            .returning(|_| Err(AppError::Database(sqlx::Error::PoolTimedOut)));

        let result = sweep(store).run().await;
        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[tokio::test]
    async fn conflicts_alone_do_not_abort() {
        let mut store = MockLifecycleStore::new();
        store.expect_overdue_candidates().returning(|_| Ok(vec![checkout(3, 10)]));
        store
            .expect_save_checkout()
            .returning(|c| Err(AppError::Conflict(format!("Checkout {} was modified concurrently", c.id))));

        let result = sweep(store).run().await.unwrap();
        assert_eq!(result.count, 0);
        assert_eq!(result.failed, vec![3]);
    }

    #[tokio::test]
    async fn candidate_query_failure_is_returned() {
        let mut store = MockLifecycleStore::new();
        store
            .expect_overdue_candidates()
            .returning(|_| Err(AppError::Database(sqlx::Error::PoolClosed)));
        store.expect_save_checkout().never();

        assert!(sweep(store).run().await.is_err());
    }
}
