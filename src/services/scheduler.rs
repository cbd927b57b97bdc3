//! Background task running the overdue sweep once per day

use std::{sync::Arc, time::Duration};

use chrono::NaiveDate;
use tokio::task::JoinHandle;

use crate::{
    clock::Clock,
    services::{notifications::NotificationsService, sweep::OverdueSweep},
};

/// Daily sweep driver; wakes up on an interval and sweeps when the date changed
pub struct SweepScheduler {
    sweep: OverdueSweep,
    notifications: NotificationsService,
    clock: Arc<dyn Clock>,
    last_run: Option<NaiveDate>,
}

impl SweepScheduler {
    pub fn new(sweep: OverdueSweep, notifications: NotificationsService, clock: Arc<dyn Clock>) -> Self {
        Self {
            sweep,
            notifications,
            clock,
            last_run: None,
        }
    }

    pub fn last_run(&self) -> Option<NaiveDate> {
        self.last_run
    }

    /// Run the sweep unless it already succeeded today. Returns whether it ran.
    pub async fn tick(&mut self) -> bool {
        let today = self.clock.today();
        if self.last_run == Some(today) {
            return false;
        }

        match self.sweep.sweep_overdue_checkouts(today).await {
            Ok(result) => {
                self.last_run = Some(today);
                self.notifications.deliver(&result.notifications).await;
                true
            }
            Err(e) => {
                // Retried on the next tick
                tracing::error!(%today, error = %e, "Scheduled overdue sweep failed");
                false
            }
        }
    }

    pub fn spawn(mut self, interval: Duration) -> JoinHandle<()> {
        tracing::info!(interval_secs = interval.as_secs(), "Overdue sweep scheduler started");
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                self.tick().await;
            }
        })
    }
}
