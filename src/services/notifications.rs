//! Notification delivery: recipient resolution, storage and optional email

use std::{collections::BTreeSet, sync::Arc};

use crate::{
    error::{AppError, AppResult},
    models::{
        notification::{NewNotification, Notification, NotificationIntent, Recipient},
        user::User,
    },
    repository::{LifecycleStore, Repository},
    services::email::EmailService,
};

#[derive(Clone)]
pub struct NotificationsService {
    repository: Repository,
    store: Arc<dyn LifecycleStore>,
    email: EmailService,
}

impl NotificationsService {
    pub fn new(repository: Repository, store: Arc<dyn LifecycleStore>, email: EmailService) -> Self {
        Self { repository, store, email }
    }

    /// Active users targeted by `recipients`, each at most once
    async fn resolve(&self, recipients: &[Recipient]) -> AppResult<Vec<User>> {
        let mut seen = BTreeSet::new();
        let mut users = Vec::new();

        for recipient in recipients {
            let candidates = match recipient {
                Recipient::Role(role) => self.store.users_with_role(*role).await?,
                Recipient::User(id) => match self.store.get_user(*id).await {
                    Ok(user) => vec![user],
                    Err(AppError::NotFound(_)) => {
                        tracing::warn!(user_id = id, "Notification recipient does not exist");
                        Vec::new()
                    }
                    Err(e) => return Err(e),
                },
            };
            for user in candidates {
                if user.active && seen.insert(user.id) {
                    users.push(user);
                }
            }
        }
        Ok(users)
    }

    /// Store one notification per resolved recipient, then mail them if enabled.
    /// Returns the number of stored notifications.
    pub async fn dispatch(&self, intents: &[NotificationIntent]) -> AppResult<usize> {
        let mut created = 0;

        for intent in intents {
            let users = self.resolve(&intent.recipients).await?;
            if users.is_empty() {
                continue;
            }

            let message = intent.kind.message(&intent.entity);
            let rows: Vec<NewNotification> = users
                .iter()
                .map(|user| NewNotification {
                    user_id: user.id,
                    kind: intent.kind,
                    entity: intent.entity,
                    message: message.clone(),
                })
                .collect();
            created += self.store.insert_notifications(&rows).await?;

            if self.email.is_enabled() {
                let link = format!("/api/v1{}", intent.entity.path());
                for user in &users {
                    let Some(address) = user.email.as_deref() else {
                        continue;
                    };
                    if let Err(e) = self.email.send_notification(address, &message, &link).await {
                        tracing::warn!(user_id = user.id, error = %e, "Failed to email notification");
                    }
                }
            }
        }

        Ok(created)
    }

    /// Dispatch after a committed transition; failures are logged, not returned
    pub async fn deliver(&self, intents: &[NotificationIntent]) {
        if intents.is_empty() {
            return;
        }
        match self.dispatch(intents).await {
            Ok(count) => tracing::debug!(count, "Notifications stored"),
            Err(e) => tracing::error!(error = %e, "Failed to deliver notifications"),
        }
    }

    pub async fn list_for_user(&self, user_id: i32, unread_only: bool) -> AppResult<Vec<Notification>> {
        self.repository.notifications_list_for_user(user_id, unread_only).await
    }

    pub async fn mark_read(&self, id: i32, user_id: i32) -> AppResult<Notification> {
        self.repository.notifications_mark_read(id, user_id).await
    }

    pub async fn mark_all_read(&self, user_id: i32) -> AppResult<u64> {
        self.repository.notifications_mark_all_read(user_id).await
    }
}
