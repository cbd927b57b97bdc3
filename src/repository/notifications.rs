//! Notification domain methods on Repository

use chrono::Utc;

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::notification::{NewNotification, Notification, NotificationRow},
};

impl Repository {
    /// Notifications of one user, unread first
    pub async fn notifications_list_for_user(&self, user_id: i32, unread_only: bool) -> AppResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT * FROM notifications
            WHERE user_id = $1 AND (NOT $2 OR read_at IS NULL)
            ORDER BY read_at IS NOT NULL, created_at DESC
            LIMIT 200
            "#,
        )
        .bind(user_id)
        .bind(unread_only)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Notification::from).collect())
    }

    pub async fn notifications_create_many(&self, notifications: &[NewNotification]) -> AppResult<usize> {
        if notifications.is_empty() {
            return Ok(0);
        }

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;
        for notification in notifications {
            sqlx::query(
                r#"
                INSERT INTO notifications (user_id, kind, entity_kind, entity_id, message, created_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(notification.user_id)
            .bind(notification.kind)
            .bind(notification.entity.kind())
            .bind(notification.entity.id())
            .bind(&notification.message)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(notifications.len())
    }

    /// Mark one notification as read; only its owner may do so
    pub async fn notifications_mark_read(&self, id: i32, user_id: i32) -> AppResult<Notification> {
        sqlx::query_as::<_, NotificationRow>(
            r#"
            UPDATE notifications SET read_at = COALESCE(read_at, $1)
            WHERE id = $2 AND user_id = $3
            RETURNING *
            "#,
        )
        .bind(Utc::now())
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .map(Notification::from)
        .ok_or_else(|| AppError::NotFound(format!("Notification {} not found", id)))
    }

    pub async fn notifications_mark_all_read(&self, user_id: i32) -> AppResult<u64> {
        let result = sqlx::query("UPDATE notifications SET read_at = $1 WHERE user_id = $2 AND read_at IS NULL")
            .bind(Utc::now())
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
