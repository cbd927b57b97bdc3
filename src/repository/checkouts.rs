//! Checkout domain methods on Repository

use chrono::NaiveDate;

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::checkout::{Checkout, CheckoutStatus, NewCheckout},
};

impl Repository {
    pub async fn checkouts_list(&self, status: Option<CheckoutStatus>) -> AppResult<Vec<Checkout>> {
        let rows = sqlx::query_as::<_, Checkout>(
            r#"
            SELECT * FROM checkouts
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY checkout_date DESC, id DESC
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn checkouts_get_by_id(&self, id: i32) -> AppResult<Checkout> {
        sqlx::query_as::<_, Checkout>("SELECT * FROM checkouts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Checkout {} not found", id)))
    }

    pub async fn checkouts_create(&self, data: &NewCheckout) -> AppResult<Checkout> {
        let row = sqlx::query_as::<_, Checkout>(
            r#"
            INSERT INTO checkouts (
                status, equipment_id, user_id, checkout_date, expected_return_date,
                checked_out_by, notes, version
            )
            VALUES ('in_progress', $1, $2, $3, $4, $5, $6, 1)
            RETURNING *
            "#,
        )
        .bind(data.equipment_id)
        .bind(data.user_id)
        .bind(data.checkout_date)
        .bind(data.expected_return_date)
        .bind(data.checked_out_by)
        .bind(&data.notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn checkouts_save(&self, data: &Checkout) -> AppResult<Checkout> {
        let row = sqlx::query_as::<_, Checkout>(
            r#"
            UPDATE checkouts SET
                status = $1, expected_return_date = $2, actual_return_date = $3,
                checked_in_by = $4, notes = $5,
                version = version + 1
            WHERE id = $6 AND version = $7
            RETURNING *
            "#,
        )
        .bind(data.status)
        .bind(data.expected_return_date)
        .bind(data.actual_return_date)
        .bind(data.checked_in_by)
        .bind(&data.notes)
        .bind(data.id)
        .bind(data.version)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(row),
            None => Err(self.stale_or_missing("checkouts", "Checkout", data.id).await),
        }
    }

    pub async fn checkouts_overdue_candidates(&self, today: NaiveDate) -> AppResult<Vec<Checkout>> {
        let rows = sqlx::query_as::<_, Checkout>(
            r#"
            SELECT * FROM checkouts
            WHERE status = 'in_progress' AND expected_return_date < $1
            ORDER BY expected_return_date, id
            "#,
        )
        .bind(today)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
