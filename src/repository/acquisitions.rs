//! Acquisition domain methods on Repository

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::acquisition::{Acquisition, AcquisitionQuery, NewAcquisition},
};

impl Repository {
    /// List acquisitions, newest first
    pub async fn acquisitions_list(&self, query: &AcquisitionQuery) -> AppResult<Vec<Acquisition>> {
        let rows = sqlx::query_as::<_, Acquisition>(
            r#"
            SELECT * FROM acquisitions
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::int IS NULL OR requested_by = $2)
            ORDER BY request_date DESC, id DESC
            "#,
        )
        .bind(query.status)
        .bind(query.requested_by)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn acquisitions_get_by_id(&self, id: i32) -> AppResult<Acquisition> {
        sqlx::query_as::<_, Acquisition>("SELECT * FROM acquisitions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Acquisition {} not found", id)))
    }

    pub async fn acquisitions_create(&self, data: &NewAcquisition) -> AppResult<Acquisition> {
        let row = sqlx::query_as::<_, Acquisition>(
            r#"
            INSERT INTO acquisitions (
                equipment_name, description, quantity, provider_id, justification,
                status, urgency, requested_by, request_date, version
            )
            VALUES ($1, $2, $3, $4, $5, 'pending', $6, $7, $8, 1)
            RETURNING *
            "#,
        )
        .bind(&data.equipment_name)
        .bind(&data.description)
        .bind(data.quantity)
        .bind(data.provider_id)
        .bind(&data.justification)
        .bind(data.urgency)
        .bind(data.requested_by)
        .bind(data.request_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Persist a snapshot if nobody updated the row since it was read
    pub async fn acquisitions_save(&self, data: &Acquisition) -> AppResult<Acquisition> {
        let row = sqlx::query_as::<_, Acquisition>(
            r#"
            UPDATE acquisitions SET
                equipment_name = $1, description = $2, quantity = $3, provider_id = $4,
                justification = $5, status = $6, urgency = $7, approved_by = $8,
                amount = $9, approval_date = $10, delivery_date = $11,
                version = version + 1
            WHERE id = $12 AND version = $13
            RETURNING *
            "#,
        )
        .bind(&data.equipment_name)
        .bind(&data.description)
        .bind(data.quantity)
        .bind(data.provider_id)
        .bind(&data.justification)
        .bind(data.status)
        .bind(data.urgency)
        .bind(data.approved_by)
        .bind(data.amount)
        .bind(data.approval_date)
        .bind(data.delivery_date)
        .bind(data.id)
        .bind(data.version)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(row),
            None => Err(self.stale_or_missing("acquisitions", "Acquisition", data.id).await),
        }
    }

    /// Delete a pending acquisition at the version it was read
    pub async fn acquisitions_delete(&self, data: &Acquisition) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM acquisitions WHERE id = $1 AND version = $2 AND status = 'pending'")
            .bind(data.id)
            .bind(data.version)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(self.stale_or_missing("acquisitions", "Acquisition", data.id).await);
        }
        Ok(())
    }
}
