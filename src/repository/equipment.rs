//! Equipment domain methods on Repository

use chrono::Utc;

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::equipment::{CreateEquipment, Equipment, EquipmentStatus, UpdateEquipment},
};

impl Repository {
    /// List equipment, optionally restricted to one status or room
    pub async fn equipment_list(
        &self,
        status: Option<EquipmentStatus>,
        room_id: Option<i32>,
    ) -> AppResult<Vec<Equipment>> {
        let rows = sqlx::query_as::<_, Equipment>(
            r#"
            SELECT * FROM equipment
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::int IS NULL OR room_id = $2)
            ORDER BY name
            "#,
        )
        .bind(status)
        .bind(room_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Get equipment by ID
    pub async fn equipment_get_by_id(&self, id: i32) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// Create equipment
    pub async fn equipment_create(&self, data: &CreateEquipment) -> AppResult<Equipment> {
        let row = sqlx::query_as::<_, Equipment>(
            r#"
            INSERT INTO equipment (
                name, serial_number, category, status, room_id, provider_id,
                purchase_date, purchase_price, notes, crea_date
            )
            VALUES ($1, $2, $3, 'available', $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.serial_number)
        .bind(&data.category)
        .bind(data.room_id)
        .bind(data.provider_id)
        .bind(data.purchase_date)
        .bind(data.purchase_price)
        .bind(&data.notes)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update equipment
    pub async fn equipment_update(&self, id: i32, data: &UpdateEquipment) -> AppResult<Equipment> {
        let now = Utc::now();
        let mut sets = vec!["modif_date = $1".to_string()];
        let mut idx = 2;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(data.name, "name");
        add_field!(data.serial_number, "serial_number");
        add_field!(data.category, "category");
        add_field!(data.status, "status");
        add_field!(data.room_id, "room_id");
        add_field!(data.provider_id, "provider_id");
        add_field!(data.purchase_date, "purchase_date");
        add_field!(data.purchase_price, "purchase_price");
        add_field!(data.notes, "notes");

        // A checked-out item keeps its status until it is checked in
        let guard = if data.status.is_some() { " AND status <> 'checked_out'" } else { "" };
        let query = format!(
            "UPDATE equipment SET {} WHERE id = ${}{} RETURNING *",
            sets.join(", "),
            idx,
            guard
        );

        let mut builder = sqlx::query_as::<_, Equipment>(&query).bind(now);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.name);
        bind_field!(data.serial_number);
        bind_field!(data.category);
        bind_field!(data.status);
        bind_field!(data.room_id);
        bind_field!(data.provider_id);
        bind_field!(data.purchase_date);
        bind_field!(data.purchase_price);
        bind_field!(data.notes);

        let row = builder.bind(id).fetch_optional(&self.pool).await?;
        match row {
            Some(row) => Ok(row),
            None => {
                let current = self.equipment_get_by_id(id).await?;
                Err(AppError::Conflict(format!(
                    "Equipment {} is {} and its status cannot be changed",
                    id, current.status
                )))
            }
        }
    }

    /// Delete equipment that is not lent out and has no checkout history
    pub async fn equipment_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM equipment WHERE id = $1 AND status <> 'checked_out'")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| super::in_use(e, format!("Equipment {}", id)))?;
        if result.rows_affected() == 0 {
            self.equipment_get_by_id(id).await?;
            return Err(AppError::Conflict(format!("Equipment {} is checked out", id)));
        }
        Ok(())
    }

    /// Compare-and-set on the equipment status
    pub async fn equipment_transition_status(
        &self,
        id: i32,
        from: EquipmentStatus,
        to: EquipmentStatus,
    ) -> AppResult<()> {
        let result = sqlx::query("UPDATE equipment SET status = $1, modif_date = $2 WHERE id = $3 AND status = $4")
            .bind(to)
            .bind(Utc::now())
            .bind(id)
            .bind(from)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            let current = self.equipment_get_by_id(id).await?;
            return Err(AppError::Conflict(format!(
                "Equipment {} is {}, expected {}",
                id, current.status, from
            )));
        }
        Ok(())
    }
}
