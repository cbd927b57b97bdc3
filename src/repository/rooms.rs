//! Room domain methods on Repository

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::room::{CreateRoom, Room, UpdateRoom},
};

impl Repository {
    pub async fn rooms_list(&self) -> AppResult<Vec<Room>> {
        let rows = sqlx::query_as::<_, Room>("SELECT * FROM rooms ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn rooms_get_by_id(&self, id: i32) -> AppResult<Room> {
        sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Room {} not found", id)))
    }

    pub async fn rooms_create(&self, data: &CreateRoom) -> AppResult<Room> {
        let row = sqlx::query_as::<_, Room>(
            r#"
            INSERT INTO rooms (name, building, floor, capacity, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.building)
        .bind(&data.floor)
        .bind(data.capacity)
        .bind(&data.notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn rooms_update(&self, id: i32, data: &UpdateRoom) -> AppResult<Room> {
        sqlx::query_as::<_, Room>(
            r#"
            UPDATE rooms SET
                name = COALESCE($1, name),
                building = COALESCE($2, building),
                floor = COALESCE($3, floor),
                capacity = COALESCE($4, capacity),
                notes = COALESCE($5, notes)
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.building)
        .bind(&data.floor)
        .bind(data.capacity)
        .bind(&data.notes)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Room {} not found", id)))
    }

    /// Delete a room; equipment stored there is detached
    pub async fn rooms_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM rooms WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Room {} not found", id)));
        }
        Ok(())
    }
}
