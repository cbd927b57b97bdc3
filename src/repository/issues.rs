//! Issue domain methods on Repository

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::issue::{Issue, IssueStatus, NewIssue},
};

impl Repository {
    pub async fn issues_list(&self, status: Option<IssueStatus>) -> AppResult<Vec<Issue>> {
        let rows = sqlx::query_as::<_, Issue>(
            r#"
            SELECT * FROM issues
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY reported_date DESC, id DESC
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn issues_get_by_id(&self, id: i32) -> AppResult<Issue> {
        sqlx::query_as::<_, Issue>("SELECT * FROM issues WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Issue {} not found", id)))
    }

    pub async fn issues_create(&self, data: &NewIssue) -> AppResult<Issue> {
        let row = sqlx::query_as::<_, Issue>(
            r#"
            INSERT INTO issues (
                status, equipment_id, title, description, priority,
                reported_by, reported_date, version
            )
            VALUES ('reported', $1, $2, $3, $4, $5, $6, 1)
            RETURNING *
            "#,
        )
        .bind(data.equipment_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.priority)
        .bind(data.reported_by)
        .bind(data.reported_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn issues_save(&self, data: &Issue) -> AppResult<Issue> {
        let row = sqlx::query_as::<_, Issue>(
            r#"
            UPDATE issues SET
                status = $1, title = $2, description = $3, priority = $4,
                assigned_to = $5, resolved_date = $6, resolution_notes = $7,
                version = version + 1
            WHERE id = $8 AND version = $9
            RETURNING *
            "#,
        )
        .bind(data.status)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.priority)
        .bind(data.assigned_to)
        .bind(data.resolved_date)
        .bind(&data.resolution_notes)
        .bind(data.id)
        .bind(data.version)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(row),
            None => Err(self.stale_or_missing("issues", "Issue", data.id).await),
        }
    }
}
