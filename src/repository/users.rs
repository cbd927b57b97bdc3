//! User domain methods on Repository

use chrono::Utc;

use super::Repository;
use crate::{
    error::{AppError, AppResult},
    models::{
        principal::Role,
        user::{CreateUser, UpdateUser, User},
    },
};

impl Repository {
    pub async fn users_list(&self) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY lastname, firstname, login")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn users_get_by_id(&self, id: i32) -> AppResult<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    pub async fn users_get_by_login(&self, login: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(login) = LOWER($1)")
            .bind(login)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn users_list_active_by_role(&self, role: Role) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, User>("SELECT * FROM users WHERE role = $1 AND active ORDER BY id")
            .bind(role)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Check if login already exists
    pub async fn users_login_exists(&self, login: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(login) = LOWER($1) AND id != $2)")
                .bind(login)
                .bind(id)
                .fetch_one(&self.pool)
                .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(login) = LOWER($1))")
                .bind(login)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }

    /// Insert a user; `password` is already hashed
    pub async fn users_create(&self, user: &CreateUser, password: String) -> AppResult<User> {
        let row = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (login, password, firstname, lastname, email, role, active, crea_date)
            VALUES ($1, $2, $3, $4, $5, $6, TRUE, $7)
            RETURNING *
            "#,
        )
        .bind(&user.login)
        .bind(password)
        .bind(&user.firstname)
        .bind(&user.lastname)
        .bind(&user.email)
        .bind(user.role)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update a user; `password` is already hashed
    pub async fn users_update(&self, id: i32, user: &UpdateUser, password: Option<String>) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                login = COALESCE($1, login),
                password = COALESCE($2, password),
                firstname = COALESCE($3, firstname),
                lastname = COALESCE($4, lastname),
                email = COALESCE($5, email),
                role = COALESCE($6, role),
                active = COALESCE($7, active),
                modif_date = $8
            WHERE id = $9
            RETURNING *
            "#,
        )
        .bind(&user.login)
        .bind(password)
        .bind(&user.firstname)
        .bind(&user.lastname)
        .bind(&user.email)
        .bind(user.role)
        .bind(user.active)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    /// Soft delete: deactivate the account and drop its credentials
    pub async fn users_delete(&self, id: i32) -> AppResult<()> {
        let open_checkouts: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM checkouts WHERE user_id = $1 AND status <> 'returned'",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        if open_checkouts > 0 {
            return Err(AppError::Conflict(format!(
                "User {} still has {} equipment checked out",
                id, open_checkouts
            )));
        }

        let result = sqlx::query(
            r#"
            UPDATE users SET active = FALSE, password = NULL, modif_date = $1
            WHERE id = $2
            "#,
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User with id {} not found", id)));
        }
        Ok(())
    }
}
