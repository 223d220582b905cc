//! User repository for corkboard.
//!
//! SQLite implementation of [`UserRepositoryTrait`].

use async_trait::async_trait;
use sqlx::{QueryBuilder, SqlitePool};

use super::repository_traits::UserRepositoryTrait;
use super::user::{NewUser, User, UserUpdate};
use crate::auth::ValidationError;
use crate::{CorkboardError, Result};

const USER_COLUMNS: &str = "id, username, password_hash, email, image_path, created_at";

/// Repository for user CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new UserRepository over the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    async fn create(&self, new_user: &NewUser) -> Result<User> {
        let result =
            sqlx::query("INSERT INTO users (username, password_hash, email) VALUES (?, ?, ?)")
                .bind(&new_user.username)
                .bind(&new_user.password_hash)
                .bind(&new_user.email)
                .execute(&self.pool)
                .await
                .map_err(|e| match e {
                    sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                        ValidationError::UsernameTaken.into()
                    }
                    other => CorkboardError::from(other),
                })?;

        let id = result.last_insert_rowid();
        self.find_by_id(id)
            .await?
            .ok_or_else(|| CorkboardError::not_found("user", id))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ? COLLATE NOCASE"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn update(&self, id: i64, update: &UserUpdate) -> Result<Option<User>> {
        if update.is_empty() {
            return self.find_by_id(id).await;
        }

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE users SET ");
        let mut separated = query.separated(", ");

        if let Some(ref hash) = update.password_hash {
            separated.push("password_hash = ");
            separated.push_bind_unseparated(hash.clone());
        }
        if let Some(ref email) = update.email {
            separated.push("email = ");
            separated.push_bind_unseparated(email.clone());
        }
        if let Some(ref image_path) = update.image_path {
            separated.push("image_path = ");
            separated.push_bind_unseparated(image_path.clone());
        }

        query.push(" WHERE id = ");
        query.push_bind(id);

        let affected = query.build().execute(&self.pool).await?.rows_affected();
        if affected == 0 {
            return Ok(None);
        }

        self.find_by_id(id).await
    }

    async fn swap_image_path(
        &self,
        id: i64,
        expected: Option<&str>,
        new: Option<&str>,
    ) -> Result<bool> {
        let affected =
            sqlx::query("UPDATE users SET image_path = ? WHERE id = ? AND image_path IS ?")
                .bind(new)
                .bind(id)
                .bind(expected)
                .execute(&self.pool)
                .await?
                .rows_affected();
        Ok(affected > 0)
    }

    async fn username_exists(&self, username: &str) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ? COLLATE NOCASE")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;
        Ok(count > 0)
    }
}
