// Database repository for user accounts

use sqlx::{PgPool, Postgres, Transaction};

use crate::auth::error::AuthError;
use crate::auth::models::{Role, User};

/// User repository for database operations.
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, role, is_active, created_at
             FROM users WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?;

        Ok(user)
    }

    /// Insert a user inside an existing transaction.
    ///
    /// Used by the paired-creation flows (User + Student, User + Faculty):
    /// the caller owns the transaction so both rows commit together or not
    /// at all. Duplicate emails surface as a unique-constraint violation for
    /// the caller to translate.
    pub async fn insert_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password_hash, role)
             VALUES ($1, $2, $3)
             RETURNING id, email, password_hash, role, is_active, created_at",
        )
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .fetch_one(&mut **tx)
        .await
    }

    /// Delete a user inside an existing transaction (paired deletion).
    pub async fn delete_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        user_id: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}
