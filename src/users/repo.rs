use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{NewUser, User};
use super::store::{StoreError, UserStore};

const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, display_name, \
                            phone, avatar_url, bio, created_at, updated_at";

/// Postgres-backed users table.
#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn map_insert_error(e: sqlx::Error) -> StoreError {
    match &e {
        // 23505: unique_violation
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
            StoreError::DuplicateEmail
        }
        _ => StoreError::Database(e),
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn count_by_email(&self, email: &str) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1")
            .bind(email)
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }

    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(map_insert_error)?;
        Ok(user)
    }

    async fn save(&self, user: &User) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users
               SET first_name = $2,
                   last_name = $3,
                   display_name = $4,
                   phone = $5,
                   avatar_url = $6,
                   bio = $7,
                   updated_at = $8
             WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.display_name)
        .bind(&user.phone)
        .bind(&user.avatar_url)
        .bind(&user.bio)
        .bind(user.updated_at)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(user.id));
        }
        Ok(())
    }
}
