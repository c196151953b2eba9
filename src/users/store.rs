use async_trait::async_trait;

use super::repo_types::{NewUser, User};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("email already exists")]
    DuplicateEmail,
    #[error("user {0} not found")]
    NotFound(i64),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Persistence used by the auth and profile flows.
///
/// Implementations give atomic single-row create/read/update; nothing in the
/// flows takes its own locks. `create` must reject a second user with the
/// same email even when the caller's count check raced.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn count_by_email(&self, email: &str) -> Result<i64, StoreError>;
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError>;
    /// Overwrites the profile columns and `updated_at` of the row with `user.id`.
    async fn save(&self, user: &User) -> Result<(), StoreError>;
}
