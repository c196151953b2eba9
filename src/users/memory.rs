use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use super::repo_types::{truncate_to_micros, NewUser, User};
use super::store::{StoreError, UserStore};

#[derive(Default)]
struct Inner {
    next_id: i64,
    users: HashMap<i64, User>,
}

/// Process-local store. Used when no database is configured, and in tests.
#[derive(Default)]
pub struct MemoryUserStore {
    inner: RwLock<Inner>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn count_by_email(&self, email: &str) -> Result<i64, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().filter(|u| u.email == email).count() as i64)
    }

    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|u| u.email == new_user.email) {
            return Err(StoreError::DuplicateEmail);
        }

        inner.next_id += 1;
        let now = truncate_to_micros(OffsetDateTime::now_utc());
        let user = User {
            id: inner.next_id,
            email: new_user.email,
            password_hash: new_user.password_hash,
            first_name: String::new(),
            last_name: String::new(),
            display_name: String::new(),
            phone: String::new(),
            avatar_url: String::new(),
            bio: String::new(),
            created_at: now,
            updated_at: now,
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn save(&self, user: &User) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let stored = inner
            .users
            .get_mut(&user.id)
            .ok_or(StoreError::NotFound(user.id))?;

        stored.first_name.clone_from(&user.first_name);
        stored.last_name.clone_from(&user.last_name);
        stored.display_name.clone_from(&user.display_name);
        stored.phone.clone_from(&user.phone);
        stored.avatar_url.clone_from(&user.avatar_url);
        stored.bio.clone_from(&user.bio);
        stored.updated_at = user.updated_at;
        Ok(())
    }
}
