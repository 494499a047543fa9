//! Process-local user store.

use std::collections::HashMap;

use application::error::{ApplicationError, Result};
use application::ports::outbound::UserRepository;
use async_trait::async_trait;
use domain::identity::email::EmailAddress;
use domain::identity::id::UserId;
use domain::identity::user::User;
use tokio::sync::RwLock;

/// User store kept in memory, lost on restart.
///
/// Users and the email index sit behind one lock so that checking an email
/// and inserting under it is a single step.
#[derive(Default)]
pub struct InMemoryUserRepository {
    inner: RwLock<Store>,
}

#[derive(Default)]
struct Store {
    users: HashMap<UserId, User>,
    emails: HashMap<EmailAddress, UserId>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.inner.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> Result<()> {
        let mut store = self.inner.write().await;

        if store.emails.contains_key(user.email())
            || store.users.contains_key(&user.id())
        {
            return Err(ApplicationError::AlreadyExists);
        }

        store.emails.insert(user.email().clone(), user.id());
        store.users.insert(user.id(), user.clone());

        Ok(())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>> {
        let store = self.inner.read().await;

        Ok(store
            .emails
            .get(email)
            .and_then(|id| store.users.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>> {
        Ok(self.inner.read().await.users.get(id).cloned())
    }

    async fn update(&self, user: &User) -> Result<()> {
        let mut store = self.inner.write().await;
        let Store { users, emails } = &mut *store;

        let Some(stored) = users.get_mut(&user.id()) else {
            return Err(ApplicationError::UserNotFound);
        };

        if stored.email() != user.email() {
            if emails.contains_key(user.email()) {
                return Err(ApplicationError::AlreadyExists);
            }
            emails.remove(stored.email());
            emails.insert(user.email().clone(), user.id());
        }

        *stored = user.clone();

        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<bool> {
        let mut store = self.inner.write().await;

        match store.users.remove(id) {
            Some(user) => {
                store.emails.remove(user.email());
                Ok(true)
            },
            None => Ok(false),
        }
    }

    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool> {
        Ok(self.inner.read().await.emails.contains_key(email))
    }
}
