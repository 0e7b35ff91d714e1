use async_trait::async_trait;
use error_stack::Report;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{CredentialStore, Error, Page, Result};
use crate::schema::{NewUser, User, UserChanges};

/// In-process store keyed (and therefore ordered) by username.
///
/// Used when no database is configured and throughout the tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    users: Arc<RwLock<BTreeMap<String, User>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

fn paginate<'a>(users: impl Iterator<Item = &'a User>, page: Page) -> Vec<User> {
    let skip = usize::try_from(page.skip).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit).unwrap_or(usize::MAX);
    users.skip(skip).take(limit).cloned().collect()
}

fn matches(user: &User, needle: &str) -> bool {
    let contains = |value: &str| value.to_lowercase().contains(needle);
    contains(user.username.as_str())
        || user.email.as_deref().is_some_and(contains)
        || user.full_name.as_deref().is_some_and(contains)
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find(&self, username: &str) -> Result<Option<User>> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn list(&self, page: Page) -> Result<Vec<User>> {
        let users = self.users.read().await;
        Ok(paginate(users.values(), page))
    }

    async fn search(&self, query: &str, page: Page) -> Result<Vec<User>> {
        let needle = query.to_lowercase();
        let users = self.users.read().await;
        Ok(paginate(
            users.values().filter(|user| matches(user, &needle)),
            page,
        ))
    }

    async fn insert(&self, user: NewUser) -> Result<User> {
        // existence check and insert happen under the same write guard
        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Err(Report::new(Error::Conflict)
                .attach_printable(format!("username {:?} is taken", user.username)));
        }

        let user = user.into_user();
        users.insert(user.username.clone(), user.clone());
        Ok(user)
    }

    async fn upsert(&self, user: NewUser) -> Result<User> {
        let user = user.into_user();
        self.users
            .write()
            .await
            .insert(user.username.clone(), user.clone());

        Ok(user)
    }

    async fn update(&self, username: &str, changes: &UserChanges) -> Result<Option<User>> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(username).map(|user| {
            changes.apply(user);
            user.clone()
        }))
    }
}
