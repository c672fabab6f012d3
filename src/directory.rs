use std::collections::HashMap;

use crate::error::DashboardResult;
use crate::presence::{ApiUser, PresenceApi, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub avatar_url: String,
}

impl From<ApiUser> for User {
    fn from(user: ApiUser) -> Self {
        Self {
            id: user.user_id,
            name: user.name,
            avatar_url: user.avatar,
        }
    }
}

/// The selectable users, in the order the backend returned them, with an
/// id index for constant-time lookup.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: Vec<User>,
    by_id: HashMap<UserId, usize>,
}

impl UserDirectory {
    /// Fetch the user list once and build the directory from it.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::DirectoryLoadFailure` (or `Timeout` when the
    /// caller bounds the call) if the list cannot be fetched or decoded.
    pub async fn load<A: PresenceApi>(api: &A) -> DashboardResult<Self> {
        let users = api.users().await?;
        let directory = Self::from_users(users.into_iter().map(User::from).collect());
        tracing::info!(users = directory.len(), "User directory loaded");
        Ok(directory)
    }

    #[must_use]
    pub fn from_users(users: Vec<User>) -> Self {
        let by_id = users
            .iter()
            .enumerate()
            .map(|(index, user)| (user.id, index))
            .collect();
        Self { users, by_id }
    }

    #[must_use]
    pub fn get(&self, id: UserId) -> Option<&User> {
        self.by_id.get(&id).map(|&index| &self.users[index])
    }

    /// User at `index` in backend order.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&User> {
        self.users.get(index)
    }

    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
