//! User repository contract and in-memory implementation.
//!
//! # Responsibility
//! - Provide the authoritative CRUD store for users.
//! - Guarantee copy-on-read and copy-on-write at the repository boundary.
//!
//! # Invariants
//! - Identifiers are unique within the map at all times.
//! - No caller ever holds a reference into stored state; every value
//!   crossing the boundary is an owned clone.
//! - Reads take the shared lock, mutations take the exclusive lock, and no
//!   I/O happens while either is held.
//! - The repository never logs and never reads the clock.

use crate::model::user::{Timestamp, User, UserId};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for user storage operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    NotFound(UserId),
    /// A writer panicked while holding the lock; stored state is suspect.
    LockPoisoned(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "user not found: {id}"),
            Self::LockPoisoned(op) => write!(f, "user store lock poisoned during {op}"),
        }
    }
}

impl Error for RepoError {}

/// Partial update applied by `UserRepository::update`.
///
/// Text fields overwrite only when present and non-empty. `deactivated`
/// always overwrites because `false` is a meaningful value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub deactivated: bool,
    /// Supplied by the caller; the repository does not stamp time itself.
    pub updated_at: Option<Timestamp>,
}

impl UserPatch {
    fn apply(&self, user: &mut User) {
        if let Some(email) = non_empty(&self.email) {
            user.email = email.to_string();
        }
        if let Some(name) = non_empty(&self.name) {
            user.name = name.to_string();
        }
        if let Some(role) = non_empty(&self.role) {
            user.role = role.to_string();
        }
        user.deactivated = self.deactivated;
        if let Some(updated_at) = self.updated_at {
            user.updated_at = updated_at;
        }
    }
}

/// Repository interface for user CRUD operations.
pub trait UserRepository: Send + Sync {
    /// Stores `user`, generating an id when `user.id` is empty.
    ///
    /// A caller-supplied id that already exists replaces the stored user
    /// wholesale, including its `created_at`.
    fn create(&self, user: &User) -> RepoResult<User>;
    fn get(&self, id: &str) -> RepoResult<User>;
    /// Snapshot of all users; order is unspecified.
    fn list(&self) -> RepoResult<Vec<User>>;
    fn update(&self, id: &str, patch: &UserPatch) -> RepoResult<User>;
    fn delete(&self, id: &str) -> RepoResult<()>;
}

/// Map-backed repository guarded by a single reader/writer lock.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current number of stored users.
    pub fn len(&self) -> RepoResult<usize> {
        Ok(self.read("len")?.len())
    }

    pub fn is_empty(&self) -> RepoResult<bool> {
        Ok(self.read("is_empty")?.is_empty())
    }

    fn read(&self, op: &'static str) -> RepoResult<RwLockReadGuard<'_, HashMap<UserId, User>>> {
        self.users.read().map_err(|_| RepoError::LockPoisoned(op))
    }

    fn write(&self, op: &'static str) -> RepoResult<RwLockWriteGuard<'_, HashMap<UserId, User>>> {
        self.users.write().map_err(|_| RepoError::LockPoisoned(op))
    }
}

impl UserRepository for InMemoryUserRepository {
    fn create(&self, user: &User) -> RepoResult<User> {
        let mut stored = user.clone();
        if stored.id.is_empty() {
            stored.id = Uuid::new_v4().to_string();
        }

        let mut users = self.write("create")?;
        users.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    fn get(&self, id: &str) -> RepoResult<User> {
        self.read("get")?
            .get(id)
            .cloned()
            .ok_or_else(|| RepoError::NotFound(id.to_string()))
    }

    fn list(&self) -> RepoResult<Vec<User>> {
        Ok(self.read("list")?.values().cloned().collect())
    }

    fn update(&self, id: &str, patch: &UserPatch) -> RepoResult<User> {
        let mut users = self.write("update")?;
        let existing = users
            .get_mut(id)
            .ok_or_else(|| RepoError::NotFound(id.to_string()))?;
        patch.apply(existing);
        Ok(existing.clone())
    }

    fn delete(&self, id: &str) -> RepoResult<()> {
        self.write("delete")?
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RepoError::NotFound(id.to_string()))
    }
}

impl<R: UserRepository + ?Sized> UserRepository for std::sync::Arc<R> {
    fn create(&self, user: &User) -> RepoResult<User> {
        (**self).create(user)
    }

    fn get(&self, id: &str) -> RepoResult<User> {
        (**self).get(id)
    }

    fn list(&self) -> RepoResult<Vec<User>> {
        (**self).list()
    }

    fn update(&self, id: &str, patch: &UserPatch) -> RepoResult<User> {
        (**self).update(id, patch)
    }

    fn delete(&self, id: &str) -> RepoResult<()> {
        (**self).delete(id)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|text| !text.is_empty())
}
