//! User use-case service.
//!
//! # Responsibility
//! - Validate caller input and apply business defaults (trimming, timestamps).
//! - Delegate storage to a `UserRepository`.
//! - Translate repository errors into caller-facing error kinds.
//! - Emit one audit event per successful mutation.
//!
//! # Invariants
//! - The service never hands out references into repository state.
//! - Audit events are only emitted on success paths.
//! - `created_at == updated_at` for every freshly created user.

use crate::clock::Clock;
use crate::model::user::{validate_create, User, UserId, UserValidationError};
use crate::repo::user_repo::{RepoError, UserPatch, UserRepository};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, UserServiceError>;

/// Input for `UserService::create_user`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateUserRequest {
    pub email: String,
    pub name: String,
    pub role: String,
}

/// Input for `UserService::update_user`.
///
/// Absent or empty text fields leave the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUserRequest {
    pub id: UserId,
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub deactivated: bool,
}

/// Caller-facing service error.
#[derive(Debug)]
pub enum UserServiceError {
    /// Create input failed field validation.
    Validation(UserValidationError),
    /// A required identifier was missing.
    InvalidArgument(&'static str),
    /// Referenced user does not exist; keeps the repository error as cause.
    NotFound { id: UserId, source: RepoError },
    /// Storage fault that should never happen in normal operation.
    Internal(RepoError),
}

impl Display for UserServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidArgument(message) => write!(f, "{message}"),
            Self::NotFound { id, .. } => write!(f, "user not found: {id}"),
            Self::Internal(err) => write!(f, "internal error: {err}"),
        }
    }
}

impl Error for UserServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::InvalidArgument(_) => None,
            Self::NotFound { source, .. } => Some(source),
            Self::Internal(err) => Some(err),
        }
    }
}

impl From<UserValidationError> for UserServiceError {
    fn from(value: UserValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for UserServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound {
                id: id.clone(),
                source: RepoError::NotFound(id),
            },
            other => Self::Internal(other),
        }
    }
}

/// Service facade over a user repository and a clock.
pub struct UserService<R: UserRepository, C: Clock> {
    repo: R,
    clock: C,
}

impl<R: UserRepository, C: Clock> UserService<R, C> {
    /// Creates a service from explicitly constructed collaborators.
    pub fn new(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Borrow of the underlying repository, for wiring and diagnostics.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Validates, trims and stores a new user.
    ///
    /// # Errors
    /// - `Validation` when email is empty or lacks `@`, or the trimmed name
    ///   is empty.
    pub fn create_user(&self, request: &CreateUserRequest) -> ServiceResult<User> {
        validate_create(&request.email, &request.name)?;

        let user = User::new(
            request.email.trim(),
            request.name.trim(),
            request.role.trim(),
            self.clock.now_millis(),
        );
        let created = self
            .repo
            .create(&user)
            .map_err(|err| map_repo_error("create_user", err))?;

        info!(
            "event=user_created module=service status=ok user_id={} email={}",
            created.id, created.email
        );
        Ok(created)
    }

    /// Gets one user by id.
    pub fn get_user(&self, id: &str) -> ServiceResult<User> {
        require_id(id)?;
        self.repo.get(id).map_err(|err| map_repo_error("get_user", err))
    }

    /// Lists all users. Order is unspecified.
    pub fn list_users(&self) -> ServiceResult<Vec<User>> {
        self.repo.list().map_err(|err| map_repo_error("list_users", err))
    }

    /// Applies a partial update and refreshes `updated_at`.
    ///
    /// The refreshed timestamp is written through to storage, so a later
    /// `get_user` observes the same value this call returns.
    pub fn update_user(&self, request: &UpdateUserRequest) -> ServiceResult<User> {
        require_id(&request.id)?;

        let patch = UserPatch {
            email: request.email.as_deref().map(|value| value.trim().to_string()),
            name: request.name.as_deref().map(|value| value.trim().to_string()),
            role: request.role.as_deref().map(|value| value.trim().to_string()),
            deactivated: request.deactivated,
            updated_at: Some(self.clock.now_millis()),
        };
        let updated = self
            .repo
            .update(&request.id, &patch)
            .map_err(|err| map_repo_error("update_user", err))?;

        info!(
            "event=user_updated module=service status=ok user_id={} deactivated={}",
            updated.id, updated.deactivated
        );
        Ok(updated)
    }

    /// Removes one user by id.
    pub fn delete_user(&self, id: &str) -> ServiceResult<()> {
        require_id(id)?;
        self.repo
            .delete(id)
            .map_err(|err| map_repo_error("delete_user", err))?;

        info!("event=user_deleted module=service status=ok user_id={id}");
        Ok(())
    }
}

/// Maps a repository error and logs the internal fault class.
///
/// Caller errors (`NotFound`) are returned without logging.
fn map_repo_error(op: &'static str, err: RepoError) -> UserServiceError {
    let mapped = UserServiceError::from(err);
    if let UserServiceError::Internal(cause) = &mapped {
        warn!("event={op} module=service status=error error={cause}");
    }
    mapped
}

fn require_id(id: &str) -> ServiceResult<()> {
    if id.is_empty() {
        return Err(UserServiceError::InvalidArgument("id is required"));
    }
    Ok(())
}
