//! User domain model.
//!
//! # Responsibility
//! - Define the single entity managed by the repository.
//! - Own the field-level rules applied to create requests.
//!
//! # Invariants
//! - `id` is assigned once by the repository and never reassigned.
//! - `created_at` is set once; `updated_at` moves on every successful update.
//! - `deactivated` starts as `false` and only changes through update.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Opaque user identifier.
///
/// Generated identifiers are UUID v4 text, but callers must not rely on
/// the format.
pub type UserId = String;

/// Unix epoch milliseconds.
pub type Timestamp = i64;

/// Canonical user record.
///
/// Serialized with snake_case field names to match the JSON gateway shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Empty until the repository stores the record.
    #[serde(default)]
    pub id: UserId,
    pub email: String,
    pub name: String,
    /// Free-form, may be empty.
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub deactivated: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Builds an unsaved user stamped with `now` for both timestamps.
    pub fn new(
        email: impl Into<String>,
        name: impl Into<String>,
        role: impl Into<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            id: UserId::new(),
            email: email.into(),
            name: name.into(),
            role: role.into(),
            deactivated: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns whether this user can be considered active.
    pub fn is_active(&self) -> bool {
        !self.deactivated
    }
}

/// Field-level validation failure for user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyEmail,
    InvalidEmail,
    EmptyName,
}

impl Display for UserValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email is required"),
            Self::InvalidEmail => write!(f, "email must be valid"),
            Self::EmptyName => write!(f, "name is required"),
        }
    }
}

impl Error for UserValidationError {}

/// Checks create input in a fixed order: email presence, email shape, name.
///
/// The email check is intentionally minimal: it only requires an `@`.
pub fn validate_create(email: &str, name: &str) -> Result<(), UserValidationError> {
    if email.is_empty() {
        return Err(UserValidationError::EmptyEmail);
    }
    if !email.contains('@') {
        return Err(UserValidationError::InvalidEmail);
    }
    if name.trim().is_empty() {
        return Err(UserValidationError::EmptyName);
    }
    Ok(())
}
