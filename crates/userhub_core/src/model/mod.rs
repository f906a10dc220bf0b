//! Domain model for the user service.
//!
//! # Responsibility
//! - Define the canonical data structures used by core business logic.
//!
//! # Invariants
//! - Every stored user is identified by a unique `UserId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod user;
