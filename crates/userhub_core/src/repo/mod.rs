//! Repository layer abstractions and storage implementations.
//!
//! # Responsibility
//! - Define the data access contract used by services.
//! - Isolate storage details (currently an in-memory map) from orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`) and surface storage
//!   faults instead of masking them.
//! - Values crossing the repository boundary are always owned copies.

pub mod user_repo;
