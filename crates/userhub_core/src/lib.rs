//! Core domain logic for the user service.
//! This crate is the single source of truth for business invariants;
//! transports (gRPC, HTTP gateway) sit outside it.

pub mod clock;
pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, ServiceConfig};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::user::{Timestamp, User, UserId, UserValidationError};
pub use repo::user_repo::{
    InMemoryUserRepository, RepoError, RepoResult, UserPatch, UserRepository,
};
pub use service::user_service::{
    CreateUserRequest, ServiceResult, UpdateUserRequest, UserService, UserServiceError,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
