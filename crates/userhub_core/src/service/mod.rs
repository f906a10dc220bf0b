//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep transport layers (RPC, HTTP gateway) decoupled from storage details.

pub mod user_service;
