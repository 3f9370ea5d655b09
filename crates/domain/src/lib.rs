//! Domain layer for the field dispatch backend.
//!
//! This crate contains:
//! - Domain models (Command, CommandStatus, request/response payloads)
//! - The command store contract and an in-memory implementation
//! - The identity directory contract (controllers, API keys)
//! - The command queue service that owns the command lifecycle

pub mod models;
pub mod services;
pub mod store;
