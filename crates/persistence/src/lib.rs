//! Persistence layer for the field dispatch backend.
//!
//! This crate contains:
//! - Database connection management and migrations
//! - Entity definitions (database row mappings)
//! - PostgreSQL implementations of the command store and identity directory

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
