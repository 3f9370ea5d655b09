//! Shared utilities and common types for the field dispatch backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Clock abstraction (substitutable "now")
//! - API key hashing
//! - Offset pagination parameters and pages
//! - Common validation logic

pub mod clock;
pub mod crypto;
pub mod pagination;
pub mod validation;
