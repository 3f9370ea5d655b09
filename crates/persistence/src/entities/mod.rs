//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod api_key;
pub mod command;

pub use api_key::ApiKeyEntity;
pub use command::CommandEntity;
