//! Repository implementations for database operations.

pub mod api_key;
pub mod command;
pub mod controller;
pub mod identity;

pub use api_key::ApiKeyRepository;
pub use command::PgCommandStore;
pub use controller::ControllerRepository;
pub use identity::PgIdentityDirectory;

use domain::store::StoreError;

/// Maps a sqlx error onto the store taxonomy.
///
/// Integrity violations (foreign key, unique, check, value too long) become
/// `ConstraintViolation`; everything else is a transient `Unavailable`.
pub fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if let Some(code) = db_err.code() {
            if is_constraint_code(code.as_ref()) {
                return StoreError::ConstraintViolation(db_err.message().to_string());
            }
        }
    }
    StoreError::Unavailable(err.to_string())
}

fn is_constraint_code(code: &str) -> bool {
    matches!(code, "23503" | "23505" | "23514" | "22001")
}
