//! Common validation utilities.

use validator::ValidationError;

/// Maximum length of a command action or parameter, in characters.
pub const MAX_COMMAND_FIELD_LENGTH: usize = 100;

/// Validates a command action code: non-blank and at most 100 characters.
pub fn validate_action(action: &str) -> Result<(), ValidationError> {
    if action.trim().is_empty() {
        let mut err = ValidationError::new("action_blank");
        err.message = Some("Action must not be blank".into());
        return Err(err);
    }
    validate_field_length("action", action)
}

/// Validates a command parameter: at most 100 characters, may be empty.
pub fn validate_parameter(parameter: &str) -> Result<(), ValidationError> {
    validate_field_length("parameter", parameter)
}

fn validate_field_length(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.chars().count() <= MAX_COMMAND_FIELD_LENGTH {
        Ok(())
    } else {
        let mut err = ValidationError::new("length");
        err.message = Some(
            format!(
                "{} must be at most {} characters",
                capitalize(field),
                MAX_COMMAND_FIELD_LENGTH
            )
            .into(),
        );
        Err(err)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
