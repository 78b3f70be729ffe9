use clubhouse_core::{DomainError, DomainResult};

/// Validate a display name: letters, digits and spaces, within `min..=max` chars.
pub(crate) fn validate_name(field: &str, raw: &str, min: usize, max: usize) -> DomainResult<String> {
    let len = raw.chars().count();
    if !(min..=max).contains(&len) {
        return Err(DomainError::validation(format!(
            "{field} must be between {min} and {max} characters long"
        )));
    }
    if !raw.chars().all(|c| c.is_ascii_alphanumeric() || c == ' ') {
        return Err(DomainError::validation(format!(
            "{field} must contain only letters, numbers, and spaces"
        )));
    }
    if raw.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} must not be blank")));
    }
    Ok(raw.to_string())
}
