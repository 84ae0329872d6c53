use crate::error::CoreError;

pub fn normalize_email(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_ascii_lowercase())
}

/// Loose shape check: one `@` with something on both sides and no whitespace.
pub fn validate_email(value: &str) -> Result<(), CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::EmptyEmail);
    }
    let (local, domain) = trimmed
        .split_once('@')
        .ok_or_else(|| CoreError::InvalidEmail(trimmed.to_string()))?;
    if local.is_empty()
        || domain.is_empty()
        || domain.contains('@')
        || trimmed.chars().any(char::is_whitespace)
    {
        return Err(CoreError::InvalidEmail(trimmed.to_string()));
    }
    Ok(())
}
