use validator::ValidateEmail;

use super::error::DomainError;

pub(crate) fn normalize_email(field: &'static str, email: &str) -> Result<String, DomainError> {
    let email = email.trim().to_lowercase();
    if !email.validate_email() {
        return Err(DomainError::Validation {
            field,
            message: "must be a valid email",
        });
    }
    Ok(email)
}

/// Empty viewer means an anonymous read.
pub(crate) fn normalize_viewer(viewer: Option<&str>) -> Result<Option<String>, DomainError> {
    match viewer.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => normalize_email("viewer", raw).map(Some),
    }
}
