use crate::error::{ApiError, FieldError};

/// Basic email shape check: one `@`, non-empty local and domain parts, a
/// dot somewhere in the domain.
pub fn email_format(email: &str) -> bool {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty() && !domain.is_empty() && domain.contains('.')
        }
        _ => false,
    }
}

/// Display colors are `#RRGGBB`, case-insensitive.
pub fn color_format(color: &str) -> bool {
    let Some(hex) = color.strip_prefix('#') else {
        return false;
    };
    hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit())
}

/// Turn accumulated field violations into the wire error: first violation
/// as the message, the full list as details.
pub fn reject_if_invalid(details: Vec<FieldError>) -> Result<(), ApiError> {
    match details.first() {
        Some(first) => {
            let message = first.message.clone();
            Err(ApiError::validation(message, details))
        }
        None => Ok(()),
    }
}
