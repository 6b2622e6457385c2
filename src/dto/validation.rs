//! Validation helpers for DTOs.

use validator::ValidationError;

/// Validates a CSS hex color such as `#1E5CB3` or `#fff`.
///
/// # Examples
///
/// ```ignore
/// validate_hex_color("#1E5CB3") // Ok
/// validate_hex_color("#abc")    // Ok
/// validate_hex_color("1E5CB3")  // Err - missing `#`
/// ```
pub fn validate_hex_color(color: &str) -> Result<(), ValidationError> {
    let Some(digits) = color.strip_prefix('#') else {
        let mut err = ValidationError::new("color_prefix");
        err.message = Some("Color must start with `#`".into());
        return Err(err);
    };

    if !matches!(digits.len(), 3 | 6) || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        let mut err = ValidationError::new("color_format");
        err.message = Some(
            format!("Color must be 3 or 6 hexadecimal digits (got `{digits}`)").into(),
        );
        return Err(err);
    }

    Ok(())
}

/// Rejects identifiers made only of whitespace.
pub fn validate_identifier(id: &str) -> Result<(), ValidationError> {
    if id.trim().is_empty() {
        let mut err = ValidationError::new("identifier_blank");
        err.message = Some("Identifier must not be blank".into());
        return Err(err);
    }
    Ok(())
}
