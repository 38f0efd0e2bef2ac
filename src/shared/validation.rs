use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Regex for validating national identification numbers.
    /// Alphanumeric plus dots and hyphens, 1-100 characters.
    /// - Valid: "123", "1.020.456.789", "AB-9921"
    /// - Invalid: "", "12 34", "id#99"
    pub static ref NATIONAL_ID_REGEX: Regex = Regex::new(r"^[A-Za-z0-9.-]{1,100}$").unwrap();
}

/// Build a `ValidationError` with a fixed message.
pub fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Rejects fields that are empty or whitespace-only.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(validation_error(
            "not_blank",
            "field must not be empty or whitespace",
        ));
    }
    Ok(())
}

/// Password strength rule for the reset flow: at least 8 characters,
/// one lowercase, one uppercase and one digit.
pub fn password_strength(value: &str) -> Result<(), ValidationError> {
    if value.len() < 8 {
        return Err(validation_error(
            "password_strength",
            "password must be at least 8 characters",
        ));
    }
    if !value.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(validation_error(
            "password_strength",
            "password must contain at least one lowercase letter",
        ));
    }
    if !value.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(validation_error(
            "password_strength",
            "password must contain at least one uppercase letter",
        ));
    }
    if !value.chars().any(|c| c.is_ascii_digit()) {
        return Err(validation_error(
            "password_strength",
            "password must contain at least one digit",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_national_id_regex_valid() {
        assert!(NATIONAL_ID_REGEX.is_match("123"));
        assert!(NATIONAL_ID_REGEX.is_match("1.020.456.789"));
        assert!(NATIONAL_ID_REGEX.is_match("AB-9921"));
    }

    #[test]
    fn test_national_id_regex_invalid() {
        assert!(!NATIONAL_ID_REGEX.is_match("")); // empty
        assert!(!NATIONAL_ID_REGEX.is_match("12 34")); // space
        assert!(!NATIONAL_ID_REGEX.is_match("id#99")); // symbol
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("Ana").is_ok());
        assert!(not_blank("").is_err());
        assert!(not_blank("   ").is_err());
        assert!(not_blank("\t\n").is_err());
    }

    #[test]
    fn test_password_strength() {
        assert!(password_strength("Sup3rSecret").is_ok());
        assert!(password_strength("short1A").is_err()); // too short
        assert!(password_strength("alllowercase1").is_err()); // no uppercase
        assert!(password_strength("ALLUPPERCASE1").is_err()); // no lowercase
        assert!(password_strength("NoDigitsHere").is_err()); // no digit
    }
}
