//! Client-side form validation for sign-up, login and room creation.
//!
//! Each validator returns `Ok(())` or a `DomainError::Validation` carrying
//! the message shown next to the field.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::shared::DomainError;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,6}$").expect("valid email regex")
});
static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z\s]*$").expect("valid name regex"));
static ROOM_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_]+(\s[A-Za-z0-9_]+)*$").expect("valid room name regex")
});

const PASSWORD_MIN_LEN: usize = 8;
const PASSWORD_SPECIALS: &str = "@$!%*?&";
const NAME_MAX_LEN: usize = 50;
const ROOM_NAME_MAX_WORDS: usize = 3;

fn invalid(msg: &str) -> DomainError {
    DomainError::Validation(msg.to_string())
}

pub fn validate_email(email: &str) -> Result<(), DomainError> {
    if email.is_empty() {
        return Err(invalid("Email is required"));
    }
    if !EMAIL_RE.is_match(email) {
        return Err(invalid("Please enter a valid email address"));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), DomainError> {
    if password.is_empty() {
        return Err(invalid("Password is required"));
    }
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(invalid("Password must be at least 8 characters long"));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(invalid(
            "Password must contain at least one lowercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(invalid(
            "Password must contain at least one uppercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(invalid("Password must contain at least one number"));
    }
    if !password.chars().any(|c| PASSWORD_SPECIALS.contains(c)) {
        return Err(invalid(
            "Password must contain at least one special character",
        ));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.is_empty() {
        return Err(invalid("Name is required"));
    }
    if !NAME_RE.is_match(name) {
        return Err(invalid("Name can only contain letters and spaces"));
    }
    if name.chars().count() > NAME_MAX_LEN {
        return Err(invalid("Name cannot exceed 50 characters"));
    }
    Ok(())
}

/// Room names: at most three words of letters, digits or underscores
pub fn validate_room_name(name: &str) -> Result<(), DomainError> {
    let trimmed = name.trim();
    if trimmed.split(' ').count() > ROOM_NAME_MAX_WORDS {
        return Err(invalid("Room name cannot exceed three words."));
    }
    if !ROOM_NAME_RE.is_match(trimmed) {
        return Err(invalid(
            "Room name cannot contain empty spaces or special characters.",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(result: Result<(), DomainError>) -> String {
        result.unwrap_err().message().to_string()
    }

    #[test]
    fn test_email_validation() {
        assert!(validate_email("ada.lovelace@study-verse.io").is_ok());
        assert_eq!(message(validate_email("")), "Email is required");
        assert_eq!(
            message(validate_email("ada@localhost")),
            "Please enter a valid email address"
        );
        assert!(validate_email("ada@example.c").is_err());
    }

    #[test]
    fn test_password_rules_reported_in_order() {
        assert_eq!(message(validate_password("")), "Password is required");
        assert_eq!(
            message(validate_password("Ab1!")),
            "Password must be at least 8 characters long"
        );
        assert_eq!(
            message(validate_password("ABCDEFG1!")),
            "Password must contain at least one lowercase letter"
        );
        assert_eq!(
            message(validate_password("abcdefg1!")),
            "Password must contain at least one uppercase letter"
        );
        assert_eq!(
            message(validate_password("Abcdefgh!")),
            "Password must contain at least one number"
        );
        assert_eq!(
            message(validate_password("Abcdefgh1")),
            "Password must contain at least one special character"
        );
        assert!(validate_password("Abcdefg1!").is_ok());
    }

    #[test]
    fn test_name_validation() {
        assert!(validate_name("Ada Lovelace").is_ok());
        assert_eq!(message(validate_name("")), "Name is required");
        assert_eq!(
            message(validate_name("R2-D2")),
            "Name can only contain letters and spaces"
        );
        assert_eq!(
            message(validate_name(&"a".repeat(51))),
            "Name cannot exceed 50 characters"
        );
    }

    #[test]
    fn test_room_name_validation() {
        assert!(validate_room_name("Linear Algebra").is_ok());
        assert!(validate_room_name("  calc_2  ").is_ok());
        assert_eq!(
            message(validate_room_name("one two three four")),
            "Room name cannot exceed three words."
        );
        assert_eq!(
            message(validate_room_name("physics!")),
            "Room name cannot contain empty spaces or special characters."
        );
        assert!(validate_room_name("two  spaces").is_err());
    }

    #[test]
    fn test_room_name_word_characters_are_ascii_only() {
        assert_eq!(
            message(validate_room_name("café")),
            "Room name cannot contain empty spaces or special characters."
        );
        assert!(validate_room_name("Straße 2").is_err());
        assert!(validate_room_name("cafe_2 room").is_ok());
    }
}
