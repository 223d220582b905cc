//! Input validation for account fields.
//!
//! Covers usernames, passwords and email addresses. All checks run before
//! any write.

use thiserror::Error;

use crate::CorkboardError;

/// Minimum username length.
pub const MIN_USERNAME_LENGTH: usize = 4;

/// Maximum username length.
pub const MAX_USERNAME_LENGTH: usize = 16;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum email length.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Account field validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Username is too short.
    #[error("username must be at least {MIN_USERNAME_LENGTH} characters")]
    UsernameTooShort,

    /// Username is too long.
    #[error("username must be at most {MAX_USERNAME_LENGTH} characters")]
    UsernameTooLong,

    /// Username contains invalid characters.
    #[error("username can only contain alphanumeric characters and underscores")]
    UsernameInvalidChars,

    /// Username is reserved.
    #[error("this username is reserved")]
    UsernameReserved,

    /// Username already exists.
    #[error("username is already taken")]
    UsernameTaken,

    /// Password is too short.
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    PasswordTooShort,

    /// Password is too long.
    #[error("password must be at most {MAX_PASSWORD_LENGTH} characters")]
    PasswordTooLong,

    /// Password is the same as username.
    #[error("password cannot be the same as username")]
    PasswordSameAsUsername,

    /// Email is too long.
    #[error("email must be at most {MAX_EMAIL_LENGTH} characters")]
    EmailTooLong,

    /// Email format is invalid.
    #[error("invalid email format")]
    EmailInvalidFormat,

    /// An update request changed nothing.
    #[error("nothing to update")]
    EmptyUpdate,
}

impl From<ValidationError> for CorkboardError {
    fn from(e: ValidationError) -> Self {
        CorkboardError::Validation(e.to_string())
    }
}

const RESERVED_USERNAMES: &[&str] = &[
    "admin",
    "administrator",
    "anonymous",
    "guest",
    "moderator",
    "null",
    "root",
    "support",
    "system",
];

/// Check if a username is reserved.
pub fn is_reserved_username(username: &str) -> bool {
    let lower = username.to_lowercase();
    RESERVED_USERNAMES.iter().any(|&r| r == lower)
}

/// Validate a username: 4-16 characters of `[A-Za-z0-9_]`, not reserved.
///
/// # Examples
///
/// ```
/// use corkboard::auth::validation::validate_username;
///
/// assert!(validate_username("john_doe").is_ok());
/// assert!(validate_username("ab").is_err());
/// assert!(validate_username("admin").is_err());
/// ```
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.len() < MIN_USERNAME_LENGTH {
        return Err(ValidationError::UsernameTooShort);
    }
    if username.len() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::UsernameTooLong);
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(ValidationError::UsernameInvalidChars);
    }
    if is_reserved_username(username) {
        return Err(ValidationError::UsernameReserved);
    }
    Ok(())
}

/// Validate a password: 8-128 characters, not equal to the username.
pub fn validate_password(password: &str, username: Option<&str>) -> Result<(), ValidationError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }
    if len > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooLong);
    }
    if let Some(user) = username {
        if password.eq_ignore_ascii_case(user) {
            return Err(ValidationError::PasswordSameAsUsername);
        }
    }
    Ok(())
}

/// Validate an email address with a basic shape check.
///
/// # Examples
///
/// ```
/// use corkboard::auth::validation::validate_email;
///
/// assert!(validate_email("user@example.com").is_ok());
/// assert!(validate_email("invalid").is_err());
/// ```
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::EmailTooLong);
    }
    if email.chars().any(|c| c.is_whitespace()) {
        return Err(ValidationError::EmailInvalidFormat);
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::EmailInvalidFormat);
    };
    if local.is_empty() || domain.contains('@') || !domain.contains('.') {
        return Err(ValidationError::EmailInvalidFormat);
    }
    if domain.split('.').any(|p| p.is_empty()) {
        return Err(ValidationError::EmailInvalidFormat);
    }
    Ok(())
}

/// Normalize an optional email field: blank input means "no email".
pub fn normalize_email(email: Option<&str>) -> Result<Option<String>, ValidationError> {
    match email.map(str::trim) {
        None | Some("") => Ok(None),
        Some(e) => {
            validate_email(e)?;
            Ok(Some(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username_valid() {
        assert!(validate_username("john").is_ok());
        assert!(validate_username("john_doe").is_ok());
        assert!(validate_username("JohnDoe123").is_ok());
    }

    #[test]
    fn test_validate_username_length() {
        assert_eq!(validate_username("abc"), Err(ValidationError::UsernameTooShort));
        assert_eq!(
            validate_username(&"a".repeat(17)),
            Err(ValidationError::UsernameTooLong)
        );
        assert!(validate_username(&"a".repeat(16)).is_ok());
    }

    #[test]
    fn test_validate_username_chars() {
        assert_eq!(
            validate_username("john doe"),
            Err(ValidationError::UsernameInvalidChars)
        );
        assert_eq!(
            validate_username("john-doe"),
            Err(ValidationError::UsernameInvalidChars)
        );
    }

    #[test]
    fn test_validate_username_reserved() {
        assert_eq!(validate_username("Admin"), Err(ValidationError::UsernameReserved));
        assert_eq!(validate_username("guest"), Err(ValidationError::UsernameReserved));
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("password123", Some("alice")).is_ok());
        assert_eq!(
            validate_password("short", None),
            Err(ValidationError::PasswordTooShort)
        );
        assert_eq!(
            validate_password(&"p".repeat(129), None),
            Err(ValidationError::PasswordTooLong)
        );
        assert_eq!(
            validate_password("AliceBob", Some("alicebob")),
            Err(ValidationError::PasswordSameAsUsername)
        );
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("user.name@mail.example.co.jp").is_ok());
        assert_eq!(validate_email("invalid"), Err(ValidationError::EmailInvalidFormat));
        assert_eq!(validate_email("@example.com"), Err(ValidationError::EmailInvalidFormat));
        assert_eq!(validate_email("user@localhost"), Err(ValidationError::EmailInvalidFormat));
        assert_eq!(validate_email("user@example."), Err(ValidationError::EmailInvalidFormat));
        assert_eq!(validate_email("a@b@c.com"), Err(ValidationError::EmailInvalidFormat));
        assert_eq!(validate_email("us er@example.com"), Err(ValidationError::EmailInvalidFormat));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email(None), Ok(None));
        assert_eq!(normalize_email(Some("  ")), Ok(None));
        assert_eq!(
            normalize_email(Some(" user@example.com ")),
            Ok(Some("user@example.com".to_string()))
        );
        assert!(normalize_email(Some("bad")).is_err());
    }

    #[test]
    fn test_into_corkboard_error() {
        let err: CorkboardError = ValidationError::UsernameTaken.into();
        assert!(matches!(err, CorkboardError::Validation(msg) if msg.contains("taken")));
    }
}
