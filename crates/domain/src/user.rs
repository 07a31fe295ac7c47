//! User domain types and validation rules.

use serde::{Deserialize, Serialize};

use userdeck_core::{AppError, AppResult};

/// Unique identifier for a user record, assigned by the store on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(i64);

impl UserId {
    /// Creates a user identifier from a store-assigned value.
    #[must_use]
    pub fn from_i64(value: i64) -> Self {
        Self(value)
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Maximum length of a forename or surname.
pub const NAME_MAX_LENGTH: usize = 50;

/// Maximum length of an email address.
pub const EMAIL_MAX_LENGTH: usize = 100;

/// Maximum length of a plaintext password before hashing.
pub const PASSWORD_MAX_LENGTH: usize = 100;

/// Validated forename or surname.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonName(String);

impl PersonName {
    /// Creates a validated person name: non-blank, at most 50 characters.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(AppError::Validation("name must not be empty".to_owned()));
        }

        if trimmed.chars().count() > NAME_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "name must not exceed {NAME_MAX_LENGTH} characters"
            )));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the validated name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<PersonName> for String {
    fn from(value: PersonName) -> Self {
        value.0
    }
}

/// Validated email address, normalized to lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// Performs basic structural validation: non-empty, contains exactly one `@`,
    /// local part and domain are non-empty, domain contains at least one `.`.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim().to_lowercase();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "email address must not be empty".to_owned(),
            ));
        }

        let parts: Vec<&str> = trimmed.splitn(2, '@').collect();
        if parts.len() != 2 {
            return Err(AppError::Validation(
                "email address must contain exactly one '@'".to_owned(),
            ));
        }

        let local = parts[0];
        let domain = parts[1];

        if local.is_empty() {
            return Err(AppError::Validation(
                "email local part must not be empty".to_owned(),
            ));
        }

        if domain.is_empty() || !domain.contains('.') {
            return Err(AppError::Validation(
                "email domain must contain at least one '.'".to_owned(),
            ));
        }

        if trimmed.chars().count() > EMAIL_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "email address must not exceed {EMAIL_MAX_LENGTH} characters"
            )));
        }

        Ok(Self(trimmed))
    }

    /// Returns the validated email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Validates a plaintext password before it is hashed for storage.
pub fn validate_password(password: &str) -> AppResult<()> {
    if password.trim().is_empty() {
        return Err(AppError::Validation(
            "password must not be empty".to_owned(),
        ));
    }

    if password.chars().count() > PASSWORD_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "password must not exceed {PASSWORD_MAX_LENGTH} characters"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn valid_email_is_accepted_and_lowercased() {
        let email = EmailAddress::new("USER@Example.COM")
            .map(String::from)
            .unwrap_or_default();
        assert_eq!(email, "user@example.com");
    }

    #[test]
    fn email_without_at_is_rejected() {
        assert!(EmailAddress::new("noatsign").is_err());
    }

    #[test]
    fn email_without_domain_dot_is_rejected() {
        assert!(EmailAddress::new("user@nodot").is_err());
    }

    #[test]
    fn empty_email_is_rejected() {
        assert!(EmailAddress::new("").is_err());
    }

    #[test]
    fn overlong_email_is_rejected() {
        let local = "a".repeat(EMAIL_MAX_LENGTH);
        assert!(EmailAddress::new(format!("{local}@example.com")).is_err());
    }

    #[test]
    fn blank_name_is_rejected() {
        assert!(PersonName::new("   ").is_err());
    }

    #[test]
    fn name_is_trimmed() {
        let name = PersonName::new("  Ada ").map(String::from).unwrap_or_default();
        assert_eq!(name, "Ada");
    }

    #[test]
    fn overlong_name_is_rejected() {
        let long = "x".repeat(NAME_MAX_LENGTH + 1);
        assert!(PersonName::new(long).is_err());
    }

    #[test]
    fn blank_password_is_rejected() {
        assert!(validate_password("  ").is_err());
    }

    #[test]
    fn overlong_password_is_rejected() {
        let long = "p".repeat(PASSWORD_MAX_LENGTH + 1);
        assert!(validate_password(&long).is_err());
    }

    proptest! {
        #[test]
        fn names_up_to_the_limit_are_accepted(length in 1usize..=NAME_MAX_LENGTH) {
            let name = "n".repeat(length);
            prop_assert!(PersonName::new(name).is_ok());
        }

        #[test]
        fn accepted_emails_are_always_lowercase(local in "[A-Za-z0-9]{1,20}") {
            let email = EmailAddress::new(format!("{local}@Example.com"));
            prop_assert!(email.is_ok());
            if let Ok(email) = email {
                prop_assert_eq!(email.as_str(), email.as_str().to_lowercase());
            }
        }
    }
}
