//! Email Value Object

use std::fmt;

use thiserror::Error;

/// Maximum total email length (RFC 5321 forward-path limit)
pub const MAX_EMAIL_LENGTH: usize = 254;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailError {
    #[error("email address is malformed")]
    Malformed,

    #[error("email must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },
}

/// Unique email address. Shape-checked only; deliverability is out of scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    pub fn new(raw: impl Into<String>) -> Result<Self, EmailError> {
        let raw = raw.into();

        let char_count = raw.chars().count();
        if char_count > MAX_EMAIL_LENGTH {
            return Err(EmailError::TooLong {
                max: MAX_EMAIL_LENGTH,
                actual: char_count,
            });
        }

        if raw.chars().any(char::is_whitespace) {
            return Err(EmailError::Malformed);
        }

        let (local, domain) = raw.split_once('@').ok_or(EmailError::Malformed)?;

        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(EmailError::Malformed);
        }

        // Domain needs at least one interior dot
        if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return Err(EmailError::Malformed);
        }

        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_valid() {
        assert!(Email::new("a@x.com").is_ok());
        assert!(Email::new("first.last@sub.example.org").is_ok());
    }

    #[test]
    fn test_rejects_malformed() {
        for raw in ["", "no-at.com", "@x.com", "a@", "a@nodot", "a b@x.com", "a@.com", "a@x.com."] {
            assert_eq!(Email::new(raw).unwrap_err(), EmailError::Malformed, "{raw}");
        }
    }

    #[test]
    fn test_rejects_too_long() {
        let raw = format!("{}@example.com", "x".repeat(250));
        assert!(matches!(Email::new(raw), Err(EmailError::TooLong { .. })));
    }
}
