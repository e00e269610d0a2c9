//! Display Name Value Object

use std::fmt;

use thiserror::Error;

/// Maximum display name length
pub const MAX_NAME_LENGTH: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisplayNameError {
    #[error("name must not be empty")]
    Empty,

    #[error("name must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },
}

/// Human-readable name shown to other users. Not unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(raw: impl Into<String>) -> Result<Self, DisplayNameError> {
        let trimmed = raw.into().trim().to_string();

        if trimmed.is_empty() {
            return Err(DisplayNameError::Empty);
        }

        let char_count = trimmed.chars().count();
        if char_count > MAX_NAME_LENGTH {
            return Err(DisplayNameError::TooLong {
                max: MAX_NAME_LENGTH,
                actual: char_count,
            });
        }

        Ok(Self(trimmed))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_and_accepts() {
        let name = DisplayName::new("  Alice  ").unwrap();
        assert_eq!(name.as_str(), "Alice");
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(DisplayName::new("   ").unwrap_err(), DisplayNameError::Empty);
    }

    #[test]
    fn test_rejects_too_long() {
        assert!(matches!(
            DisplayName::new("x".repeat(31)),
            Err(DisplayNameError::TooLong { actual: 31, .. })
        ));
    }
}
