//! Username Value Object

use std::fmt;

use thiserror::Error;

/// Minimum username length
pub const MIN_USERNAME_LENGTH: usize = 5;

/// Maximum username length
pub const MAX_USERNAME_LENGTH: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsernameError {
    #[error("username must be {min} to {max} characters (got {actual})")]
    InvalidLength {
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("username must not contain whitespace")]
    ContainsWhitespace,
}

/// Unique login name, 5 to 30 characters, no whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    pub fn new(raw: impl Into<String>) -> Result<Self, UsernameError> {
        let raw = raw.into();

        let char_count = raw.chars().count();
        if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&char_count) {
            return Err(UsernameError::InvalidLength {
                min: MIN_USERNAME_LENGTH,
                max: MAX_USERNAME_LENGTH,
                actual: char_count,
            });
        }

        if raw.chars().any(char::is_whitespace) {
            return Err(UsernameError::ContainsWhitespace);
        }

        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
