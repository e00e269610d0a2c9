//! Value Objects
//!
//! Parse-don't-validate wrappers for identity attributes. Construction is
//! the validation boundary; the rest of the crate assumes these are
//! well-formed.

pub mod display_name;
pub mod email;
pub mod username;

pub use display_name::DisplayName;
pub use email::Email;
pub use username::Username;

/// Identity ID (typed UUID from the shared kernel)
pub use kernel::id::UserId;
