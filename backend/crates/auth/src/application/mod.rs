//! Application Layer
//!
//! Use cases, token service, and application configuration.

pub mod config;
pub mod login;
pub mod logout;
pub mod refresh;
pub mod register;
pub mod token;

// Re-exports
pub use config::AuthConfig;
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use logout::LogoutUseCase;
pub use refresh::{RefreshOutput, RefreshUseCase};
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use token::{TokenPair, TokenService};
