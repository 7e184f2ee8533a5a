//! `trailhead-auth` — authentication boundary (tokens, passwords, roles).
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod claims;
pub mod password;
pub mod roles;
pub mod token;

pub use claims::Claims;
pub use password::{PasswordError, PasswordHasher};
pub use roles::Role;
pub use token::{sign_token, verify_token, AuthError};
