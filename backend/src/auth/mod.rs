//! Authentication module
//!
//! Provides email/password authentication.
//! - bcrypt password hashing
//! - JWT session token generation and validation
//! - Registration and login flows over a user repository

mod jwt;
mod password;
mod service;

pub use jwt::{generate_token, verify_token, Claims, TokenError};
pub use password::{hash_password, verify_password};
pub use service::{AuthError, AuthService};
