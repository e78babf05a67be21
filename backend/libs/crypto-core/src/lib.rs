//! Token signing and password hashing shared by the Justhink services.
//!
//! - `jwt`: HS256 bearer tokens carrying the subject id only
//! - `password`: Argon2id hashing for stored credentials

pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtError, JwtKeys};
pub use password::{hash_password, verify_password, PasswordError};
