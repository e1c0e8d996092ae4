//! Password hashing and token signing backends.
//!
//! - [`Argon2PasswordHasher`] - Argon2id PHC strings
//! - [`JwtTokenIssuer`] - HS256 JSON Web Tokens

pub mod argon2_hasher;
pub mod jwt;

pub use argon2_hasher::Argon2PasswordHasher;
pub use jwt::JwtTokenIssuer;
