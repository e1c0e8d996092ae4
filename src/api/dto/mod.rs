//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for request shape checks. Business rules (URL safety, alias charset,
//! credential policy) are enforced by the services.

pub mod auth;
pub mod health;
pub mod links;
pub mod pagination;
