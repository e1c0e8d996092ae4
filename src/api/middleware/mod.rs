//! HTTP middleware for request processing and protection.
//!
//! Provides bearer authentication, the admin gate, and request tracing.

pub mod auth;
pub mod tracing;
