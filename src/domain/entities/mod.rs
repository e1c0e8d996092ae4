//! Core domain entities.
//!
//! - [`Link`] - A shortened URL owned by a user
//! - [`User`] - An account that owns links
//!
//! Entities use separate `New*` structs for inserts; the store fills in
//! identifiers and timestamps.

pub mod link;
pub mod user;

pub use link::{Link, NewLink};
pub use user::{NewUser, User};
