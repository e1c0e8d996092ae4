//! Business logic services for the application layer.

pub mod alias_allocator;
pub mod auth_service;
pub mod link_service;

pub use alias_allocator::AliasAllocator;
pub use auth_service::{AuthService, AuthSession};
pub use link_service::LinkService;
