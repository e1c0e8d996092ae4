//! Application layer services implementing business logic.
//!
//! Services validate input, enforce ownership, and coordinate repository
//! calls. Handlers talk only to this layer.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Link creation, lookup, click counting
//! - [`services::alias_allocator::AliasAllocator`] - Unique alias allocation with retry
//! - [`services::auth_service::AuthService`] - Registration, login, token checks
//!
//! [`click_worker::run_click_worker`] drains redirect clicks in the background.

pub mod click_worker;
pub mod services;
