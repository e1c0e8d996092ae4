//! Domain layer containing business entities and capability contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`auth`] - Password hashing and token capabilities
//! - [`click_event`] - Click tracking event model
//!
//! # Click Processing Flow
//!
//! 1. Redirect handler resolves the alias and answers immediately
//! 2. [`click_event::ClickEvent`] is sent to a bounded channel
//! 3. [`crate::application::click_worker::run_click_worker`] issues the atomic increment with retry
//! 4. Failures are logged and counted, never reported to the visitor

pub mod auth;
pub mod click_event;
pub mod entities;
pub mod repositories;
