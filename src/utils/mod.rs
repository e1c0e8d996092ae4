//! Utility functions shared across layers.
//!
//! - [`code_generator`] - Random alias generation
//! - [`validation`] - URL, alias, and credential validation

pub mod code_generator;
pub mod validation;
