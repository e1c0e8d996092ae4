//! Click event model for asynchronous click counting.

use chrono::{DateTime, Utc};

/// A redirect that still has to be counted.
///
/// Sent from the redirect handler to
/// [`crate::application::click_worker::run_click_worker`] over a bounded channel,
/// so the visitor's redirect never waits on the database write.
#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub alias: String,
    pub occurred_at: DateTime<Utc>,
}

impl ClickEvent {
    /// Creates an event stamped with the current time.
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            occurred_at: Utc::now(),
        }
    }
}
