//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tokio::sync::mpsc::error::TrySendError;
use url::Url;

use crate::domain::click_event::ClickEvent;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects an alias to its original URL.
///
/// # Endpoint
///
/// `GET /{alias}`
///
/// # Request Flow
///
/// 1. Look up the link by alias
/// 2. Enqueue a click event without waiting
/// 3. Return 302 Found
///
/// # Click Tracking
///
/// Click events go to a bounded channel drained by
/// [`crate::application::click_worker::run_click_worker`]. If the queue is
/// full or closed the click is dropped with a warning; the redirect is never
/// delayed or failed because of counting.
///
/// # Errors
///
/// Returns 404 Not Found if the alias doesn't exist.
pub async fn redirect_handler(
    Path(alias): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let link = state.link_service.resolve(&alias).await?;

    let location = location_header(&link.original_url)?;

    match state.click_sender.try_send(ClickEvent::new(link.alias)) {
        Ok(()) => {
            metrics::counter!("clicks_enqueued_total").increment(1);
        }
        Err(TrySendError::Full(event)) => {
            metrics::counter!("clicks_dropped_total").increment(1);
            tracing::warn!(alias = %event.alias, "Click queue full, click dropped");
        }
        Err(TrySendError::Closed(event)) => {
            metrics::counter!("clicks_dropped_total").increment(1);
            tracing::warn!(alias = %event.alias, "Click queue closed, click dropped");
        }
    }

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

/// Builds the `Location` value from the URL's parsed, percent-encoded form.
///
/// `HeaderValue` accepts raw bytes above 0x7F, so non-ASCII must be encoded
/// before it gets there. The stored string is used as-is only if it does
/// not parse.
fn location_header(original_url: &str) -> Result<HeaderValue, AppError> {
    let encoded = Url::parse(original_url)
        .ok()
        .and_then(|u| HeaderValue::from_str(u.as_str()).ok());

    encoded
        .or_else(|| HeaderValue::from_str(original_url).ok())
        .ok_or_else(|| {
            AppError::internal(
                "Stored URL cannot be used as a redirect target",
                json!({ "url": original_url }),
            )
        })
}
