//! Background click counter.
//!
//! The redirect handler enqueues a [`ClickEvent`] and returns immediately;
//! this worker drains the channel and applies one atomic increment per event.
//! Delivery is at most once: a full queue drops events at the sender, and a
//! failed increment is logged and forgotten. The increment is only retried
//! when no connection could be acquired, since then the statement never ran;
//! any other failure may have committed and is not repeated.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

use crate::application::services::LinkService;
use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Retries after the first increment that could not get a connection.
const MAX_RETRIES: usize = 3;

/// Base delay of the exponential backoff, in milliseconds.
const BACKOFF_BASE_MS: u64 = 10;

const BACKOFF_MAX: Duration = Duration::from_secs(1);

/// Consumes click events until every sender is dropped.
///
/// At most `concurrency` increments run at once. Returns after the channel
/// closes and in-flight increments have finished.
pub async fn run_click_worker<L>(
    mut rx: mpsc::Receiver<ClickEvent>,
    link_service: Arc<LinkService<L>>,
    concurrency: usize,
) where
    L: LinkRepository + 'static,
{
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    tracing::info!(concurrency, "Click worker started");

    while let Some(event) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };
        let service = link_service.clone();

        tasks.spawn(async move {
            record(&service, event).await;
            drop(permit);
        });

        while tasks.try_join_next().is_some() {}
    }

    while tasks.join_next().await.is_some() {}

    tracing::info!("Click worker stopped");
}

async fn record<L: LinkRepository>(service: &LinkService<L>, event: ClickEvent) {
    let strategy = ExponentialBackoff::from_millis(BACKOFF_BASE_MS)
        .max_delay(BACKOFF_MAX)
        .map(jitter)
        .take(MAX_RETRIES);

    let result = RetryIf::start(
        strategy,
        || service.record_click(&event.alias),
        |e: &AppError| matches!(e, AppError::Unavailable { .. }),
    )
    .await;

    match result {
        Ok(()) => {
            metrics::counter!("clicks_recorded_total").increment(1);
        }
        Err(AppError::NotFound { .. }) => {
            metrics::counter!("clicks_failed_total").increment(1);
            tracing::warn!(alias = %event.alias, "Click for unknown alias discarded");
        }
        Err(e) => {
            metrics::counter!("clicks_failed_total").increment(1);
            tracing::error!(
                alias = %event.alias,
                occurred_at = %event.occurred_at,
                error = %e,
                "Failed to record click"
            );
        }
    }
}
