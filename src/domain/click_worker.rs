//! Background worker persisting click events.
//!
//! The redirect path never awaits a click write. Events arrive over a bounded
//! channel and are written concurrently (bounded by a semaphore); every write has
//! its own error boundary that logs and moves on. Failed writes are not retried.

use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, info, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::ClickRepository;

/// Runs until every sender is dropped and all in-flight writes have finished.
///
/// # Arguments
///
/// - `rx` - receiving half of the click queue
/// - `clicks` - click log store
/// - `concurrency` - maximum number of simultaneous writes (at least 1)
pub async fn run_click_worker<C>(
    mut rx: mpsc::Receiver<ClickEvent>,
    clicks: Arc<C>,
    concurrency: usize,
) where
    C: ClickRepository + ?Sized + 'static,
{
    let concurrency = concurrency.max(1);
    let permits = Arc::new(Semaphore::new(concurrency));

    while let Some(event) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };
        let clicks = clicks.clone();

        tokio::spawn(async move {
            persist_click(clicks.as_ref(), event).await;
            drop(permit);
        });
    }

    // Wait for in-flight writes before reporting shutdown.
    let _ = permits.acquire_many(concurrency as u32).await;
    info!("Click worker stopped");
}

async fn persist_click<C>(clicks: &C, event: ClickEvent)
where
    C: ClickRepository + ?Sized,
{
    let link_id = event.link_id;

    match clicks.record_click(event.into()).await {
        Ok(click) => {
            metrics::counter!("clicks_recorded_total").increment(1);
            debug!(link_id, click_id = click.id, "Click recorded");
        }
        Err(e) => {
            metrics::counter!("clicks_failed_total").increment(1);
            warn!(link_id, error = %e, "Failed to record click");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Click;
    use crate::domain::repositories::MockClickRepository;
    use crate::error::AppError;
    use serde_json::json;

    fn event(link_id: i64) -> ClickEvent {
        ClickEvent::new(link_id, "0".repeat(64), None)
    }

    #[tokio::test]
    async fn test_worker_persists_all_events() {
        let mut mock_repo = MockClickRepository::new();
        mock_repo.expect_record_click().times(3).returning(|c| {
            Ok(Click::new(1, c.link_id, c.clicked_at, c.ip_hash, c.referrer))
        });

        let (tx, rx) = mpsc::channel(16);
        for id in 1..=3 {
            tx.send(event(id)).await.unwrap();
        }
        drop(tx);

        run_click_worker(rx, Arc::new(mock_repo), 2).await;
    }

    #[tokio::test]
    async fn test_worker_survives_store_failures() {
        let mut mock_repo = MockClickRepository::new();
        let mut seq = mockall::Sequence::new();
        mock_repo
            .expect_record_click()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));
        mock_repo
            .expect_record_click()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|c| Ok(Click::new(2, c.link_id, c.clicked_at, c.ip_hash, c.referrer)));

        let (tx, rx) = mpsc::channel(16);
        tx.send(event(1)).await.unwrap();
        tx.send(event(2)).await.unwrap();
        drop(tx);

        // Concurrency of one keeps the writes ordered for the sequence check.
        run_click_worker(rx, Arc::new(mock_repo), 1).await;
    }

    #[tokio::test]
    async fn test_worker_zero_concurrency_is_clamped() {
        let mut mock_repo = MockClickRepository::new();
        mock_repo.expect_record_click().times(1).returning(|c| {
            Ok(Click::new(1, c.link_id, c.clicked_at, c.ip_hash, c.referrer))
        });

        let (tx, rx) = mpsc::channel(4);
        tx.send(event(9)).await.unwrap();
        drop(tx);

        run_click_worker(rx, Arc::new(mock_repo), 0).await;
    }
}
