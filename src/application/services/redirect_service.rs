//! Slug resolution for the public redirect path.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::LinkRepository;
use crate::domain::visitor::Visitor;
use crate::error::AppError;
use crate::utils::fingerprint::ClientFingerprinter;

/// Resolves slugs and hands click events to the background worker.
///
/// Click logging is fire-and-forget: the event is offered to a bounded queue with
/// `try_send`. A full or closed queue drops the event and never delays or fails
/// the redirect.
pub struct RedirectService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
    click_sender: mpsc::Sender<ClickEvent>,
    fingerprinter: ClientFingerprinter,
}

impl<L: LinkRepository + ?Sized> RedirectService<L> {
    pub fn new(
        link_repository: Arc<L>,
        click_sender: mpsc::Sender<ClickEvent>,
        fingerprinter: ClientFingerprinter,
    ) -> Self {
        Self {
            link_repository,
            click_sender,
            fingerprinter,
        }
    }

    /// Looks up `slug` and returns its destination.
    ///
    /// A click event is queued only after a successful lookup.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] - no link has this slug
    /// - [`AppError::Internal`] - store failure during lookup
    pub async fn resolve(&self, slug: &str, visitor: Visitor) -> Result<String, AppError> {
        let link = self
            .link_repository
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::not_found("Short URL not found", json!({ "slug": slug })))?;

        let event = ClickEvent::new(
            link.id,
            self.fingerprinter.fingerprint(&visitor.address),
            visitor.referrer,
        );
        self.enqueue(event);

        Ok(link.destination)
    }

    /// Remaining free slots in the click queue.
    pub fn queue_capacity(&self) -> usize {
        self.click_sender.capacity()
    }

    /// Whether the click worker is still receiving.
    pub fn queue_open(&self) -> bool {
        !self.click_sender.is_closed()
    }

    fn enqueue(&self, event: ClickEvent) {
        let link_id = event.link_id;

        match self.click_sender.try_send(event) {
            Ok(()) => {
                metrics::counter!("clicks_enqueued_total").increment(1);
                debug!(link_id, "Click queued");
            }
            Err(TrySendError::Full(_)) => {
                metrics::counter!("clicks_dropped_total", "reason" => "queue_full").increment(1);
                warn!(link_id, "Click queue full, dropping event");
            }
            Err(TrySendError::Closed(_)) => {
                metrics::counter!("clicks_dropped_total", "reason" => "queue_closed").increment(1);
                warn!(link_id, "Click queue closed, dropping event");
            }
        }
    }
}
