//! Shared application state injected into every handler.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::services::{
    AnalyticsService, AuthService, LinkService, RedirectService, SlugAllocator,
};
use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::{ClickRepository, LinkRepository, TokenRepository};
use crate::utils::fingerprint::ClientFingerprinter;

/// Settings the services need beyond their repositories.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub public_base_url: String,
    pub slug_length: usize,
    pub click_hash_secret: String,
    pub token_signing_secret: String,
}

/// Services are held behind `Arc` so cloning the state per request is cheap;
/// repositories are trait objects so tests can swap in fakes.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<dyn LinkRepository>>,
    pub redirect_service: Arc<RedirectService<dyn LinkRepository>>,
    pub analytics_service: Arc<AnalyticsService<dyn LinkRepository, dyn ClickRepository>>,
    pub auth_service: Arc<AuthService<dyn TokenRepository>>,
}

impl AppState {
    /// Wires services over the given repositories.
    ///
    /// `click_sender` is the producing half of the click queue read by
    /// [`crate::domain::click_worker::run_click_worker`].
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        click_repository: Arc<dyn ClickRepository>,
        token_repository: Arc<dyn TokenRepository>,
        click_sender: mpsc::Sender<ClickEvent>,
        settings: ServiceSettings,
    ) -> Self {
        let link_service = Arc::new(LinkService::new(
            link_repository.clone(),
            SlugAllocator::random(settings.slug_length),
            settings.public_base_url,
        ));

        let redirect_service = Arc::new(RedirectService::new(
            link_repository.clone(),
            click_sender,
            ClientFingerprinter::new(settings.click_hash_secret),
        ));

        let analytics_service = Arc::new(AnalyticsService::new(link_repository, click_repository));

        let auth_service = Arc::new(AuthService::new(
            token_repository,
            settings.token_signing_secret,
        ));

        Self {
            link_service,
            redirect_service,
            analytics_service,
            auth_service,
        }
    }
}
