#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::ConnectInfo;
use axum_test::TestServer;
use chrono::Utc;
use link_shortener::application::services::auth_service::hash_token;
use link_shortener::domain::click_event::ClickEvent;
use link_shortener::domain::entities::{
    Click, Link, LinkFilter, LinkSummary, NewClick, NewLink, Role,
};
use link_shortener::domain::repositories::{
    ApiToken, ClickRepository, LinkRepository, NewApiToken, TokenRepository,
};
use link_shortener::error::AppError;
use link_shortener::routes::{RouterOptions, router};
use link_shortener::state::{AppState, ServiceSettings};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tower::Layer;

pub const TEST_SIGNING_SECRET: &str = "test-signing-secret";
pub const TEST_BASE_URL: &str = "https://sho.rt";

pub const ALICE_TOKEN: &str = "alice-token";
pub const BOB_TOKEN: &str = "bob-token";
pub const ADMIN_TOKEN: &str = "admin-token";

// ─── In-memory link + click store ────────────────────────────────────────────

#[derive(Default)]
struct StoreInner {
    links: Vec<Link>,
    clicks: Vec<Click>,
    next_link_id: i64,
    next_click_id: i64,
}

/// Links and clicks in one place so deletes can cascade.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<StoreInner>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn insert_link(&self, slug: &str, destination: &str, owner: &str) -> Link {
        let mut inner = self.inner.lock().unwrap();
        inner.next_link_id += 1;
        let link = Link::new(
            inner.next_link_id,
            slug.to_string(),
            destination.to_string(),
            owner.to_string(),
            Utc::now(),
        );
        inner.links.push(link.clone());
        link
    }

    pub fn insert_click(&self, link_id: i64, referrer: Option<&str>) {
        let mut inner = self.inner.lock().unwrap();
        inner.next_click_id += 1;
        let click = Click::new(
            inner.next_click_id,
            link_id,
            Utc::now(),
            "0".repeat(64),
            referrer.map(str::to_string),
        );
        inner.clicks.push(click);
    }

    pub fn links(&self) -> Vec<Link> {
        self.inner.lock().unwrap().links.clone()
    }

    pub fn clicks(&self) -> Vec<Click> {
        self.inner.lock().unwrap().clicks.clone()
    }

    fn matches(link: &Link, search: Option<&str>) -> bool {
        match search {
            None => true,
            Some(term) => {
                let term = term.to_lowercase();
                link.slug.to_lowercase().contains(&term)
                    || link.destination.to_lowercase().contains(&term)
            }
        }
    }
}

#[async_trait]
impl LinkRepository for InMemoryStore {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.links.iter().any(|l| l.slug == new_link.slug) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "links_slug_key" }),
            ));
        }

        inner.next_link_id += 1;
        let link = Link::new(
            inner.next_link_id,
            new_link.slug,
            new_link.destination,
            new_link.owner,
            Utc::now(),
        );
        inner.links.push(link.clone());
        Ok(link)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.links.iter().find(|l| l.id == id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Link>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.links.iter().find(|l| l.slug == slug).cloned())
    }

    async fn exists_by_slug(&self, slug: &str) -> Result<bool, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.links.iter().any(|l| l.slug == slug))
    }

    async fn list(&self, filter: LinkFilter) -> Result<Vec<LinkSummary>, AppError> {
        let inner = self.inner.lock().unwrap();

        let mut links: Vec<&Link> = inner
            .links
            .iter()
            .filter(|l| Self::matches(l, filter.search.as_deref()))
            .collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(links
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .map(|link| {
                let clicks: Vec<&Click> =
                    inner.clicks.iter().filter(|c| c.link_id == link.id).collect();
                LinkSummary {
                    link: link.clone(),
                    click_count: clicks.len() as i64,
                    last_click_at: clicks.iter().map(|c| c.clicked_at).max(),
                }
            })
            .collect())
    }

    async fn count(&self, search: Option<String>) -> Result<i64, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .links
            .iter()
            .filter(|l| Self::matches(l, search.as_deref()))
            .count() as i64)
    }

    async fn update_destination(
        &self,
        id: i64,
        destination: String,
    ) -> Result<Option<Link>, AppError> {
        let mut inner = self.inner.lock().unwrap();
        Ok(inner.links.iter_mut().find(|l| l.id == id).map(|l| {
            l.destination = destination;
            l.updated_at = Utc::now();
            l.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.links.len();
        inner.links.retain(|l| l.id != id);
        inner.clicks.retain(|c| c.link_id != id);
        Ok(inner.links.len() < before)
    }
}

#[async_trait]
impl ClickRepository for InMemoryStore {
    async fn record_click(&self, new_click: NewClick) -> Result<Click, AppError> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.links.iter().any(|l| l.id == new_click.link_id) {
            return Err(AppError::internal("Foreign key violation", json!({})));
        }

        inner.next_click_id += 1;
        let click = Click::new(
            inner.next_click_id,
            new_click.link_id,
            new_click.clicked_at,
            new_click.ip_hash,
            new_click.referrer,
        );
        inner.clicks.push(click.clone());
        Ok(click)
    }

    async fn count_for_link(&self, link_id: i64) -> Result<i64, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.clicks.iter().filter(|c| c.link_id == link_id).count() as i64)
    }

    async fn recent_for_link(&self, link_id: i64, limit: i64) -> Result<Vec<Click>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut clicks: Vec<Click> = inner
            .clicks
            .iter()
            .filter(|c| c.link_id == link_id)
            .cloned()
            .collect();
        clicks.sort_by(|a, b| b.clicked_at.cmp(&a.clicked_at).then(b.id.cmp(&a.id)));
        clicks.truncate(limit as usize);
        Ok(clicks)
    }
}

/// Click store that is down: every write stalls, then fails.
pub struct UnavailableClicks {
    pub delay: Duration,
}

#[async_trait]
impl ClickRepository for UnavailableClicks {
    async fn record_click(&self, _new_click: NewClick) -> Result<Click, AppError> {
        tokio::time::sleep(self.delay).await;
        Err(unavailable())
    }

    async fn count_for_link(&self, _link_id: i64) -> Result<i64, AppError> {
        Err(unavailable())
    }

    async fn recent_for_link(&self, _link_id: i64, _limit: i64) -> Result<Vec<Click>, AppError> {
        Err(unavailable())
    }
}

/// Link store that rejects every call.
pub struct UnavailableLinks;

fn unavailable() -> AppError {
    AppError::internal("Database error", json!({}))
}

#[async_trait]
impl LinkRepository for UnavailableLinks {
    async fn create(&self, _new_link: NewLink) -> Result<Link, AppError> {
        Err(unavailable())
    }

    async fn find_by_id(&self, _id: i64) -> Result<Option<Link>, AppError> {
        Err(unavailable())
    }

    async fn find_by_slug(&self, _slug: &str) -> Result<Option<Link>, AppError> {
        Err(unavailable())
    }

    async fn exists_by_slug(&self, _slug: &str) -> Result<bool, AppError> {
        Err(unavailable())
    }

    async fn list(&self, _filter: LinkFilter) -> Result<Vec<LinkSummary>, AppError> {
        Err(unavailable())
    }

    async fn count(&self, _search: Option<String>) -> Result<i64, AppError> {
        Err(unavailable())
    }

    async fn update_destination(
        &self,
        _id: i64,
        _destination: String,
    ) -> Result<Option<Link>, AppError> {
        Err(unavailable())
    }

    async fn delete(&self, _id: i64) -> Result<bool, AppError> {
        Err(unavailable())
    }
}

// ─── In-memory tokens ────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryTokens {
    tokens: Mutex<Vec<ApiToken>>,
}

impl InMemoryTokens {
    /// Store with `alice` and `bob` (members) and `root` (admin).
    pub fn seeded() -> Arc<Self> {
        let store = Self::default();
        store.add(ALICE_TOKEN, "alice", Role::Member);
        store.add(BOB_TOKEN, "bob", Role::Member);
        store.add(ADMIN_TOKEN, "root", Role::Admin);
        Arc::new(store)
    }

    pub fn add(&self, raw_token: &str, owner: &str, role: Role) {
        let mut tokens = self.tokens.lock().unwrap();
        let id = tokens.len() as i64 + 1;
        tokens.push(ApiToken {
            id,
            name: format!("{owner}-{id}"),
            token_hash: hash_token(TEST_SIGNING_SECRET, raw_token),
            owner: owner.to_string(),
            role,
            created_at: Utc::now(),
            last_used_at: None,
            revoked_at: None,
        });
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokens {
    async fn find_active(&self, token_hash: &str) -> Result<Option<ApiToken>, AppError> {
        let tokens = self.tokens.lock().unwrap();
        Ok(tokens
            .iter()
            .find(|t| t.token_hash == token_hash && t.revoked_at.is_none())
            .cloned())
    }

    async fn update_last_used(&self, token_hash: &str) -> Result<(), AppError> {
        let mut tokens = self.tokens.lock().unwrap();
        if let Some(t) = tokens.iter_mut().find(|t| t.token_hash == token_hash) {
            t.last_used_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn create_token(&self, new_token: NewApiToken) -> Result<ApiToken, AppError> {
        let mut tokens = self.tokens.lock().unwrap();
        let token = ApiToken {
            id: tokens.len() as i64 + 1,
            name: new_token.name,
            token_hash: new_token.token_hash,
            owner: new_token.owner,
            role: new_token.role,
            created_at: Utc::now(),
            last_used_at: None,
            revoked_at: None,
        };
        tokens.push(token.clone());
        Ok(token)
    }

    async fn list_tokens(&self) -> Result<Vec<ApiToken>, AppError> {
        Ok(self.tokens.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ApiToken>, AppError> {
        let tokens = self.tokens.lock().unwrap();
        Ok(tokens.iter().find(|t| t.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ApiToken>, AppError> {
        let tokens = self.tokens.lock().unwrap();
        Ok(tokens.iter().find(|t| t.name == name).cloned())
    }

    async fn revoke_token(&self, id: i64) -> Result<(), AppError> {
        let mut tokens = self.tokens.lock().unwrap();
        match tokens.iter_mut().find(|t| t.id == id) {
            Some(t) => {
                t.revoked_at = Some(Utc::now());
                Ok(())
            }
            None => Err(AppError::not_found("Token not found", json!({ "id": id }))),
        }
    }
}

// ─── State and server ────────────────────────────────────────────────────────

pub fn test_settings() -> ServiceSettings {
    ServiceSettings {
        public_base_url: TEST_BASE_URL.to_string(),
        slug_length: 6,
        click_hash_secret: "test-click-secret".to_string(),
        token_signing_secret: TEST_SIGNING_SECRET.to_string(),
    }
}

pub fn create_test_state(
    store: Arc<InMemoryStore>,
    clicks: Arc<dyn ClickRepository>,
    queue_capacity: usize,
) -> (AppState, mpsc::Receiver<ClickEvent>) {
    let (tx, rx) = mpsc::channel(queue_capacity);

    let state = AppState::new(
        store,
        clicks,
        InMemoryTokens::seeded(),
        tx,
        test_settings(),
    );

    (state, rx)
}

/// Inserts a fixed peer address, as `into_make_service_with_connect_info` would.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

pub const TEST_PEER: &str = "127.0.0.1:12345";

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = TEST_PEER.parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

/// Full application router with a mocked peer address.
pub fn test_server(state: AppState) -> TestServer {
    let app = router(state, &RouterOptions::default()).layer(MockConnectInfoLayer);
    TestServer::new(app).unwrap()
}

/// Server over a fresh store whose click queue is returned for inspection.
pub fn make_app() -> (TestServer, Arc<InMemoryStore>, mpsc::Receiver<ClickEvent>) {
    let store = InMemoryStore::new();
    let (state, rx) = create_test_state(store.clone(), store.clone(), 100);
    (test_server(state), store, rx)
}

/// Waits until `store` holds `expected` clicks or the timeout elapses.
pub async fn wait_for_clicks(store: &InMemoryStore, expected: usize) -> Vec<Click> {
    for _ in 0..100 {
        let clicks = store.clicks();
        if clicks.len() >= expected {
            return clicks;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    store.clicks()
}
