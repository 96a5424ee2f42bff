#![allow(dead_code)]

use axum::Router;
use axum::extract::ConnectInfo;
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use linkpaste::application::services::AuthService;
use linkpaste::application::services::auth_service::hash_password;
use linkpaste::routes;
use linkpaste::state::{AppState, Repositories, Settings};
use sqlx::PgPool;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::Layer;

pub const ADMIN_SECRET: &str = "test-admin-secret";
pub const HOST: &str = "s.example.com";
pub const APP_HOST: &str = "app.example.com";

/// Injects a fixed peer address, as `into_make_service_with_connect_info` would.
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
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

pub fn test_settings() -> Settings {
    Settings {
        app_hostname: Some(APP_HOST.to_string()),
        cookie_secure: false,
        rate_limit: false,
        ..Default::default()
    }
}

pub fn create_test_state(pool: PgPool) -> AppState {
    AppState::from_parts(
        AuthService::new(Some(ADMIN_SECRET.to_string())),
        test_settings(),
        Some(Repositories::postgres(Arc::new(pool.clone()))),
    )
    .with_pool(pool)
}

pub fn create_app(state: AppState) -> Router {
    routes::router(state).layer(MockConnectInfoLayer)
}

pub fn create_server(pool: PgPool) -> TestServer {
    TestServer::new(create_app(create_test_state(pool))).unwrap()
}

pub fn bearer() -> String {
    format!("Bearer {ADMIN_SECRET}")
}

pub async fn create_test_domain(pool: &PgPool, hostname: &str) {
    sqlx::query("INSERT INTO domains (hostname) VALUES ($1)")
        .bind(hostname)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn create_test_link(pool: &PgPool, slug: &str, url: &str, password: Option<&str>) {
    let hash = password.map(|p| hash_password(p).unwrap());
    sqlx::query("INSERT INTO links (slug, url, hostname, password_hash) VALUES ($1, $2, $3, $4)")
        .bind(slug)
        .bind(url)
        .bind(HOST)
        .bind(hash)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn create_test_paste(
    pool: &PgPool,
    slug: &str,
    content: &str,
    password: Option<&str>,
    expires_at: Option<DateTime<Utc>>,
) {
    let hash = password.map(|p| hash_password(p).unwrap());
    sqlx::query(
        "INSERT INTO pastes (slug, content, hostname, password_hash, expires_at) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(slug)
    .bind(content)
    .bind(HOST)
    .bind(hash)
    .bind(expires_at)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn click_count(pool: &PgPool, slug: &str) -> i64 {
    sqlx::query_scalar("SELECT click_count FROM links WHERE slug = $1")
        .bind(slug)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn click_rows(pool: &PgPool, slug: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM clicks WHERE link_slug = $1")
        .bind(slug)
        .fetch_one(pool)
        .await
        .unwrap()
}
