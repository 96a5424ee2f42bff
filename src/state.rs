//! Shared application state injected into every handler.
//!
//! The datastore is an explicitly constructed capability: either the
//! repositories were built and the services are [`Store::Available`], or the
//! datastore was never configured and every store-backed request answers 500.

use sqlx::PgPool;
use std::sync::Arc;

use crate::application::services::{
    AuthService, ClickService, DomainService, LinkService, PasteService, RedirectService,
};
use crate::config::Config;
use crate::domain::repositories::{
    ClickRepository, DomainRepository, LinkRepository, PasteRepository,
};
use crate::error::AppError;
use crate::infrastructure::persistence::{
    PgClickRepository, PgDomainRepository, PgLinkRepository, PgPasteRepository,
};

/// Repository handles the services are built from.
#[derive(Clone)]
pub struct Repositories {
    pub domains: Arc<dyn DomainRepository>,
    pub links: Arc<dyn LinkRepository>,
    pub pastes: Arc<dyn PasteRepository>,
    pub clicks: Arc<dyn ClickRepository>,
}

impl Repositories {
    pub fn postgres(pool: Arc<PgPool>) -> Self {
        Self {
            domains: Arc::new(PgDomainRepository::new(pool.clone())),
            links: Arc::new(PgLinkRepository::new(pool.clone())),
            pastes: Arc::new(PgPasteRepository::new(pool.clone())),
            clicks: Arc::new(PgClickRepository::new(pool)),
        }
    }
}

/// Store-backed services.
pub struct Services {
    pub domains: Arc<DomainService>,
    pub links: Arc<LinkService>,
    pub pastes: Arc<PasteService>,
    pub clicks: Arc<ClickService>,
    pub redirects: Arc<RedirectService>,
}

impl Services {
    pub fn new(repositories: Repositories, app_hostname: Option<String>) -> Self {
        let domains = Arc::new(DomainService::new(repositories.domains, app_hostname));
        let links = Arc::new(LinkService::new(repositories.links, domains.clone()));
        let pastes = Arc::new(PasteService::new(repositories.pastes, domains.clone()));
        let clicks = Arc::new(ClickService::new(repositories.clicks));
        let redirects = Arc::new(RedirectService::new(
            domains.clone(),
            links.clone(),
            clicks.clone(),
        ));

        Self {
            domains,
            links,
            pastes,
            clicks,
            redirects,
        }
    }
}

pub enum Store {
    Available(Services),
    Unavailable,
}

/// Request-handling settings taken from [`Config`].
#[derive(Debug, Clone)]
pub struct Settings {
    pub app_hostname: Option<String>,
    pub cookie_secure: bool,
    pub behind_proxy: bool,
    pub rate_limit: bool,
    pub static_dir: String,
}

impl Settings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            app_hostname: config.app_hostname.clone(),
            cookie_secure: config.cookie_secure,
            behind_proxy: config.behind_proxy,
            rate_limit: config.rate_limit,
            static_dir: config.static_dir.clone(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_hostname: None,
            cookie_secure: true,
            behind_proxy: false,
            rate_limit: true,
            static_dir: "static".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub settings: Arc<Settings>,
    store: Arc<Store>,
    pool: Option<PgPool>,
}

impl AppState {
    /// Builds the state for the server binary.
    ///
    /// `pool` is `None` when no datastore is configured.
    pub fn new(config: &Config, pool: Option<PgPool>) -> Self {
        let repositories = pool.clone().map(|p| Repositories::postgres(Arc::new(p)));

        let state = Self::from_parts(
            AuthService::new(config.admin_secret.clone()),
            Settings::from_config(config),
            repositories,
        );

        match pool {
            Some(pool) => state.with_pool(pool),
            None => state,
        }
    }

    /// Builds a state over arbitrary repositories.
    pub fn from_parts(
        auth: AuthService,
        settings: Settings,
        repositories: Option<Repositories>,
    ) -> Self {
        let store = match repositories {
            Some(repos) => Store::Available(Services::new(repos, settings.app_hostname.clone())),
            None => Store::Unavailable,
        };

        Self {
            auth: Arc::new(auth),
            settings: Arc::new(settings),
            store: Arc::new(store),
            pool: None,
        }
    }

    /// Attaches the pool used for health checks.
    pub fn with_pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    pub fn is_store_available(&self) -> bool {
        matches!(*self.store, Store::Available(_))
    }

    /// # Errors
    ///
    /// Returns [`AppError::Internal`] when no datastore is configured.
    pub fn services(&self) -> Result<&Services, AppError> {
        match &*self.store {
            Store::Available(services) => Ok(services),
            Store::Unavailable => {
                tracing::error!("Datastore is not configured; set DATABASE_URL");
                Err(AppError::internal(
                    "Server configuration error",
                    serde_json::json!({ "reason": "datastore unavailable" }),
                ))
            }
        }
    }

    pub fn domains(&self) -> Result<&DomainService, AppError> {
        Ok(&self.services()?.domains)
    }

    pub fn links(&self) -> Result<&LinkService, AppError> {
        Ok(&self.services()?.links)
    }

    pub fn pastes(&self) -> Result<&PasteService, AppError> {
        Ok(&self.services()?.pastes)
    }

    pub fn clicks(&self) -> Result<&ClickService, AppError> {
        Ok(&self.services()?.clicks)
    }

    pub fn redirects(&self) -> Result<&RedirectService, AppError> {
        Ok(&self.services()?.redirects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_unavailable_store_is_server_error() {
        let state = AppState::from_parts(
            AuthService::new(Some("s3cret".to_string())),
            Settings::default(),
            None,
        );

        assert!(!state.is_store_available());
        let err = state.links().err().unwrap();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Server configuration error");
    }
}
