//! API route table and router construction.
//!
//! Every `/api` endpoint is declared once in [`ROUTE_TABLE`]. The Axum router
//! is built from the table, and [`classify`] answers the same question for a
//! bare `(method, path)` pair so dispatch can be tested without handlers.

use std::collections::BTreeMap;

use axum::{
    Router,
    http::Method,
    middleware,
    routing::{MethodFilter, MethodRouter, any, on},
};
use serde_json::json;

use crate::api::handlers::{
    add_domain_handler, create_paste_handler, delete_link_handler, delete_paste_handler,
    get_paste_handler, link_details_handler, list_domains_handler, list_links_handler,
    list_pastes_handler, login_handler, logout_handler, remove_domain_handler, shorten_handler,
    update_link_handler, verify_password_handler,
};
use crate::api::middleware::{auth, rate_limit};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Login,
    Logout,
    VerifyPassword,
    GetPaste,
    ListDomains,
    RemoveDomain,
    AddDomain,
    ListLinks,
    UpdateLink,
    DeleteLink,
    Shorten,
    CreatePaste,
    ListPastes,
    DeletePaste,
    LinkDetails,
}

impl Operation {
    /// Operations that check a caller-supplied secret and are rate limited.
    pub fn checks_credentials(self) -> bool {
        matches!(self, Operation::Login | Operation::VerifyPassword)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// No admin credential; the endpoint carries its own per-resource secret
    /// or none at all.
    Public,
    /// Bearer admin secret or session cookie required.
    Admin,
}

#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub method: Method,
    pub path: &'static str,
    pub operation: Operation,
    pub access: Access,
}

const fn entry(
    method: Method,
    path: &'static str,
    operation: Operation,
    access: Access,
) -> RouteEntry {
    RouteEntry {
        method,
        path,
        operation,
        access,
    }
}

/// Every API endpoint.
pub const ROUTE_TABLE: &[RouteEntry] = &[
    entry(Method::POST, "/api/login", Operation::Login, Access::Public),
    entry(Method::POST, "/api/logout", Operation::Logout, Access::Public),
    entry(Method::POST, "/api/verify-password", Operation::VerifyPassword, Access::Public),
    entry(Method::GET, "/api/get-paste", Operation::GetPaste, Access::Public),
    entry(Method::GET, "/api/domains", Operation::ListDomains, Access::Admin),
    entry(Method::DELETE, "/api/domains", Operation::RemoveDomain, Access::Admin),
    entry(Method::POST, "/api/add-domain", Operation::AddDomain, Access::Admin),
    entry(Method::GET, "/api/links", Operation::ListLinks, Access::Admin),
    entry(Method::PUT, "/api/links", Operation::UpdateLink, Access::Admin),
    entry(Method::DELETE, "/api/links", Operation::DeleteLink, Access::Admin),
    entry(Method::POST, "/api/shorten", Operation::Shorten, Access::Admin),
    entry(Method::POST, "/api/create-paste", Operation::CreatePaste, Access::Admin),
    entry(Method::GET, "/api/pastes", Operation::ListPastes, Access::Admin),
    entry(Method::DELETE, "/api/pastes", Operation::DeletePaste, Access::Admin),
    entry(Method::GET, "/api/link-details", Operation::LinkDetails, Access::Admin),
];

/// Outcome of looking a request up in [`ROUTE_TABLE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMatch {
    Matched(&'static RouteEntry),
    /// The path exists, but not for this method.
    MethodNotAllowed(Access),
    NotFound,
}

impl PartialEq for RouteEntry {
    fn eq(&self, other: &Self) -> bool {
        self.method == other.method && self.path == other.path
    }
}

impl Eq for RouteEntry {}

/// Classifies an API request by method and path.
///
/// A trailing slash is ignored. `HEAD` is not an alias for `GET`.
pub fn classify(method: &Method, path: &str) -> RouteMatch {
    let path = match path.trim_end_matches('/') {
        "" => "/",
        p => p,
    };

    let mut access_on_path = None;

    for route in ROUTE_TABLE.iter().filter(|r| r.path == path) {
        if route.method == *method {
            return RouteMatch::Matched(route);
        }
        access_on_path = Some(route.access);
    }

    access_on_path.map_or(RouteMatch::NotFound, RouteMatch::MethodNotAllowed)
}

/// The `/api` router.
///
/// Admin paths are wrapped in [`auth::layer`] via `route_layer`, which also
/// covers their 405 fallback. Credential checks are rate limited when enabled.
pub fn router(state: &AppState) -> Router<AppState> {
    let credentials = rate_limit::limit_credentials(
        routes_where(|r| r.access == Access::Public && r.operation.checks_credentials()),
        &state.settings,
    );

    let public = routes_where(|r| r.access == Access::Public && !r.operation.checks_credentials());

    let admin = routes_where(|r| r.access == Access::Admin)
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    Router::new()
        .merge(credentials)
        .merge(public)
        .merge(admin)
        .route("/api", any(api_not_found))
        .route("/api/{*rest}", any(api_not_found))
}

fn routes_where(keep: impl Fn(&RouteEntry) -> bool) -> Router<AppState> {
    let mut by_path: BTreeMap<&'static str, MethodRouter<AppState>> = BTreeMap::new();

    for route in ROUTE_TABLE.iter().filter(|r| keep(r)) {
        let Ok(filter) = MethodFilter::try_from(route.method.clone()) else {
            tracing::error!(method = %route.method, path = route.path, "Unsupported method in route table");
            continue;
        };

        let endpoint = endpoint(filter, route.operation);
        let merged = match by_path.remove(route.path) {
            Some(existing) => existing.merge(endpoint),
            None => endpoint,
        };
        by_path.insert(route.path, merged);
    }

    by_path
        .into_iter()
        .fold(Router::new(), |router, (path, methods)| {
            router.route(path, methods.fallback(method_not_allowed))
        })
}

fn endpoint(filter: MethodFilter, operation: Operation) -> MethodRouter<AppState> {
    match operation {
        Operation::Login => on(filter, login_handler),
        Operation::Logout => on(filter, logout_handler),
        Operation::VerifyPassword => on(filter, verify_password_handler),
        Operation::GetPaste => on(filter, get_paste_handler),
        Operation::ListDomains => on(filter, list_domains_handler),
        Operation::RemoveDomain => on(filter, remove_domain_handler),
        Operation::AddDomain => on(filter, add_domain_handler),
        Operation::ListLinks => on(filter, list_links_handler),
        Operation::UpdateLink => on(filter, update_link_handler),
        Operation::DeleteLink => on(filter, delete_link_handler),
        Operation::Shorten => on(filter, shorten_handler),
        Operation::CreatePaste => on(filter, create_paste_handler),
        Operation::ListPastes => on(filter, list_pastes_handler),
        Operation::DeletePaste => on(filter, delete_paste_handler),
        Operation::LinkDetails => on(filter, link_details_handler),
    }
}

async fn api_not_found() -> AppError {
    AppError::not_found("API route not found.", json!({}))
}

async fn method_not_allowed() -> AppError {
    AppError::method_not_allowed("Method not allowed.", json!({}))
}
