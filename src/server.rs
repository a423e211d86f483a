//! HTTP surface: JSON list/detail endpoints plus server-rendered listing pages.
//!
//! | Route | Body |
//! |-------|------|
//! | `GET /api/products` | paged, filtered products |
//! | `GET /api/products/:id` | one product |
//! | `GET /api/projects` | paged, filtered projects |
//! | `GET /api/projects/featured` | the featured project |
//! | `GET /api/projects/:id` | one project |
//! | `GET /products`, `GET /projects` | HTML listings |
//! | `GET /healthz` | liveness and catalog counts |
//!
//! Every JSON body is an [`Envelope`]. Query execution runs on the blocking
//! pool; a panic there is reported as a 500 with a generic message and the
//! details go to the log only.

use crate::catalog::Catalog;
use crate::config::{ApiConfig, SiteConfig};
use crate::paginate::{PageMeta, PageRequest};
use crate::params::{ProductQuery, ProjectQuery};
use crate::query::{self, Envelope, ListResult, ProductList, ProjectList};
use crate::render;
use crate::types::{Product, Project};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinError;
use tracing::{error, info, instrument};

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("invalid bind address {0:?}")]
    Bind(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub api: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(catalog: Catalog, api: ApiConfig) -> Self {
        Self {
            catalog: Arc::new(catalog),
            api: Arc::new(api),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz_handler))
        .route("/api/products", get(products_handler))
        .route("/api/products/:id", get(product_detail_handler))
        .route("/api/projects", get(projects_handler))
        .route("/api/projects/featured", get(featured_project_handler))
        .route("/api/projects/:id", get(project_detail_handler))
        .route("/products", get(products_page_handler))
        .route("/projects", get(projects_page_handler))
        .fallback(not_found_handler)
        .with_state(state)
}

/// Bind `config.server.bind` and serve until SIGINT/SIGTERM.
pub async fn serve(config: &SiteConfig, catalog: Catalog) -> Result<(), ServeError> {
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .map_err(|_| ServeError::Bind(config.server.bind.clone()))?;
    let products = catalog.products.len();
    let projects = catalog.projects.len();
    let app = build_router(AppState::new(catalog, config.api.clone()));

    let listener = TcpListener::bind(addr).await?;
    info!(
        addr = %listener.local_addr()?,
        products,
        projects,
        "glass-catalog listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await?;
    info!("shutdown complete");
    Ok(())
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    info!("shutdown signal received");
}

// =========================================================================
// JSON API
// =========================================================================

fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(Envelope::<()>::failure(message))).into_response()
}

/// Run a catalog query on the blocking pool.
async fn run_query<T, F>(catalog: &Arc<Catalog>, f: F) -> Result<T, JoinError>
where
    T: Send + 'static,
    F: FnOnce(&Catalog) -> T + Send + 'static,
{
    let catalog = Arc::clone(catalog);
    tokio::task::spawn_blocking(move || f(&catalog)).await
}

/// The envelope for a finished list query. A failed worker becomes a 500
/// carrying only `failure`; the cause is logged.
fn list_response<T, E>(result: Result<ListResult<T, E>, JoinError>, failure: &str) -> Response
where
    T: Serialize,
    E: Serialize,
{
    match result {
        Ok(list) => Json(Envelope::from(list)).into_response(),
        Err(err) => {
            error!(error = %err, "{failure}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, failure)
        }
    }
}

async fn artificial_delay(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[instrument(skip_all, fields(route = "/api/products"))]
async fn products_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let query = ProductQuery::from_params(&params, state.api.products_defaults());
    let result = run_query(&state.catalog, move |c| query::run_products(c, &query)).await;
    artificial_delay(state.api.products_delay()).await;
    if let Ok(list) = &result {
        info!(
            page = list.meta.page.page,
            limit = list.meta.page.limit,
            total = list.meta.page.total,
            "products listed"
        );
    }
    list_response(result, "Failed to fetch products")
}

#[instrument(skip_all, fields(route = "/api/projects"))]
async fn projects_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let query = ProjectQuery::from_params(&params, state.api.projects_defaults());
    let result = run_query(&state.catalog, move |c| query::run_projects(c, &query)).await;
    artificial_delay(state.api.projects_delay()).await;
    if let Ok(list) = &result {
        info!(
            page = list.meta.page.page,
            limit = list.meta.page.limit,
            total = list.meta.page.total,
            category = %list.meta.filters.category,
            "projects listed"
        );
    }
    list_response(result, "Failed to fetch projects")
}

async fn product_detail_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match state.catalog.product(&id) {
        Some(product) => Json(Envelope::<&Product>::ok(product)).into_response(),
        None => json_error(StatusCode::NOT_FOUND, "Product not found"),
    }
}

async fn project_detail_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match state.catalog.project(&id) {
        Some(project) => Json(Envelope::<&Project>::ok(project)).into_response(),
        None => json_error(StatusCode::NOT_FOUND, "Project not found"),
    }
}

async fn featured_project_handler(State(state): State<AppState>) -> Response {
    match state.catalog.featured_project() {
        Some(project) => Json(Envelope::<&Project>::ok(project)).into_response(),
        None => json_error(StatusCode::NOT_FOUND, "No featured project"),
    }
}

async fn healthz_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": crate::VERSION,
        "build": crate::BUILD,
        "products": state.catalog.products.len(),
        "projects": state.catalog.projects.len(),
    }))
}

async fn not_found_handler() -> Response {
    json_error(StatusCode::NOT_FOUND, "Not found")
}

// =========================================================================
// HTML pages
// =========================================================================

/// Everything up to and including the requested page, so that a reloaded
/// or shared `?page=3` URL shows the same accumulated list as scrolling did.
pub fn accumulated_products(catalog: &Catalog, query: &ProductQuery) -> ProductList {
    let requested = query.page;
    let upto = PageRequest::new(1, requested.limit().saturating_mul(requested.page()));
    let mut list = query::run_products(catalog, &ProductQuery::new(query.filter.clone(), upto));
    list.meta.page = PageMeta::new(requested, list.meta.page.total);
    list
}

fn html_failure(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(render::error_page(message).into_string()),
    )
        .into_response()
}

#[instrument(skip_all, fields(route = "/products"))]
async fn products_page_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let defaults = state.api.products_defaults();
    let query = ProductQuery::from_params(&params, defaults);
    let result = run_query(&state.catalog, move |c| {
        let list = accumulated_products(c, &query);
        render::products_page(&list, &query, defaults).into_string()
    })
    .await;
    match result {
        Ok(page) => Html(page).into_response(),
        Err(err) => {
            error!(error = %err, "products page failed");
            html_failure("Failed to fetch products")
        }
    }
}

#[instrument(skip_all, fields(route = "/projects"))]
async fn projects_page_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let defaults = state.api.projects_defaults();
    let query = ProjectQuery::from_params(&params, defaults);
    let result = run_query(&state.catalog, move |c| {
        let list: ProjectList = query::run_projects(c, &query);
        render::projects_page(
            &list,
            &query,
            defaults,
            c.featured_project(),
            &c.project_categories(),
        )
        .into_string()
    })
    .await;
    match result {
        Ok(page) => Html(page).into_response(),
        Err(err) => {
            error!(error = %err, "projects page failed");
            html_failure("Failed to fetch projects")
        }
    }
}
