//! Fetching pages for a [`ListController`](crate::controller::ListController).
//!
//! [`PageSource`] is the seam between the controller and wherever the pages
//! come from: [`CatalogClient`] talks to a running server over HTTP,
//! [`LocalSource`] queries an in-process catalog. [`drive`] performs one
//! [`FetchRequest`] against a source and reports the outcome back.

use crate::catalog::Catalog;
use crate::controller::{Delivery, FetchRequest, ListController, PageResponse};
use crate::filter::{ProductFilter, ProjectFilter};
use crate::paginate::PageRequest;
use crate::params::{ProductQuery, ProjectQuery};
use crate::query::{self, Envelope, ListMeta, ListResult, ProductEcho, ProjectEcho};
use crate::types::{Product, Project};
use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid server URL {0:?}")]
    Url(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned status {0}")]
    Status(u16),
    #[error("{0}")]
    Api(String),
    #[error("query worker failed: {0}")]
    Worker(String),
}

/// Something that can produce one page of records `T` for a filter `F`.
#[async_trait]
pub trait PageSource<F: Sync, T>: Send + Sync {
    async fn fetch(&self, filter: &F, page: PageRequest) -> Result<PageResponse<T>, ClientError>;
}

/// Perform `request` against `source` and hand the result to `controller`.
pub async fn drive<T, F, S>(
    controller: &mut ListController<T, F>,
    source: &S,
    request: FetchRequest<F>,
) -> Delivery
where
    F: Clone + PartialEq + Sync,
    S: PageSource<F, T> + ?Sized,
{
    debug!(page = request.page.page(), kind = ?request.kind, "fetching");
    match source.fetch(&request.filter, request.page).await {
        Ok(response) => controller.on_success(request.ticket, response),
        Err(err) => {
            warn!(error = %err, page = request.page.page(), "fetch failed");
            controller.on_failure(request.ticket, err.to_string())
        }
    }
}

impl<T, E> From<ListResult<T, E>> for PageResponse<T> {
    fn from(list: ListResult<T, E>) -> Self {
        PageResponse {
            items: list.data,
            meta: list.meta.page,
        }
    }
}

// =========================================================================
// HTTP
// =========================================================================

/// JSON API client for a catalog server.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    base: Url,
    http: reqwest::Client,
}

impl CatalogClient {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:3000`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base = Url::parse(base_url).map_err(|_| ClientError::Url(base_url.to_string()))?;
        Ok(Self {
            base,
            http: reqwest::Client::new(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub async fn products(
        &self,
        query: &ProductQuery,
    ) -> Result<ListResult<Product, ProductEcho>, ClientError> {
        self.get_list("/api/products", &query.to_api_pairs()).await
    }

    pub async fn projects(
        &self,
        query: &ProjectQuery,
    ) -> Result<ListResult<Project, ProjectEcho>, ClientError> {
        self.get_list("/api/projects", &query.to_api_pairs()).await
    }

    async fn get_list<T, E>(
        &self,
        path: &str,
        pairs: &[(&'static str, String)],
    ) -> Result<ListResult<T, E>, ClientError>
    where
        T: DeserializeOwned,
        E: DeserializeOwned,
    {
        let url = self
            .base
            .join(path)
            .map_err(|_| ClientError::Url(format!("{}{path}", self.base)))?;
        let response = self.http.get(url).query(pairs).send().await?;
        let status = response.status();
        if !status.is_success() {
            // Error bodies are envelopes too; prefer their message.
            return match response.json::<Envelope<()>>().await {
                Ok(Envelope {
                    error: Some(message),
                    ..
                }) => Err(ClientError::Api(message)),
                _ => Err(ClientError::Status(status.as_u16())),
            };
        }
        let envelope: Envelope<Vec<T>, ListMeta<E>> = response.json().await?;
        ListResult::from_envelope(envelope).map_err(ClientError::Api)
    }
}

#[async_trait]
impl PageSource<ProductFilter, Product> for CatalogClient {
    async fn fetch(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> Result<PageResponse<Product>, ClientError> {
        let query = ProductQuery::new(filter.clone(), page);
        Ok(self.products(&query).await?.into())
    }
}

#[async_trait]
impl PageSource<ProjectFilter, Project> for CatalogClient {
    async fn fetch(
        &self,
        filter: &ProjectFilter,
        page: PageRequest,
    ) -> Result<PageResponse<Project>, ClientError> {
        let query = ProjectQuery::new(filter.clone(), page);
        Ok(self.projects(&query).await?.into())
    }
}

// =========================================================================
// In-process
// =========================================================================

/// Serves pages straight from a loaded catalog.
#[derive(Debug, Clone)]
pub struct LocalSource {
    catalog: Arc<Catalog>,
}

impl LocalSource {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl PageSource<ProductFilter, Product> for LocalSource {
    async fn fetch(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> Result<PageResponse<Product>, ClientError> {
        let catalog = Arc::clone(&self.catalog);
        let query = ProductQuery::new(filter.clone(), page);
        let list = tokio::task::spawn_blocking(move || query::run_products(&catalog, &query))
            .await
            .map_err(|e| ClientError::Worker(e.to_string()))?;
        Ok(list.into())
    }
}

#[async_trait]
impl PageSource<ProjectFilter, Project> for LocalSource {
    async fn fetch(
        &self,
        filter: &ProjectFilter,
        page: PageRequest,
    ) -> Result<PageResponse<Project>, ClientError> {
        let catalog = Arc::clone(&self.catalog);
        let query = ProjectQuery::new(filter.clone(), page);
        let list = tokio::task::spawn_blocking(move || query::run_projects(&catalog, &query))
            .await
            .map_err(|e| ClientError::Worker(e.to_string()))?;
        Ok(list.into())
    }
}
