//! reqwest-backed collaborators.
//!
//! [`ReqwestClient`] implements [`HttpClient`] against the catalog backend and
//! [`HttpCategorySource`] serves categories from `GET {base}/productCategories/`.

use crate::config::ApiConfig;
use catalog_core::{
    BoxFuture, CatalogError, CatalogStream, Category, CategorySource, HttpClient, get_json,
};
use futures::{StreamExt, stream};
use reqwest::Client;
use std::sync::Arc;

/// HTTP client for the catalog backend
#[derive(Clone, Debug)]
pub struct ReqwestClient {
    client: Client,
    base_url: String,
}

impl ReqwestClient {
    /// Create a client for `api.base_url` with the configured request timeout
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Config` if the underlying client cannot be built
    pub fn new(api: &ApiConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(api.request_timeout())
            .build()
            .map_err(|e| CatalogError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: api.base_url.clone(),
        })
    }

    /// Base URL requests are joined to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a backend path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    #[tracing::instrument(skip(self), fields(base_url = %self.base_url))]
    async fn fetch(&self, path: &str) -> Result<serde_json::Value, CatalogError> {
        let response = self
            .client
            .get(self.url(path))
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "backend rejected request");
            return Err(CatalogError::Backend {
                status: status.as_u16(),
                message: backend_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(CatalogError::from)
    }
}

/// Prefer the `error` field of a JSON error body; fall back to the raw text.
fn backend_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

impl HttpClient for ReqwestClient {
    fn get<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<serde_json::Value, CatalogError>> {
        Box::pin(self.fetch(path))
    }
}

/// Category reference data fetched from the backend.
///
/// Each call to [`CategorySource::categories`] issues one request and yields a
/// single collection (or error).
#[derive(Clone)]
pub struct HttpCategorySource {
    http: Arc<dyn HttpClient>,
    path: String,
}

impl HttpCategorySource {
    /// Serve categories from `api.categories_path` through `http`
    #[must_use]
    pub fn new(http: Arc<dyn HttpClient>, api: &ApiConfig) -> Self {
        Self {
            http,
            path: api.categories_path.clone(),
        }
    }
}

impl std::fmt::Debug for HttpCategorySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCategorySource")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl CategorySource for HttpCategorySource {
    fn categories(&self) -> CatalogStream<Vec<Category>> {
        let http = Arc::clone(&self.http);
        let path = self.path.clone();
        stream::once(async move { get_json::<Vec<Category>>(http.as_ref(), &path).await }).boxed()
    }
}
