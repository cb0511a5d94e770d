//! Collaborator traits injected into the product service.
//!
//! The service never talks to the network directly. It depends on an
//! [`HttpClient`] for request/response and a [`CategorySource`] for category
//! reference data, so tests can swap both for in-memory doubles.
//!
//! # Dyn Compatibility
//!
//! Both traits return boxed futures and streams instead of using `async fn`
//! so they can be held as `Arc<dyn HttpClient>` and `Arc<dyn CategorySource>`
//! inside long-lived stream pipelines.

use crate::error::CatalogError;
use crate::product::Category;
use futures::Stream;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::pin::Pin;

/// Boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Stream of catalog values where the first `Err` ends the stream.
pub type CatalogStream<T> = Pin<Box<dyn Stream<Item = Result<T, CatalogError>> + Send>>;

/// Asynchronous GET against the catalog backend.
///
/// `path` is relative to the backend base URL, e.g. `products/` or
/// `suppliers/5`. Implementations map transport failures to
/// [`CatalogError::Network`] and unsuccessful statuses to
/// [`CatalogError::Backend`].
///
/// # Examples
///
/// ```rust,ignore
/// let value = client.get("products/").await?;
/// let products: Vec<Product> = serde_json::from_value(value)?;
/// ```
pub trait HttpClient: Send + Sync {
    /// Fetch the JSON document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Network`], [`CatalogError::Backend`] or
    /// [`CatalogError::Decode`] depending on where the request failed.
    fn get<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<serde_json::Value, CatalogError>>;
}

/// Fetch `path` and decode it into `T`.
///
/// # Errors
///
/// Propagates the client's error, or returns [`CatalogError::Decode`] if the
/// document does not match `T`.
pub async fn get_json<T>(client: &dyn HttpClient, path: &str) -> Result<T, CatalogError>
where
    T: DeserializeOwned,
{
    let value = client.get(path).await?;
    serde_json::from_value(value).map_err(CatalogError::from)
}

/// Source of category reference data.
///
/// Each call returns a fresh stream of category collections. The product
/// service subscribes once and shares the result, so implementations do not
/// need to cache.
pub trait CategorySource: Send + Sync {
    /// Stream the category collection.
    fn categories(&self) -> CatalogStream<Vec<Category>>;
}
