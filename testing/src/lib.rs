//! # Catalog Testing
//!
//! Testing utilities for the product catalog streams.
//!
//! This crate provides:
//! - [`MockHttpClient`]: in-memory [`HttpClient`] with per-path responses,
//!   delays and a call log
//! - [`StaticCategorySource`]: [`CategorySource`] backed by a replaying subject
//! - [`fixtures`]: a small sample catalog (categories, products, suppliers)
//! - [`helpers`]: timed stream assertions
//!
//! ## Example
//!
//! ```ignore
//! use catalog_testing::{fixtures, helpers::next_within};
//!
//! #[tokio::test]
//! async fn test_enriched_products() {
//!     let http = fixtures::catalog_client();
//!     let categories = StaticCategorySource::new(fixtures::categories());
//!     let service = ProductService::new(Arc::new(http), Arc::new(categories), ApiConfig::default());
//!
//!     let products = next_within(&mut service.products_with_categories(), TIMEOUT).await;
//!     assert_eq!(products.unwrap().unwrap().len(), 5);
//! }
//! ```

pub mod fixtures;

/// Mock implementations of the collaborator traits.
pub mod mocks {
    use catalog_core::{
        BoxFuture, CatalogError, CatalogStream, Category, CategorySource, HttpClient,
    };
    use catalog_runtime::Subject;
    use futures::StreamExt;
    use std::collections::HashMap;
    use std::sync::{Mutex, PoisonError};
    use std::time::Duration;

    #[derive(Clone, Debug)]
    struct Route {
        response: Result<serde_json::Value, CatalogError>,
        delay: Option<Duration>,
    }

    /// In-memory HTTP client keyed by request path.
    ///
    /// Unregistered paths answer with a 404 [`CatalogError::Backend`]. Every
    /// request is recorded, including ones that fail.
    ///
    /// # Example
    ///
    /// ```
    /// use catalog_testing::mocks::MockHttpClient;
    /// use serde_json::json;
    ///
    /// let client = MockHttpClient::new()
    ///     .with_json("products/", json!([]))
    ///     .with_delay("products/", std::time::Duration::from_millis(5));
    /// assert_eq!(client.call_count("products/"), 0);
    /// ```
    #[derive(Debug, Default)]
    pub struct MockHttpClient {
        routes: Mutex<HashMap<String, Route>>,
        calls: Mutex<Vec<String>>,
    }

    impl MockHttpClient {
        /// Create a client with no routes.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        fn set_response(&self, path: &str, response: Result<serde_json::Value, CatalogError>) {
            let mut routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);
            routes
                .entry(path.to_string())
                .and_modify(|route| route.response = response.clone())
                .or_insert(Route {
                    response,
                    delay: None,
                });
        }

        /// Answer `path` with a JSON document.
        #[must_use]
        pub fn with_json(self, path: &str, value: serde_json::Value) -> Self {
            self.set_response(path, Ok(value));
            self
        }

        /// Answer `path` with an error.
        #[must_use]
        pub fn with_error(self, path: &str, error: CatalogError) -> Self {
            self.set_response(path, Err(error));
            self
        }

        /// Delay the answer for `path`.
        #[must_use]
        pub fn with_delay(self, path: &str, delay: Duration) -> Self {
            {
                let mut routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);
                routes
                    .entry(path.to_string())
                    .and_modify(|route| route.delay = Some(delay))
                    .or_insert(Route {
                        response: Err(not_found(path)),
                        delay: Some(delay),
                    });
            }
            self
        }

        /// Replace the JSON answer for `path` on a shared client.
        pub fn respond_json(&self, path: &str, value: serde_json::Value) {
            self.set_response(path, Ok(value));
        }

        /// Every requested path, in request order.
        #[must_use]
        pub fn calls(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// How many times `path` was requested.
        #[must_use]
        pub fn call_count(&self, path: &str) -> usize {
            self.calls
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .iter()
                .filter(|call| call.as_str() == path)
                .count()
        }
    }

    fn not_found(path: &str) -> CatalogError {
        CatalogError::Backend {
            status: 404,
            message: format!("No mock route for {path}"),
        }
    }

    impl HttpClient for MockHttpClient {
        fn get<'a>(
            &'a self,
            path: &'a str,
        ) -> BoxFuture<'a, Result<serde_json::Value, CatalogError>> {
            self.calls
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(path.to_string());

            let route = self
                .routes
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get(path)
                .cloned();

            Box::pin(async move {
                let Some(route) = route else {
                    return Err(not_found(path));
                };
                if let Some(delay) = route.delay {
                    tokio::time::sleep(delay).await;
                }
                route.response
            })
        }
    }

    /// Category source backed by a replay-latest subject.
    ///
    /// Every subscriber receives the current collection; [`StaticCategorySource::publish`]
    /// pushes a new one to all of them. [`StaticCategorySource::fail`] pushes an
    /// error.
    #[derive(Debug, Clone)]
    pub struct StaticCategorySource {
        categories: Subject<Result<Vec<Category>, CatalogError>>,
    }

    impl StaticCategorySource {
        /// Create a source holding `categories`.
        #[must_use]
        pub fn new(categories: Vec<Category>) -> Self {
            Self {
                categories: Subject::behavior(Ok(categories)),
            }
        }

        /// Create a source that has not produced anything yet.
        #[must_use]
        pub fn empty() -> Self {
            Self {
                categories: Subject::replay_latest(),
            }
        }

        /// Replace the category collection.
        pub fn publish(&self, categories: Vec<Category>) {
            self.categories.next(Ok(categories));
        }

        /// Push a failure.
        pub fn fail(&self, error: CatalogError) {
            self.categories.next(Err(error));
        }
    }

    impl CategorySource for StaticCategorySource {
        fn categories(&self) -> CatalogStream<Vec<Category>> {
            self.categories.subscribe().boxed()
        }
    }
}

/// Timed stream assertions.
///
/// Reactive tests mostly ask two questions: "does the next value arrive soon"
/// and "does nothing arrive". Both need a timeout so a broken pipeline fails
/// the test instead of hanging it.
pub mod helpers {
    use futures::{Stream, StreamExt};
    use std::time::Duration;

    /// Default wait used by the catalog tests.
    pub const TIMEOUT: Duration = Duration::from_secs(1);

    /// Await the next item, or `None` if the stream ends or `timeout` passes.
    pub async fn next_within<S>(stream: &mut S, timeout: Duration) -> Option<S::Item>
    where
        S: Stream + Unpin,
    {
        tokio::time::timeout(timeout, stream.next())
            .await
            .ok()
            .flatten()
    }

    /// Check that no item arrives within `window` (an ended stream counts as silent).
    pub async fn is_silent<S>(stream: &mut S, window: Duration) -> bool
    where
        S: Stream + Unpin,
    {
        !matches!(tokio::time::timeout(window, stream.next()).await, Ok(Some(_)))
    }

    /// Await the stream's end, collecting items, failing after `timeout`.
    pub async fn collect_within<S>(stream: S, timeout: Duration) -> Option<Vec<S::Item>>
    where
        S: Stream,
    {
        tokio::time::timeout(timeout, stream.collect::<Vec<_>>())
            .await
            .ok()
    }

    /// Install a test-friendly tracing subscriber (idempotent).
    pub fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    }
}

// Re-export commonly used items
pub use mocks::{MockHttpClient, StaticCategorySource};
