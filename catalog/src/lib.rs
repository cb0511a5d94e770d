//! # Catalog
//!
//! Reactive product catalog: aggregation service, view models and the HTTP
//! collaborators that feed them.
//!
//! ## Layers
//!
//! - [`ProductService`]: fetches products and categories, joins them, tracks
//!   the selected product, looks up suppliers and accumulates session-local
//!   insertions
//! - [`views`]: list, picker and detail view models that catch stream failures
//!   into observable [`views::ErrorMessage`] slots
//! - [`http`]: `reqwest` implementations of the collaborator traits
//! - [`config`] and [`telemetry`]: layered configuration and tracing setup
//!
//! ## Example
//!
//! ```rust,ignore
//! use catalog::{CatalogConfig, HttpCategorySource, ProductService, ReqwestClient};
//! use catalog::views::ProductListViewModel;
//! use std::sync::Arc;
//!
//! let config = CatalogConfig::from_env()?;
//! catalog::telemetry::init_tracing(&config.observability);
//!
//! let http = Arc::new(ReqwestClient::new(&config.api)?);
//! let categories = Arc::new(HttpCategorySource::new(http.clone(), &config.api));
//! let service = Arc::new(ProductService::new(http, categories, config.api));
//!
//! let list = ProductListViewModel::new(service);
//! let mut products = list.products();
//! while let Some(products) = products.next().await {
//!     println!("{}: {} products", list.page_title(), products.len());
//! }
//! ```

pub mod config;
pub mod http;
pub mod service;
pub mod telemetry;
pub mod views;

pub use config::{ApiConfig, CatalogConfig, ConfigError, ObservabilityConfig};
pub use http::{HttpCategorySource, ReqwestClient};
pub use service::ProductService;
