//! # Catalog Core
//!
//! Domain types and collaborator traits for the product catalog streams.
//!
//! This crate holds everything the reactive layers agree on:
//!
//! - **Identifiers**: [`ProductId`], [`CategoryId`], [`SupplierId`] with the
//!   reserved zero sentinel
//! - **Records**: [`Product`], [`Category`], [`Supplier`] in their wire shape
//! - **Enrichment**: the category join and price markup applied to raw products
//! - **Errors**: [`CatalogError`], the single failure type carried by every stream
//! - **Environment**: the [`HttpClient`] and [`CategorySource`] collaborators
//!
//! ## Example
//!
//! ```
//! use catalog_core::{Category, CategoryId, Product, ProductId};
//!
//! let categories = vec![Category::new(CategoryId::new(3), "Toolbox")];
//! let raw = Product::placeholder();
//!
//! let enriched = raw.enrich(&categories).unwrap();
//! assert_eq!(enriched.category.as_deref(), Some("Toolbox"));
//! assert_eq!(enriched.id, ProductId::new(42));
//! ```

pub mod environment;
pub mod error;
pub mod id;
pub mod product;

pub use environment::{BoxFuture, CatalogStream, CategorySource, HttpClient, get_json};
pub use error::CatalogError;
pub use id::{CategoryId, ParseIdError, ProductId, SupplierId};
pub use product::{Category, PRICE_MARKUP, Product, Supplier, enrich_products};
