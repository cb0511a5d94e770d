//! Catalog records and the category enrichment join.

use crate::error::CatalogError;
use crate::id::{CategoryId, ProductId, SupplierId};
use serde::{Deserialize, Serialize};

/// Markup applied to the list price of every product in the enriched stream.
pub const PRICE_MARKUP: f64 = 1.3;

/// A product record.
///
/// Raw records come straight from `GET /products/` and leave the derived
/// fields empty. Enriched records carry the category name, the search keys and
/// the marked-up price. Enrichment always starts from a raw record, so the
/// markup is applied exactly once per product in the enriched collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product identifier
    pub id: ProductId,
    /// Display name
    pub product_name: String,
    /// Catalog code, e.g. `TBX-003`
    pub product_code: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Unit price (marked up once enriched)
    pub price: f64,
    /// Category this product belongs to
    pub category_id: CategoryId,
    /// Units on hand
    #[serde(default)]
    pub quantity_in_stock: u32,
    /// Suppliers that carry this product
    #[serde(default)]
    pub supplier_ids: Vec<SupplierId>,
    /// Category name, attached by enrichment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Search keys, attached by enrichment
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub search_key: Vec<String>,
}

impl Product {
    /// The record inserted by `add_product` when no product is supplied.
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            id: ProductId::new(42),
            product_name: "Another one".to_string(),
            product_code: "TBX-003".to_string(),
            description: "Our new product".to_string(),
            price: 8.9,
            category_id: CategoryId::new(3),
            quantity_in_stock: 30,
            supplier_ids: Vec::new(),
            category: None,
            search_key: vec!["Another one".to_string()],
        }
    }

    /// Enrich a single raw product against a category collection.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownCategory`] if no category has this
    /// product's `category_id`.
    pub fn enrich(&self, categories: &[Category]) -> Result<Self, CatalogError> {
        let category = categories
            .iter()
            .find(|category| category.id == self.category_id)
            .ok_or(CatalogError::UnknownCategory {
                product_id: self.id,
                category_id: self.category_id,
            })?;
        Ok(self.with_category(&category.name))
    }

    fn with_category(&self, category: &str) -> Self {
        Self {
            price: self.price * PRICE_MARKUP,
            category: Some(category.to_string()),
            search_key: vec![self.product_name.clone()],
            ..self.clone()
        }
    }
}

/// Join raw products with their category names.
///
/// Output order and length match `products`. When two categories share an id
/// the first one wins.
///
/// # Errors
///
/// Returns [`CatalogError::UnknownCategory`] for the first product whose
/// category is missing. The whole pass fails; no product is dropped silently.
pub fn enrich_products(
    products: &[Product],
    categories: &[Category],
) -> Result<Vec<Product>, CatalogError> {
    products
        .iter()
        .map(|product| product.enrich(categories))
        .collect()
}

/// A product category. Read-only reference data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category identifier
    pub id: CategoryId,
    /// Display name
    pub name: String,
}

impl Category {
    /// Create a category.
    #[must_use]
    pub fn new(id: CategoryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A supplier record, fetched one at a time from `GET /suppliers/{id}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    /// Supplier identifier
    pub id: SupplierId,
    /// Display name
    pub name: String,
    /// Unit cost charged by this supplier
    #[serde(default)]
    pub cost: f64,
    /// Minimum order quantity
    #[serde(default)]
    pub min_quantity: u32,
}
