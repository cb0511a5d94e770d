//! A small sample catalog.
//!
//! Three categories, five products spread over them, and the ten suppliers the
//! products reference. Paths in [`catalog_client`] are relative to the API base,
//! the way the catalog service requests them.

use crate::mocks::MockHttpClient;
use catalog_core::{Category, CategoryId, Product, ProductId, Supplier, SupplierId};
use serde_json::json;

/// Garden, Toolbox, Gaming.
#[must_use]
pub fn categories() -> Vec<Category> {
    vec![
        Category::new(CategoryId::new(1), "Garden"),
        Category::new(CategoryId::new(3), "Toolbox"),
        Category::new(CategoryId::new(5), "Gaming"),
    ]
}

fn product(
    id: u32,
    name: &str,
    code: &str,
    price: f64,
    category: u32,
    suppliers: [u32; 2],
) -> Product {
    Product {
        id: ProductId::new(id),
        product_name: name.to_string(),
        product_code: code.to_string(),
        description: format!("{name} from the sample catalog"),
        price,
        category_id: CategoryId::new(category),
        quantity_in_stock: 10,
        supplier_ids: suppliers.into_iter().map(SupplierId::new).collect(),
        category: None,
        search_key: Vec::new(),
    }
}

/// Raw products, as the backend returns them.
#[must_use]
pub fn products() -> Vec<Product> {
    vec![
        product(1, "Leaf Rake", "GDN-0011", 19.95, 1, [1, 2]),
        product(2, "Garden Cart", "GDN-0023", 32.99, 1, [3, 4]),
        product(5, "Hammer", "TBX-0048", 8.9, 3, [5, 6]),
        product(8, "Saw", "TBX-0022", 11.55, 3, [7, 8]),
        product(10, "Video Game Controller", "GMG-0042", 35.95, 5, [9, 10]),
    ]
}

/// Suppliers 1 through 10.
#[must_use]
pub fn suppliers() -> Vec<Supplier> {
    (1..=10)
        .map(|id| Supplier {
            id: SupplierId::new(id),
            name: format!("Supplier {id}"),
            cost: f64::from(id) * 2.5,
            min_quantity: 12,
        })
        .collect()
}

/// Path of a supplier resource.
#[must_use]
pub fn supplier_path(id: SupplierId) -> String {
    format!("suppliers/{id}")
}

/// A mock client serving `products/`, `productCategories/` and every
/// `suppliers/{id}` from the sample catalog.
#[must_use]
pub fn catalog_client() -> MockHttpClient {
    let client = MockHttpClient::new()
        .with_json("products/", json!(products()))
        .with_json("productCategories/", json!(categories()));

    suppliers().into_iter().fold(client, |client, supplier| {
        client.with_json(&supplier_path(supplier.id), json!(supplier))
    })
}
