use super::{ErrorMessage, catch_error};
use crate::service::ProductService;
use catalog_core::{CatalogError, CatalogStream, Category, CategoryId, Product};
use catalog_runtime::{Subject, combine_latest};
use futures::StreamExt;
use futures::stream::BoxStream;
use std::sync::Arc;

/// Filterable product list.
///
/// Shows every product (including ones added this session) in the selected
/// category. On failure the list becomes empty and the message is recorded.
#[derive(Debug)]
pub struct ProductListViewModel {
    service: Arc<ProductService>,
    category_filter: Subject<CategoryId>,
    error: ErrorMessage,
}

impl ProductListViewModel {
    /// Page title.
    pub const PAGE_TITLE: &'static str = "Product List";

    /// Create a view model showing all categories.
    #[must_use]
    pub fn new(service: Arc<ProductService>) -> Self {
        Self {
            service,
            category_filter: Subject::behavior(CategoryId::ALL),
            error: ErrorMessage::new("product_list"),
        }
    }

    /// Page title.
    #[must_use]
    pub const fn page_title(&self) -> &'static str {
        Self::PAGE_TITLE
    }

    /// Categories to offer as filters.
    #[must_use]
    pub fn categories(&self) -> CatalogStream<Vec<Category>> {
        self.service.categories()
    }

    /// Products in the selected category; [`CategoryId::ALL`] shows all of them.
    #[must_use]
    pub fn products(&self) -> BoxStream<'static, Vec<Product>> {
        let filter = self.category_filter.subscribe().map(Ok::<_, CatalogError>);
        let filtered = combine_latest(self.service.products_with_new(), filter)
            .map(|pair| pair.map(|(products, category)| in_category(products, category)))
            .boxed();
        catch_error(filtered, self.error.clone(), Some(Vec::new()))
    }

    /// Change the category filter.
    pub fn select_category(&self, id: CategoryId) {
        tracing::debug!(%id, "Category filter changed");
        self.category_filter.next(id);
    }

    /// Add the placeholder product.
    pub fn add_product(&self) {
        self.service.add_product(None);
    }

    /// Last recorded error message.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.error.current()
    }

    /// Recorded error messages.
    #[must_use]
    pub fn error_messages(&self) -> BoxStream<'static, String> {
        self.error.subscribe()
    }
}

fn in_category(products: Vec<Product>, category: CategoryId) -> Vec<Product> {
    if category == CategoryId::ALL {
        return products;
    }
    products
        .into_iter()
        .filter(|product| product.category_id == category)
        .collect()
}
