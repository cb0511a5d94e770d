use super::{ErrorMessage, catch_error};
use crate::service::ProductService;
use catalog_core::{CatalogStream, Product, ProductId};
use futures::stream::BoxStream;
use std::sync::Arc;

/// Product list that drives the selection.
#[derive(Debug)]
pub struct ProductPickerViewModel {
    service: Arc<ProductService>,
    error: ErrorMessage,
}

impl ProductPickerViewModel {
    /// Page title.
    pub const PAGE_TITLE: &'static str = "Products";

    /// Create a picker over `service`.
    #[must_use]
    pub fn new(service: Arc<ProductService>) -> Self {
        Self {
            service,
            error: ErrorMessage::new("product_picker"),
        }
    }

    /// Page title.
    #[must_use]
    pub const fn page_title(&self) -> &'static str {
        Self::PAGE_TITLE
    }

    /// Enriched products; ends without a fallback on failure.
    #[must_use]
    pub fn products(&self) -> BoxStream<'static, Vec<Product>> {
        catch_error(self.service.products_with_categories(), self.error.clone(), None)
    }

    /// The selected product, to highlight it in the list.
    #[must_use]
    pub fn selected_product(&self) -> CatalogStream<Option<Product>> {
        self.service.selected_product()
    }

    /// Select a product.
    pub fn select_product(&self, id: ProductId) {
        self.service.select_product(id);
    }

    /// Last recorded error message.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.error.current()
    }
}
