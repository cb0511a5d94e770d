use super::{ErrorMessage, catch_error};
use crate::service::ProductService;
use catalog_core::{Product, Supplier};
use catalog_runtime::switch_map;
use futures::stream::{self, BoxStream};
use futures::{StreamExt, future};
use std::sync::Arc;

/// Everything the detail page renders for one product.
#[derive(Clone, Debug, PartialEq)]
pub struct ProductDetailView {
    /// The selected product
    pub product: Product,
    /// Page title naming the product
    pub page_title: String,
    /// Suppliers received so far, in arrival order
    pub suppliers: Vec<Supplier>,
}

/// Detail page for the selected product.
///
/// Product and supplier failures are recorded in separate slots so a failed
/// supplier lookup does not hide the product.
#[derive(Debug)]
pub struct ProductDetailViewModel {
    service: Arc<ProductService>,
    error: ErrorMessage,
    supplier_error: ErrorMessage,
}

impl ProductDetailViewModel {
    /// Create a detail view model over `service`.
    #[must_use]
    pub fn new(service: Arc<ProductService>) -> Self {
        Self {
            service,
            error: ErrorMessage::new("product_detail"),
            supplier_error: ErrorMessage::new("product_suppliers"),
        }
    }

    /// Title for the given product.
    #[must_use]
    pub fn title_for(product: Option<&Product>) -> String {
        product.map_or_else(
            || "Product Detail".to_string(),
            |product| format!("Product Detail for: {}", product.product_name),
        )
    }

    /// The selected product.
    #[must_use]
    pub fn product(&self) -> BoxStream<'static, Option<Product>> {
        catch_error(self.service.selected_product(), self.error.clone(), None)
    }

    /// Title following the selection.
    #[must_use]
    pub fn page_title(&self) -> BoxStream<'static, String> {
        self.product()
            .map(|product| Self::title_for(product.as_ref()))
            .boxed()
    }

    /// Suppliers of the selected product as they arrive.
    #[must_use]
    pub fn product_suppliers(&self) -> BoxStream<'static, Supplier> {
        catch_error(
            self.service.selected_product_suppliers(),
            self.supplier_error.clone(),
            None,
        )
    }

    /// Combined view, emitted only while a product is selected.
    ///
    /// Each selection starts with no suppliers and grows as lookups complete;
    /// changing the selection starts over.
    #[must_use]
    pub fn view_model(&self) -> BoxStream<'static, ProductDetailView> {
        let service = Arc::clone(&self.service);
        let supplier_error = self.supplier_error.clone();

        switch_map(self.product(), move |selected| {
            let Some(product) = selected else {
                return stream::empty().boxed();
            };

            let initial = ProductDetailView {
                page_title: Self::title_for(Some(&product)),
                suppliers: Vec::new(),
                product,
            };
            let suppliers = catch_error(
                service.suppliers_for(&initial.product),
                supplier_error.clone(),
                None,
            );
            let updates = suppliers.scan(initial.clone(), |view, supplier| {
                view.suppliers.push(supplier);
                future::ready(Some(view.clone()))
            });

            stream::once(future::ready(initial)).chain(updates).boxed()
        })
    }

    /// Last product error message.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.error.current()
    }

    /// Last supplier error message.
    #[must_use]
    pub fn supplier_error_message(&self) -> Option<String> {
        self.supplier_error.current()
    }

    /// Recorded product error messages.
    #[must_use]
    pub fn error_messages(&self) -> BoxStream<'static, String> {
        self.error.subscribe()
    }

    /// Recorded supplier error messages.
    #[must_use]
    pub fn supplier_error_messages(&self) -> BoxStream<'static, String> {
        self.supplier_error.subscribe()
    }
}
