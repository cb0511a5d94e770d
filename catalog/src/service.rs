//! Product aggregation service.
//!
//! [`ProductService`] owns the stream graph every view model reads from:
//!
//! ```text
//!  GET products/ ──┐
//!                  ├─ combine_latest ─ enrich ─► products_with_categories (shared)
//!  categories ─────┘                                  │            │
//!                                                     │            ├─ accumulate ◄─ add_product
//!  select_product ─────────── combine_latest ◄────────┘            ▼
//!        │                          │                       products_with_new
//!        ▼                          ▼
//!  selected id              selected_product (shared)
//!                                   │
//!                                   └─ switch_map ─ GET suppliers/{id} ─► selected_product_suppliers
//! ```
//!
//! The shared streams (categories, enriched products, selected product)
//! connect on first poll and fetch at most once per service; later
//! subscribers receive the latest value. Every public stream
//! yields `Result` items and ends after its first `Err`.

use crate::config::ApiConfig;
use catalog_core::{
    CatalogError, CatalogStream, Category, CategorySource, HttpClient, Product, ProductId,
    Supplier, enrich_products, get_json,
};
use catalog_runtime::{SharedReplay, Subject, accumulate, combine_latest, defer, end_on_error, switch_map};
use futures::{StreamExt, stream};
use std::sync::Arc;

type Shared<T> = Arc<SharedReplay<Result<T, CatalogError>>>;

/// Fetches collections through the injected [`HttpClient`].
#[derive(Clone)]
struct Fetcher {
    http: Arc<dyn HttpClient>,
    api: Arc<ApiConfig>,
}

impl Fetcher {
    fn products(&self) -> CatalogStream<Vec<Product>> {
        let fetcher = self.clone();
        stream::once(async move {
            let path = &fetcher.api.products_path;
            let result = get_json::<Vec<Product>>(fetcher.http.as_ref(), path).await;
            match &result {
                Ok(products) => tracing::debug!(
                    count = products.len(),
                    payload = ?products,
                    "Fetched products"
                ),
                Err(error) => tracing::warn!(%error, "Product fetch failed"),
            }
            result
        })
        .boxed()
    }

    fn suppliers_for(&self, product: &Product) -> CatalogStream<Supplier> {
        let fetcher = self.clone();
        let product_id = product.id;
        let lookups = stream::iter(product.supplier_ids.clone())
            .map(move |id| {
                let fetcher = fetcher.clone();
                async move {
                    let path = fetcher.api.supplier_path(id);
                    let result = get_json::<Supplier>(fetcher.http.as_ref(), &path).await;
                    if let Err(error) = &result {
                        tracing::warn!(%product_id, supplier_id = %id, %error, "Supplier lookup failed");
                    }
                    result
                }
            })
            .buffer_unordered(self.api.supplier_concurrency);
        end_on_error(lookups)
    }
}

impl std::fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetcher").field("api", &self.api).finish_non_exhaustive()
    }
}

/// Reactive aggregation of products, categories, selection and suppliers.
///
/// Create one per session and share it (`Arc<ProductService>`) between view
/// models. Construction is cheap and does no I/O; the backend is contacted
/// when a stream that needs it is first polled, which must happen inside a
/// Tokio runtime.
///
/// # Example
///
/// ```rust,ignore
/// let http = Arc::new(ReqwestClient::new(&config.api)?);
/// let categories = Arc::new(HttpCategorySource::new(http.clone(), &config.api));
/// let service = ProductService::new(http, categories, config.api.clone());
///
/// let mut products = service.products_with_categories();
/// while let Some(batch) = products.next().await {
///     println!("{} products", batch?.len());
/// }
/// ```
pub struct ProductService {
    fetcher: Fetcher,
    categories: Shared<Vec<Category>>,
    selected_product_id: Subject<ProductId>,
    inserted: Subject<Product>,
    products_with_categories: Shared<Vec<Product>>,
    selected_product: Shared<Option<Product>>,
}

impl std::fmt::Debug for ProductService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductService")
            .field("api", &self.fetcher.api)
            .field("selected_product_id", &self.selected_product_id.latest())
            .finish_non_exhaustive()
    }
}

impl ProductService {
    /// Build the stream graph over the given collaborators.
    #[must_use]
    pub fn new(
        http: Arc<dyn HttpClient>,
        categories: Arc<dyn CategorySource>,
        api: ApiConfig,
    ) -> Self {
        let fetcher = Fetcher {
            http,
            api: Arc::new(api),
        };

        let categories: Shared<Vec<Category>> =
            Arc::new(SharedReplay::new("categories", end_on_error(categories.categories())));
        let category_source = Arc::clone(&categories);
        let enriched = combine_latest(fetcher.products(), defer(move || category_source.subscribe()))
            .map(|pair| pair.and_then(|(products, categories)| enrich(&products, &categories)));
        let products_with_categories: Shared<Vec<Product>> = Arc::new(SharedReplay::new(
            "products_with_categories",
            end_on_error(enriched),
        ));

        let selected_product_id = Subject::behavior(ProductId::NONE);
        let source = Arc::clone(&products_with_categories);
        let selection = selected_product_id.subscribe().map(Ok::<_, CatalogError>);
        let selected = combine_latest(defer(move || source.subscribe()), selection)
            .map(|pair| pair.map(|(products, id)| find_product(&products, id)));
        let selected_product: Shared<Option<Product>> = Arc::new(SharedReplay::new(
            "selected_product",
            end_on_error(selected),
        ));

        Self {
            fetcher,
            categories,
            selected_product_id,
            inserted: Subject::replay_all(),
            products_with_categories,
            selected_product,
        }
    }

    /// API settings the service was built with.
    #[must_use]
    pub fn api(&self) -> &ApiConfig {
        &self.fetcher.api
    }

    /// Raw products from `GET {base}/products/`.
    ///
    /// Cold: every call issues its own request. Emits one collection or one
    /// error, then ends.
    #[must_use]
    pub fn products(&self) -> CatalogStream<Vec<Product>> {
        self.fetcher.products()
    }

    /// Category collections from the injected source.
    ///
    /// Shared with the category join: the source is subscribed once per
    /// service and late subscribers receive the latest collection.
    #[must_use]
    pub fn categories(&self) -> CatalogStream<Vec<Category>> {
        let shared = Arc::clone(&self.categories);
        defer(move || shared.subscribe())
    }

    /// Products joined with their category, with the price markup applied.
    ///
    /// Shared: the product fetch and the join run once for all subscribers.
    /// A product whose category is missing fails the pass with
    /// [`CatalogError::UnknownCategory`].
    #[must_use]
    pub fn products_with_categories(&self) -> CatalogStream<Vec<Product>> {
        let shared = Arc::clone(&self.products_with_categories);
        defer(move || shared.subscribe())
    }

    /// The product matching the selected id.
    ///
    /// `None` while nothing is selected or when the id is not in the enriched
    /// collection. Emits again on every selection, including a repeat of the
    /// current id.
    #[must_use]
    pub fn selected_product(&self) -> CatalogStream<Option<Product>> {
        let shared = Arc::clone(&self.selected_product);
        defer(move || shared.subscribe())
    }

    /// Suppliers of the selected product, one item per lookup as it completes.
    ///
    /// Nothing is emitted while no product is selected. A new selection drops
    /// the lookups still in flight for the previous one.
    #[must_use]
    pub fn selected_product_suppliers(&self) -> CatalogStream<Supplier> {
        let fetcher = self.fetcher.clone();
        let suppliers = switch_map(self.selected_product(), move |selected| match selected {
            Ok(Some(product)) => {
                tracing::debug!(product_id = %product.id, count = product.supplier_ids.len(), "Looking up suppliers");
                fetcher.suppliers_for(&product)
            },
            Ok(None) => stream::empty().boxed(),
            Err(error) => stream::once(async move { Err(error) }).boxed(),
        });
        end_on_error(suppliers)
    }

    /// Suppliers of `product`, fetched concurrently and emitted unordered.
    #[must_use]
    pub fn suppliers_for(&self, product: &Product) -> CatalogStream<Supplier> {
        self.fetcher.suppliers_for(product)
    }

    /// Enriched products followed by every product added with [`ProductService::add_product`].
    ///
    /// Each subscription accumulates independently, starting from the
    /// insertions made so far.
    #[must_use]
    pub fn products_with_new(&self) -> CatalogStream<Vec<Product>> {
        let shared = Arc::clone(&self.products_with_categories);
        let inserted = self.inserted.clone();
        defer(move || accumulate(shared.subscribe(), inserted.subscribe()))
    }

    /// Select a product by id; [`ProductId::NONE`] clears the selection.
    pub fn select_product(&self, id: ProductId) {
        tracing::debug!(%id, "Product selected");
        self.selected_product_id.next(id);
    }

    /// Currently selected id.
    #[must_use]
    pub fn selected_product_id(&self) -> ProductId {
        self.selected_product_id.latest().unwrap_or(ProductId::NONE)
    }

    /// Add a product to the session, or [`Product::placeholder`] when `None`.
    pub fn add_product(&self, product: Option<Product>) {
        let product = product.unwrap_or_else(Product::placeholder);
        tracing::debug!(id = %product.id, name = %product.product_name, "Product added");
        self.inserted.next(product);
    }
}

fn enrich(products: &[Product], categories: &[Category]) -> Result<Vec<Product>, CatalogError> {
    let enriched = enrich_products(products, categories);
    if let Err(error) = &enriched {
        tracing::warn!(%error, "Category join failed");
    }
    enriched
}

fn find_product(products: &[Product], id: ProductId) -> Option<Product> {
    if id.is_sentinel() {
        return None;
    }
    products.iter().find(|product| product.id == id).cloned()
}
