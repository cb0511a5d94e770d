//! Error type carried by every catalog stream.

use crate::id::{CategoryId, ProductId};
use thiserror::Error;

/// Errors that can occur while fetching or aggregating catalog data.
///
/// The `Display` text is the human-readable message view models record for
/// rendering, so each variant reads as a complete sentence fragment.
///
/// `CatalogError` is `Clone` because failures travel through replaying
/// streams: a late subscriber to a failed shared stream receives the same
/// error value the first subscriber saw.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// A client-side or network failure (connection refused, timeout, ...).
    #[error("An error occurred: {0}")]
    Network(String),

    /// The backend answered with an unsuccessful status code.
    #[error("Backend returned code {status}: {message}")]
    Backend {
        /// HTTP status code
        status: u16,
        /// Error text from the response body
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("Response parsing failed: {0}")]
    Decode(String),

    /// A product references a category that is not in the category collection.
    #[error("Product {product_id} references unknown category {category_id}")]
    UnknownCategory {
        /// The product whose lookup failed
        product_id: ProductId,
        /// The category id that has no match
        category_id: CategoryId,
    },

    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl CatalogError {
    /// Check whether the failure came from the transport rather than the data.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Backend { .. })
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_message() {
        let err = CatalogError::Network("connection refused".to_string());
        assert_eq!(err.to_string(), "An error occurred: connection refused");
        assert!(err.is_transport());
    }

    #[test]
    fn backend_message() {
        let err = CatalogError::Backend {
            status: 404,
            message: "Collection 'products' not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Backend returned code 404: Collection 'products' not found"
        );
    }

    #[test]
    fn unknown_category_message() {
        let err = CatalogError::UnknownCategory {
            product_id: ProductId::new(5),
            category_id: CategoryId::new(9),
        };
        assert_eq!(err.to_string(), "Product 5 references unknown category 9");
        assert!(!err.is_transport());
    }
}
