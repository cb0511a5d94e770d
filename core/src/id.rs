//! Identifier newtypes for catalog records.
//!
//! Every record is keyed by a small unsigned integer. The value `0` is reserved
//! as a sentinel: for products it means "no selection", for categories it means
//! "all categories". The newtypes keep the three id spaces from being mixed up
//! in signatures such as `select_product(ProductId)` and
//! `select_category(CategoryId)`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for identifier parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid identifier: {0}")]
pub struct ParseIdError(String);

macro_rules! catalog_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Create an identifier from its raw value.
            #[must_use]
            pub const fn new(value: u32) -> Self {
                Self(value)
            }

            /// Get the raw value.
            #[must_use]
            pub const fn value(self) -> u32 {
                self.0
            }

            /// Check whether this is the reserved zero sentinel.
            #[must_use]
            pub const fn is_sentinel(self) -> bool {
                self.0 == 0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                Self(value)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<u32>()
                    .map(Self)
                    .map_err(|e| ParseIdError(format!("{s:?}: {e}")))
            }
        }
    };
}

catalog_id! {
    /// Product identifier. [`ProductId::NONE`] means no product is selected.
    ProductId
}

catalog_id! {
    /// Category identifier. [`CategoryId::ALL`] disables category filtering.
    CategoryId
}

catalog_id! {
    /// Supplier identifier.
    SupplierId
}

impl ProductId {
    /// No product selected.
    pub const NONE: Self = Self(0);
}

impl CategoryId {
    /// Every category.
    pub const ALL: Self = Self(0);
}
