//! # Catalog Runtime
//!
//! Reactive stream primitives for the product catalog.
//!
//! The catalog service is a graph of push-based streams: fetched collections,
//! user selections and insertions flow in, derived view state flows out. This
//! crate supplies the pieces that graph is built from:
//!
//! - [`Subject`]: hot multicast source with a [`ReplayPolicy`]
//!   (selection state, insertions, recorded error messages)
//! - [`SharedReplay`]: runs a cold upstream once, replays the latest value to
//!   every subscriber (enriched products, selected product)
//! - [`combine_latest`], [`switch_map`], [`accumulate`], [`end_on_error`], [`defer`]:
//!   the operators that wire derived streams together
//!
//! ## Execution model
//!
//! Everything runs on the Tokio runtime. Transformations happen synchronously
//! as upstream values arrive; the only suspension points are the upstream
//! futures themselves (network fetches). [`SharedReplay`] spawns one driver
//! task per shared stream, started lazily on first subscription.
//!
//! ## Example
//!
//! ```
//! use catalog_runtime::{combine_latest, SharedReplay, Subject};
//! use futures::{stream, StreamExt};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let fetched = SharedReplay::new("numbers", stream::iter(vec![Ok::<_, String>(vec![1, 2, 3, 4])]));
//! let threshold = Subject::behavior(Ok::<_, String>(2));
//!
//! let mut above = combine_latest(fetched.subscribe(), threshold.subscribe())
//!     .map(|pair| pair.map(|(values, min)| values.into_iter().filter(|v| *v > min).collect::<Vec<_>>()));
//!
//! assert_eq!(above.next().await, Some(Ok(vec![3, 4])));
//! # }
//! ```

pub mod operators;
pub mod share;
pub mod subject;

pub use operators::{accumulate, combine_latest, defer, end_on_error, switch_map};
pub use share::SharedReplay;
pub use subject::{ReplayPolicy, Subject};
