//! View models over [`ProductService`](crate::ProductService).
//!
//! View models turn the service's `Result` streams into plain value streams
//! ready for rendering. A failure is caught at this boundary: its message is
//! recorded in an [`ErrorMessage`] slot and only the affected stream ends.

mod detail;
mod list;
mod picker;

pub use detail::{ProductDetailView, ProductDetailViewModel};
pub use list::ProductListViewModel;
pub use picker::ProductPickerViewModel;

use async_stream::stream;
use catalog_core::{CatalogError, CatalogStream};
use catalog_runtime::Subject;
use futures::StreamExt;
use futures::stream::BoxStream;

/// Observable slot holding the most recent error message.
///
/// Cloning yields another handle to the same slot. Subscribers receive the
/// current message (if any) and every later one.
#[derive(Debug, Clone)]
pub struct ErrorMessage {
    label: &'static str,
    messages: Subject<String>,
}

impl ErrorMessage {
    /// Create an empty slot; `label` tags its log lines.
    #[must_use]
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            messages: Subject::replay_latest(),
        }
    }

    /// Record `error`'s display text.
    pub fn record(&self, error: &CatalogError) {
        tracing::warn!(slot = self.label, %error, "Recording error message");
        self.messages.next(error.to_string());
    }

    /// The last recorded message.
    #[must_use]
    pub fn current(&self) -> Option<String> {
        self.messages.latest()
    }

    /// Stream of recorded messages, starting with the current one.
    #[must_use]
    pub fn subscribe(&self) -> BoxStream<'static, String> {
        self.messages.subscribe()
    }
}

/// Unwrap a catalog stream, recording the first error in `slot`.
///
/// On failure, `fallback` (if any) is emitted once and the stream ends.
pub(crate) fn catch_error<T>(
    mut source: CatalogStream<T>,
    slot: ErrorMessage,
    mut fallback: Option<T>,
) -> BoxStream<'static, T>
where
    T: Send + 'static,
{
    Box::pin(stream! {
        while let Some(item) = source.next().await {
            match item {
                Ok(value) => yield value,
                Err(error) => {
                    slot.record(&error);
                    if let Some(fallback) = fallback.take() {
                        yield fallback;
                    }
                    break;
                },
            }
        }
    })
}
