//! Lazily connected, replay-latest sharing of a cold stream.
//!
//! [`SharedReplay`] turns a cold upstream (one that does work per
//! subscription, like an HTTP fetch) into a hot one that runs the upstream at
//! most once. The first [`SharedReplay::subscribe`] spawns a driver task that
//! pumps the upstream into a replay-latest [`Subject`]; every subscriber,
//! including ones that arrive after the upstream finished, gets the most
//! recent value first.
//!
//! ```text
//!  upstream ──(driver task, spawned on first subscribe)──► Subject(Latest)
//!                                                         │      │      │
//!                                                        sub1   sub2   sub3
//! ```

use crate::subject::Subject;
use futures::stream::BoxStream;
use futures::{Stream, StreamExt};
use std::sync::{Mutex, PoisonError};
use tokio::task::JoinHandle;

enum Connection<T> {
    Idle(BoxStream<'static, T>),
    Running(JoinHandle<()>),
    Closed,
}

/// Replay-latest share of an upstream stream.
///
/// Dropping the `SharedReplay` aborts the driver task and completes the
/// subject, so outstanding subscriber streams end.
pub struct SharedReplay<T> {
    name: &'static str,
    subject: Subject<T>,
    connection: Mutex<Connection<T>>,
}

impl<T> std::fmt::Debug for SharedReplay<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedReplay")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<T> SharedReplay<T>
where
    T: Clone + Send + 'static,
{
    /// Wrap `upstream`. Nothing runs until the first subscription.
    ///
    /// `name` labels the driver's log lines.
    #[must_use]
    pub fn new<S>(name: &'static str, upstream: S) -> Self
    where
        S: Stream<Item = T> + Send + 'static,
    {
        Self {
            name,
            subject: Subject::replay_latest(),
            connection: Mutex::new(Connection::Idle(upstream.boxed())),
        }
    }

    /// Subscribe, connecting the upstream on first use.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime while the upstream has not
    /// been connected yet (the driver is started with `tokio::spawn`).
    #[must_use]
    pub fn subscribe(&self) -> BoxStream<'static, T> {
        // Register first so the driver cannot emit before this subscriber exists.
        let stream = self.subject.subscribe();
        self.connect();
        stream
    }

    /// Whether the upstream has been started.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        !matches!(
            *self.connection.lock().unwrap_or_else(PoisonError::into_inner),
            Connection::Idle(_)
        )
    }

    /// The most recent upstream value, if any has arrived.
    #[must_use]
    pub fn latest(&self) -> Option<T> {
        self.subject.latest()
    }

    fn connect(&self) {
        let mut connection = self
            .connection
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut upstream = match std::mem::replace(&mut *connection, Connection::Closed) {
            Connection::Idle(upstream) => upstream,
            other => {
                *connection = other;
                return;
            },
        };

        let name = self.name;
        let subject = self.subject.clone();
        tracing::debug!(stream = name, "Connecting shared stream");

        let handle = tokio::spawn(async move {
            let mut emitted = 0_usize;
            while let Some(value) = upstream.next().await {
                emitted += 1;
                subject.next(value);
            }
            tracing::debug!(stream = name, emitted, "Shared stream upstream completed");
            subject.complete();
        });

        *connection = Connection::Running(handle);
    }
}

impl<T> Drop for SharedReplay<T> {
    fn drop(&mut self) {
        let connection = self
            .connection
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Connection::Running(handle) = std::mem::replace(connection, Connection::Closed) {
            handle.abort();
        }
        self.subject.close();
    }
}
