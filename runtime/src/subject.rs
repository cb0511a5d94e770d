//! Multicast subjects with configurable replay.
//!
//! A [`Subject`] is a hot, push-based source: values pushed with
//! [`Subject::next`] are delivered to every live subscriber in order. What a
//! *new* subscriber sees first depends on the [`ReplayPolicy`]:
//!
//! | Policy              | New subscriber receives               |
//! |---------------------|---------------------------------------|
//! | `ReplayPolicy::None`   | only values pushed after subscribing  |
//! | `ReplayPolicy::Latest` | the most recent value, then live ones |
//! | `ReplayPolicy::All`    | every value so far, then live ones    |
//!
//! Delivery uses one unbounded channel per subscriber, so a slow subscriber
//! never makes another one miss values. History replay and registration happen
//! under the same lock as `next`, which keeps replayed and live values in
//! order.

use futures::channel::mpsc;
use futures::stream::BoxStream;
use std::sync::{Arc, Mutex, PoisonError};

/// What a new subscriber receives before live values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayPolicy {
    /// Nothing; live values only
    None,
    /// The most recent value
    Latest,
    /// Every value pushed so far
    All,
}

#[derive(Debug)]
struct SubjectState<T> {
    policy: ReplayPolicy,
    history: Vec<T>,
    observers: Vec<mpsc::UnboundedSender<T>>,
    completed: bool,
}

/// Hot multicast source with a replay policy.
///
/// Cloning a `Subject` yields another handle to the same source.
///
/// # Example
///
/// ```
/// use catalog_runtime::Subject;
/// use futures::StreamExt;
///
/// # futures::executor::block_on(async {
/// let selected = Subject::behavior(0_u32);
/// let mut stream = selected.subscribe();
///
/// selected.next(7);
/// assert_eq!(stream.next().await, Some(0));
/// assert_eq!(stream.next().await, Some(7));
/// # });
/// ```
#[derive(Debug)]
pub struct Subject<T> {
    state: Arc<Mutex<SubjectState<T>>>,
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> Subject<T> {
    /// Mark completed and drop every observer sender.
    pub(crate) fn close(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.completed = true;
        state.observers.clear();
    }
}

impl<T> Default for Subject<T>
where
    T: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Subject<T>
where
    T: Clone + Send + 'static,
{
    /// Create a subject with the given replay policy and no history.
    #[must_use]
    pub fn with_policy(policy: ReplayPolicy) -> Self {
        Self {
            state: Arc::new(Mutex::new(SubjectState {
                policy,
                history: Vec::new(),
                observers: Vec::new(),
                completed: false,
            })),
        }
    }

    /// Create a subject that delivers live values only.
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(ReplayPolicy::None)
    }

    /// Create a subject that holds a current value, starting at `initial`.
    ///
    /// Every subscriber immediately receives the current value.
    #[must_use]
    pub fn behavior(initial: T) -> Self {
        let subject = Self::with_policy(ReplayPolicy::Latest);
        subject.next(initial);
        subject
    }

    /// Create a subject that replays its most recent value, if any.
    #[must_use]
    pub fn replay_latest() -> Self {
        Self::with_policy(ReplayPolicy::Latest)
    }

    /// Create a subject that replays its whole history.
    #[must_use]
    pub fn replay_all() -> Self {
        Self::with_policy(ReplayPolicy::All)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SubjectState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Push a value to every subscriber.
    ///
    /// Subscribers whose stream has been dropped are pruned. Values pushed
    /// after [`Subject::complete`] are ignored.
    pub fn next(&self, value: T) {
        let mut state = self.lock();
        if state.completed {
            tracing::trace!("Ignoring value pushed to completed subject");
            return;
        }

        match state.policy {
            ReplayPolicy::None => {},
            ReplayPolicy::Latest => {
                state.history.clear();
                state.history.push(value.clone());
            },
            ReplayPolicy::All => state.history.push(value.clone()),
        }

        state
            .observers
            .retain(|observer| observer.unbounded_send(value.clone()).is_ok());
    }

    /// Complete the subject.
    ///
    /// Live subscriber streams end after the values already delivered. Later
    /// subscribers still receive the replay history, then end.
    pub fn complete(&self) {
        self.close();
    }

    /// Subscribe to the subject.
    #[must_use]
    pub fn subscribe(&self) -> BoxStream<'static, T> {
        let (tx, rx) = mpsc::unbounded();
        let mut state = self.lock();

        for value in &state.history {
            // The receiver is held right here, so this cannot fail.
            let _ = tx.unbounded_send(value.clone());
        }

        if !state.completed {
            state.observers.push(tx);
        }

        Box::pin(rx)
    }

    /// The most recent value, if the policy retains one.
    #[must_use]
    pub fn latest(&self) -> Option<T> {
        self.lock().history.last().cloned()
    }

    /// Number of live subscribers (dropped ones are counted until the next push).
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.lock().observers.len()
    }

    /// Whether [`Subject::complete`] has been called.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.lock().completed
    }
}
