//! Stream combinators with reactive-extension semantics.
//!
//! These operate on streams of `Result<_, E>` where the first `Err` is
//! terminal: it is forwarded once and the output stream ends. That mirrors how
//! a failed upstream completes an observable with an error.
//!
//! - [`combine_latest`]: emit the latest pair whenever either side emits
//! - [`switch_map`]: map each value to an inner stream, dropping the previous one
//! - [`accumulate`]: grow a collection from a base batch plus insertions
//! - [`end_on_error`]: cut a stream right after its first `Err`
//! - [`defer`]: build the source stream only when first polled

use async_stream::stream;
use futures::stream::{self, BoxStream};
use futures::{Stream, StreamExt};

enum Latest<A, B, E> {
    Left(A),
    Right(B),
    Failed(E),
    LeftDone,
    RightDone,
}

/// Combine two result streams, emitting the latest pair on every emission.
///
/// Nothing is emitted until both sides have produced a value. After that each
/// new value from either side yields `(latest_a, latest_b)`. The output ends
/// when both inputs end, when one input ends without ever emitting, or right
/// after the first `Err` from either side.
///
/// # Example
///
/// ```
/// use catalog_runtime::combine_latest;
/// use futures::{stream, StreamExt};
///
/// # futures::executor::block_on(async {
/// let products = stream::iter(vec![Ok::<_, String>(vec![1, 2, 3])]);
/// let filter = stream::iter(vec![Ok::<_, String>(2)]);
///
/// let pairs: Vec<_> = combine_latest(products, filter).collect().await;
/// assert_eq!(pairs, vec![Ok((vec![1, 2, 3], 2))]);
/// # });
/// ```
pub fn combine_latest<A, B, E, SA, SB>(a: SA, b: SB) -> BoxStream<'static, Result<(A, B), E>>
where
    A: Clone + Send + 'static,
    B: Clone + Send + 'static,
    E: Send + 'static,
    SA: Stream<Item = Result<A, E>> + Send + 'static,
    SB: Stream<Item = Result<B, E>> + Send + 'static,
{
    let left = a
        .map(|item| match item {
            Ok(value) => Latest::Left(value),
            Err(error) => Latest::Failed(error),
        })
        .chain(stream::once(async { Latest::LeftDone }));
    let right = b
        .map(|item| match item {
            Ok(value) => Latest::Right(value),
            Err(error) => Latest::Failed(error),
        })
        .chain(stream::once(async { Latest::RightDone }));
    let mut merged = stream::select(left.boxed(), right.boxed());

    Box::pin(stream! {
        let mut latest_a: Option<A> = None;
        let mut latest_b: Option<B> = None;
        let mut done = (false, false);

        while let Some(event) = merged.next().await {
            match event {
                Latest::Left(value) => latest_a = Some(value),
                Latest::Right(value) => latest_b = Some(value),
                Latest::Failed(error) => {
                    yield Err(error);
                    break;
                },
                Latest::LeftDone => {
                    done.0 = true;
                    if latest_a.is_none() || done.1 {
                        break;
                    }
                    continue;
                },
                Latest::RightDone => {
                    done.1 = true;
                    if latest_b.is_none() || done.0 {
                        break;
                    }
                    continue;
                },
            }

            if let (Some(a), Some(b)) = (&latest_a, &latest_b) {
                yield Ok((a.clone(), b.clone()));
            }
        }
    })
}

enum Switch<T, U> {
    Outer(Option<T>),
    Inner(Option<U>),
}

async fn next_inner<U>(inner: &mut Option<BoxStream<'static, U>>) -> Option<U> {
    match inner {
        Some(stream) => stream.next().await,
        None => std::future::pending().await,
    }
}

/// Map each source value to an inner stream and flatten, switching on every
/// new source value.
///
/// When the source emits, the current inner stream (if any) is dropped before
/// the new one starts, which cancels whatever work it still had in flight.
/// Only the inner stream for the most recent source value can emit. The
/// output ends once the source has ended and the last inner stream is drained.
pub fn switch_map<T, U, S, F>(source: S, mut f: F) -> BoxStream<'static, U>
where
    T: Send + 'static,
    U: Send + 'static,
    S: Stream<Item = T> + Send + 'static,
    F: FnMut(T) -> BoxStream<'static, U> + Send + 'static,
{
    let mut source = source.boxed();

    Box::pin(stream! {
        let mut inner: Option<BoxStream<'static, U>> = None;
        let mut source_done = false;
        let mut generation = 0_u64;

        loop {
            let step = tokio::select! {
                biased;
                value = source.next(), if !source_done => Switch::Outer(value),
                item = next_inner(&mut inner), if inner.is_some() => Switch::Inner(item),
                else => break,
            };

            match step {
                Switch::Outer(Some(value)) => {
                    generation += 1;
                    if inner.is_some() {
                        tracing::trace!(generation, "Switching inner stream, dropping previous");
                    }
                    inner = Some(f(value));
                },
                Switch::Outer(None) => source_done = true,
                Switch::Inner(Some(item)) => yield item,
                Switch::Inner(None) => inner = None,
            }
        }
    })
}

enum Accumulate<T, E> {
    Batch(Vec<T>),
    Inserted(T),
    Failed(E),
}

/// Grow a collection from a base batch stream and a stream of insertions.
///
/// Every insertion appends to the list built from the prior emissions, and
/// each change emits the whole list. Insertions that arrive before the first
/// batch are held and emitted together with it. A later batch replaces the
/// base part of the list and keeps the inserted records after it.
///
/// # Example
///
/// ```
/// use catalog_runtime::accumulate;
/// use futures::{stream, StreamExt};
///
/// # futures::executor::block_on(async {
/// let batch = stream::iter(vec![Ok::<_, String>(vec!["x"])]);
/// let inserted = stream::iter(vec!["a", "b"]);
///
/// let states: Vec<_> = accumulate(batch, inserted).collect().await;
/// assert_eq!(states.last(), Some(&Ok(vec!["x", "a", "b"])));
/// # });
/// ```
pub fn accumulate<T, E, SB, SI>(batches: SB, inserted: SI) -> BoxStream<'static, Result<Vec<T>, E>>
where
    T: Clone + Send + 'static,
    E: Send + 'static,
    SB: Stream<Item = Result<Vec<T>, E>> + Send + 'static,
    SI: Stream<Item = T> + Send + 'static,
{
    let batches = batches.map(|item| match item {
        Ok(batch) => Accumulate::Batch(batch),
        Err(error) => Accumulate::Failed(error),
    });
    let inserted = inserted.map(Accumulate::Inserted);
    let mut merged = stream::select(batches.boxed(), inserted.boxed());

    Box::pin(stream! {
        let mut base: Option<Vec<T>> = None;
        let mut additions: Vec<T> = Vec::new();

        while let Some(event) = merged.next().await {
            match event {
                Accumulate::Batch(batch) => base = Some(batch),
                Accumulate::Inserted(value) => additions.push(value),
                Accumulate::Failed(error) => {
                    yield Err(error);
                    break;
                },
            }

            if let Some(base) = &base {
                let mut list = Vec::with_capacity(base.len() + additions.len());
                list.extend(base.iter().cloned());
                list.extend(additions.iter().cloned());
                yield Ok(list);
            }
        }
    })
}

/// Forward items up to and including the first `Err`, then end.
pub fn end_on_error<T, E, S>(source: S) -> BoxStream<'static, Result<T, E>>
where
    T: Send + 'static,
    E: Send + 'static,
    S: Stream<Item = Result<T, E>> + Send + 'static,
{
    let mut source = source.boxed();
    Box::pin(stream! {
        while let Some(item) = source.next().await {
            let failed = item.is_err();
            yield item;
            if failed {
                break;
            }
        }
    })
}

/// Build the source stream when the output is first polled.
///
/// Subscribing to a [`SharedReplay`](crate::SharedReplay) connects its
/// upstream, which needs a Tokio runtime. Wrapping the subscription in
/// `defer` lets callers create stream pipelines eagerly and connect them later.
pub fn defer<S, F>(factory: F) -> BoxStream<'static, S::Item>
where
    F: FnOnce() -> S + Send + 'static,
    S: Stream + Send + 'static,
{
    Box::pin(stream::once(async move { factory() }).flatten())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::subject::Subject;
    use std::time::Duration;

    #[tokio::test]
    async fn combine_latest_waits_for_both_sides() {
        let a = Subject::<Result<u32, String>>::new();
        let b = Subject::<Result<char, String>>::new();
        let mut combined = combine_latest(a.subscribe(), b.subscribe());

        a.next(Ok(1));
        assert!(futures::poll!(combined.next()).is_pending());

        b.next(Ok('x'));
        assert_eq!(combined.next().await, Some(Ok((1, 'x'))));

        a.next(Ok(2));
        assert_eq!(combined.next().await, Some(Ok((2, 'x'))));

        b.next(Ok('y'));
        assert_eq!(combined.next().await, Some(Ok((2, 'y'))));
    }

    #[tokio::test]
    async fn combine_latest_ends_after_error() {
        let a = stream::iter(vec![Ok(1), Err("boom".to_string()), Ok(2)]);
        let b = stream::iter(vec![Ok::<_, String>(10)]);

        let items: Vec<_> = combine_latest(a, b).collect().await;
        assert_eq!(items.last(), Some(&Err("boom".to_string())));
        assert!(!items.contains(&Ok((2, 10))));
    }

    #[tokio::test]
    async fn combine_latest_ends_when_a_side_never_emits() {
        let a = stream::empty::<Result<u32, String>>();
        let b = Subject::<Result<u32, String>>::behavior(Ok(1));

        let items: Vec<_> = combine_latest(a, b.subscribe()).collect().await;
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn switch_map_drops_stale_inner_stream() {
        let source = Subject::<u64>::new();
        let mut switched = switch_map(source.subscribe(), |delay_ms| {
            stream::once(async move {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                delay_ms
            })
            .boxed()
        });

        source.next(200);
        source.next(10);
        source.complete();

        let items: Vec<u64> = switched.by_ref().collect().await;
        assert_eq!(items, vec![10]);
    }

    #[tokio::test]
    async fn switch_map_flattens_inner_items() {
        let source = stream::iter(vec![vec![1, 2, 3]]);
        let items: Vec<i32> = switch_map(source, |values| stream::iter(values).boxed())
            .collect()
            .await;
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn accumulate_appends_each_insertion() {
        let batches = Subject::<Result<Vec<char>, String>>::replay_latest();
        let inserted = Subject::<char>::new();
        let mut states = accumulate(batches.subscribe(), inserted.subscribe());

        batches.next(Ok(vec!['x']));
        assert_eq!(states.next().await, Some(Ok(vec!['x'])));

        inserted.next('a');
        assert_eq!(states.next().await, Some(Ok(vec!['x', 'a'])));

        inserted.next('b');
        assert_eq!(states.next().await, Some(Ok(vec!['x', 'a', 'b'])));
    }

    #[tokio::test]
    async fn accumulate_holds_early_insertions() {
        let batches = stream::once(async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok::<_, String>(vec!['x', 'y'])
        });
        let inserted = stream::iter(vec!['a']).chain(stream::pending());
        let mut states = accumulate(batches, inserted);

        assert_eq!(states.next().await, Some(Ok(vec!['x', 'y', 'a'])));
    }

    #[tokio::test]
    async fn accumulate_forwards_failure_and_ends() {
        let batches = stream::iter(vec![Err::<Vec<u8>, _>("offline".to_string())]);
        let inserted = stream::pending::<u8>();

        let states: Vec<_> = accumulate(batches, inserted).collect().await;
        assert_eq!(states, vec![Err("offline".to_string())]);
    }

    #[tokio::test]
    async fn defer_builds_source_lazily() {
        let built = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
        let flag = std::sync::Arc::clone(&built);
        let deferred = defer(move || {
            flag.store(true, std::sync::atomic::Ordering::SeqCst);
            stream::iter(vec![1, 2])
        });
        assert!(!built.load(std::sync::atomic::Ordering::SeqCst));

        let items: Vec<i32> = deferred.collect().await;
        assert_eq!(items, vec![1, 2]);
        assert!(built.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[tokio::test]
    async fn end_on_error_cuts_after_first_error() {
        let source = stream::iter(vec![Ok(1), Err("bad"), Ok(2)]);
        let items: Vec<Result<i32, &str>> = end_on_error(source).collect().await;
        assert_eq!(items, vec![Ok(1), Err("bad")]);
    }
}
