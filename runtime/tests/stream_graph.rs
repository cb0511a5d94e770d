//! Integration tests for composing subjects, shared streams and operators
//!
//! Builds small stream graphs shaped like the catalog service (a fetched
//! collection shared between several derived streams, a selection subject, a
//! switching lookup) and checks the sharing and cancellation guarantees.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use catalog_runtime::{SharedReplay, Subject, combine_latest, end_on_error, switch_map};
use futures::{StreamExt, stream};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

// ============================================================================
// Test Fixtures
// ============================================================================

type Fetched = Result<Vec<u32>, String>;

/// A cold "fetch" that counts how many times it actually ran.
fn counted_fetch(calls: Arc<AtomicUsize>, values: Vec<u32>) -> impl futures::Stream<Item = Fetched> {
    stream::once(async move {
        calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(5)).await;
        Ok(values)
    })
}

// ============================================================================
// Tests
// ============================================================================

/// Two derived streams over one shared fetch run the fetch once.
#[tokio::test]
async fn test_diamond_runs_upstream_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let shared = SharedReplay::new("fetch", counted_fetch(Arc::clone(&calls), vec![1, 2, 3]));
    let selected = Subject::<Result<u32, String>>::behavior(Ok(2));

    let mut evens = shared
        .subscribe()
        .map(|r| r.map(|v| v.into_iter().filter(|n| n % 2 == 0).collect::<Vec<_>>()));
    let mut picked = combine_latest(shared.subscribe(), selected.subscribe())
        .map(|r| r.map(|(values, id)| values.into_iter().find(|v| *v == id)));

    assert_eq!(evens.next().await, Some(Ok(vec![2])));
    assert_eq!(picked.next().await, Some(Ok(Some(2))));

    selected.next(Ok(9));
    assert_eq!(picked.next().await, Some(Ok(None)));

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

/// A subscriber arriving after the fetch completed receives the cached value.
#[tokio::test]
async fn test_late_subscriber_receives_cached_value() {
    let calls = Arc::new(AtomicUsize::new(0));
    let shared = SharedReplay::new("fetch", counted_fetch(Arc::clone(&calls), vec![4]));

    let first: Vec<Fetched> = shared.subscribe().collect().await;
    tokio::time::sleep(Duration::from_millis(10)).await;
    let late: Vec<Fetched> = shared.subscribe().collect().await;

    assert_eq!(first, late);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

/// A shared failure is replayed to later subscribers and ends their streams.
#[tokio::test]
async fn test_shared_failure_is_replayed() {
    let shared = SharedReplay::new(
        "failing",
        end_on_error(stream::iter(vec![
            Err::<Vec<u32>, _>("offline".to_string()),
            Ok(vec![1]),
        ])),
    );

    let first: Vec<Fetched> = shared.subscribe().collect().await;
    let second: Vec<Fetched> = shared.subscribe().collect().await;

    assert_eq!(first, vec![Err("offline".to_string())]);
    assert_eq!(second, vec![Err("offline".to_string())]);
}

/// Switching to a new selection cancels in-flight lookups of the old one.
#[tokio::test]
async fn test_switch_cancels_superseded_lookups() {
    let completed = Arc::new(AtomicUsize::new(0));
    let selection = Subject::<u32>::new();

    let lookups_done = Arc::clone(&completed);
    let mut results = switch_map(selection.subscribe(), move |id| {
        let done = Arc::clone(&lookups_done);
        stream::iter(0..3)
            .map(move |n| {
                let done = Arc::clone(&done);
                async move {
                    let delay = if id == 1 { 100 } else { 5 };
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    done.fetch_add(1, Ordering::SeqCst);
                    (id, n)
                }
            })
            .buffer_unordered(3)
            .boxed()
    });

    selection.next(1);
    // Let the slow lookups for selection 1 start.
    assert!(futures::poll!(results.next()).is_pending());
    selection.next(2);
    selection.complete();

    let items: Vec<(u32, u32)> = results.collect().await;
    assert_eq!(items.len(), 3);
    assert!(items.iter().all(|(id, _)| *id == 2));

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(completed.load(Ordering::SeqCst), 3);
}
