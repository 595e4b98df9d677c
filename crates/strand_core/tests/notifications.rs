//! Integration tests for change notifications.
//!
//! Run with: cargo test --package strand_core --test notifications

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use strand_core::{
    CollectionChangeAction, ConcurrentList, ListConfig, ListEvent, COUNT_PROPERTY,
};

/// Records every notification as a short tag, in delivery order.
fn record<T: Clone + Send + Sync + 'static>(list: &ConcurrentList<T>) -> Arc<Mutex<Vec<String>>> {
    let log = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&log);
    list.subscribe_property_changed(move |e| {
        sink.lock().push(format!("{}={}", e.property, e.count));
    });
    let sink = Arc::clone(&log);
    list.subscribe_collection_changed(move |e| {
        assert_eq!(e.action, CollectionChangeAction::Reset);
        sink.lock().push(format!("reset:{}", e.snapshot.len()));
    });

    log
}

#[test]
fn test_mutations_raise_count_then_reset() {
    let list = ConcurrentList::new();
    let log = record(&list);

    let a = list.push_back(1);
    list.insert_before(a, 0).unwrap();
    list.remove(a);

    assert_eq!(
        *log.lock(),
        vec!["Count=1", "reset:1", "Count=2", "reset:2", "Count=1", "reset:1"]
    );
}

#[test]
fn test_remove_of_removed_handle_is_silent() {
    let list = ConcurrentList::new();
    let h = list.push_back("x");
    list.push_back("y");
    assert!(list.remove(h));

    let log = record(&list);
    assert!(!list.remove(h));

    assert_eq!(list.len(), 1);
    assert!(log.lock().is_empty());
}

#[test]
fn test_clear_on_empty_list_still_notifies_once_each() {
    let list = ConcurrentList::<u8>::new();
    let log = record(&list);

    list.clear();

    assert_eq!(*log.lock(), vec!["Count=0", "reset:0"]);
}

#[test]
fn test_failed_insert_raises_nothing() {
    let other = ConcurrentList::new();
    let foreign = other.push_back(1);

    let list = ConcurrentList::new();
    let log = record(&list);
    assert!(list.insert_before(foreign, 2).is_err());

    assert!(log.lock().is_empty());
}

#[test]
fn test_snapshot_in_event_matches_committed_state() {
    let list = ConcurrentList::new();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&seen);
    list.subscribe_collection_changed(move |e| {
        sink.lock().push(e.snapshot.to_vec());
    });

    list.push_back('a');
    let b = list.push_back('b');
    list.insert_before(b, 'c').unwrap();

    assert_eq!(
        *seen.lock(),
        vec![vec!['a'], vec!['a', 'b'], vec!['a', 'c', 'b']]
    );
}

#[test]
fn test_observer_can_reenter_list_on_mutating_thread() {
    let list = Arc::new(ConcurrentList::new());
    let checks = Arc::new(AtomicUsize::new(0));

    let observed = Arc::clone(&list);
    let counter = Arc::clone(&checks);
    list.subscribe_property_changed(move |e| {
        assert_eq!(e.property, COUNT_PROPERTY);
        assert_eq!(observed.len(), e.count);
        assert_eq!(observed.to_vec().len(), e.count);
        counter.fetch_add(1, Ordering::SeqCst);
    });

    // A handler may also mutate: trim the list back to two elements.
    let trimmer = Arc::clone(&list);
    list.subscribe_collection_changed(move |e| {
        if e.snapshot.len() > 2 {
            if let Some(head) = trimmer.first() {
                trimmer.remove(head);
            }
        }
    });

    for i in 0..5 {
        list.push_back(i);
    }

    assert_eq!(list.to_vec(), vec![3, 4]);
    assert!(checks.load(Ordering::SeqCst) >= 5);
}

#[test]
fn test_unsubscribe_stops_delivery() {
    let list = ConcurrentList::new();
    let hits = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&hits);
    let id = list.subscribe_collection_changed(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    assert_eq!(list.observer_count(), 1);

    list.push_back(1);
    assert!(list.unsubscribe_collection_changed(id));
    assert!(!list.unsubscribe_collection_changed(id));
    assert!(!list.unsubscribe_property_changed(id));
    list.push_back(2);

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(list.observer_count(), 0);
}

#[test]
fn test_channel_receives_both_streams_per_mutation() {
    let list = ConcurrentList::new();
    let rx = list.subscribe_channel();

    list.push_back(5);
    list.clear();

    let events: Vec<ListEvent<i32>> = rx.try_iter().collect();
    assert_eq!(events.len(), 4);
    assert!(events.iter().all(|e| e.list() == list.id()));
    match (&events[0], &events[1], &events[2], &events[3]) {
        (
            ListEvent::PropertyChanged(first),
            ListEvent::CollectionChanged(reset),
            ListEvent::PropertyChanged(cleared),
            ListEvent::CollectionChanged(empty),
        ) => {
            assert_eq!(first.count, 1);
            assert_eq!(reset.snapshot.as_slice(), &[5]);
            assert_eq!((first.version, reset.version), (1, 1));
            assert_eq!(cleared.count, 0);
            assert!(empty.snapshot.is_empty());
            assert_eq!((cleared.version, empty.version), (2, 2));
        }
        other => panic!("unexpected event order: {other:?}"),
    }
}

#[test]
fn test_bounded_channel_drops_instead_of_blocking() {
    let config = ListConfig::from_toml_str(
        r#"
        name = "bounded"
        channel_capacity = 2
        "#,
    )
    .unwrap();
    let list = ConcurrentList::with_config(config).unwrap();
    let rx = list.subscribe_channel();

    for i in 0..10 {
        list.push_back(i);
    }

    assert_eq!(rx.try_iter().count(), 2);
    assert_eq!(list.len(), 10);

    drop(rx);
    list.push_back(10);
    assert_eq!(list.observer_count(), 0);
}

#[test]
fn test_observer_panic_leaves_list_consistent() {
    let list = ConcurrentList::new();
    list.subscribe_property_changed(|e| {
        assert!(e.count < 2, "observer rejects a second element");
    });

    list.push_back(1);
    let result = panic::catch_unwind(AssertUnwindSafe(|| list.push_back(2)));
    assert!(result.is_err());

    // The mutation committed before observers ran, and the lock is free.
    assert_eq!(list.to_vec(), vec![1, 2]);
    list.clear();
    assert!(list.is_empty());
}

#[test]
fn test_observers_from_many_threads_see_every_mutation() {
    let list = Arc::new(ConcurrentList::new());
    let resets = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&resets);
    list.subscribe_collection_changed(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let list = Arc::clone(&list);
            thread::spawn(move || {
                for i in 0..100 {
                    list.push_back(t * 100 + i);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(resets.load(Ordering::SeqCst), 400);
    assert_eq!(list.len(), 400);
}

#[test]
fn test_versions_recover_commit_order_across_threads() {
    const THREADS: usize = 4;
    const PER_THREAD: usize = 200;
    let total = THREADS * PER_THREAD;

    let list = Arc::new(ConcurrentList::new());
    let rx = list.subscribe_channel();

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let list = Arc::clone(&list);
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    list.push_back(t * PER_THREAD + i);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let mut counts = Vec::with_capacity(total);
    let mut latest: Option<(u64, usize)> = None;
    for event in rx.try_iter() {
        if let ListEvent::PropertyChanged(e) = event {
            counts.push((e.version, e.count));
            // Keep only the newest commit, whatever the arrival order.
            if latest.map_or(true, |(version, _)| e.version > version) {
                latest = Some((e.version, e.count));
            }
        }
    }

    // Every commit is reported exactly once, and its count matches its
    // position in commit order.
    counts.sort_unstable();
    let expected: Vec<(u64, usize)> = (1..=total).map(|n| (n as u64, n)).collect();
    assert_eq!(counts, expected);
    assert_eq!(latest, Some((total as u64, total)));
    assert_eq!(list.version(), total as u64);
}
