//! Integration tests for injector isolation and concurrent use.
//!
//! Injectors are plain values: two injectors never see each other's
//! dependencies, and one injector can be shared by many threads once built.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use type_injector::{injector, InjectError, Injector};

#[test]
fn test_multiple_isolated_injectors() {
    let database = injector!["postgresql://localhost".to_string()].unwrap();
    let cache = injector!["redis://localhost".to_string()].unwrap();

    let db = database.inject(|url: String| url).unwrap();
    let cache_val = cache.inject(|url: String| url).unwrap();

    assert_eq!(db, "postgresql://localhost");
    assert_eq!(cache_val, "redis://localhost");
}

#[test]
fn test_injector_does_not_leak_between_instances() {
    let isolated_a = injector!["only in A".to_string()].unwrap();
    let isolated_b = injector![1u8].unwrap();

    assert!(isolated_a.inject(|s: String| s).is_ok());
    assert!(matches!(
        isolated_b.inject(|s: String| s),
        Err(InjectError::MissingDependency { .. })
    ));
}

#[test]
fn test_concurrent_injection_from_many_threads() {
    #[derive(Debug, Clone, Copy)]
    struct Multiplier(u64);

    let di = injector![Multiplier(3), 7u64].unwrap();
    let barrier = Barrier::new(8);

    let results: Vec<u64> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let di = &di;
                let barrier = &barrier;
                scope.spawn(move || {
                    barrier.wait();
                    di.inject(move |m: Multiplier, base: u64| m.0 * base + i)
                        .unwrap()
                })
            })
            .collect();

        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results, (0..8).map(|i| 21 + i).collect::<Vec<u64>>());
}

#[test]
fn test_shared_injector_behind_arc() {
    let calls = Arc::new(AtomicUsize::new(0));
    let di = Arc::new(
        Injector::builder()
            .provide_opaque(calls.clone())
            .build()
            .unwrap(),
    );

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let di = Arc::clone(&di);
            thread::spawn(move || {
                di.inject(|calls: Arc<AtomicUsize>| calls.fetch_add(1, Ordering::SeqCst))
                    .unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[test]
fn test_error_in_one_thread_does_not_affect_others() {
    let di = injector![5i32].unwrap();

    thread::scope(|scope| {
        let failing = scope.spawn(|| di.inject(|s: String| s));
        let working = scope.spawn(|| di.inject(|n: i32| n * 2));

        assert!(failing.join().unwrap().is_err());
        assert_eq!(working.join().unwrap().unwrap(), 10);
    });
}

#[test]
fn test_panicking_callable_propagates() {
    let di = injector![0u32].unwrap();

    let outcome = thread::spawn(move || di.inject(|d: u32| 10 / d)).join();
    assert!(outcome.is_err());
}
