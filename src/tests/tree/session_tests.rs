use std::sync::Arc;
use std::sync::atomic::AtomicUsize;

use super::*;

#[test]
fn second_render_is_refused_while_first_holds_the_guard() {
    let session = SessionContext::new();
    let first = session.try_begin_render().expect("first");
    assert!(session.is_busy());
    assert!(session.try_begin_render().is_none());
    drop(first);
    assert!(!session.is_busy());
    assert!(session.try_begin_render().is_some());
}

#[test]
fn guard_is_released_when_the_render_panics() {
    let session = Arc::new(SessionContext::new());
    let s = Arc::clone(&session);
    let joined = std::thread::spawn(move || {
        let _guard = s.try_begin_render().expect("guard");
        panic!("render blew up");
    })
    .join();
    assert!(joined.is_err());
    assert!(!session.is_busy());
}

#[test]
fn concurrent_attempts_admit_exactly_one() {
    let session = Arc::new(SessionContext::new());
    let admitted = Arc::new(AtomicUsize::new(0));
    let start = Arc::new(std::sync::Barrier::new(8));
    let tried = Arc::new(std::sync::Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let session = Arc::clone(&session);
            let admitted = Arc::clone(&admitted);
            let start = Arc::clone(&start);
            let tried = Arc::clone(&tried);
            std::thread::spawn(move || {
                start.wait();
                let guard = session.try_begin_render();
                if guard.is_some() {
                    admitted.fetch_add(1, Ordering::SeqCst);
                }
                // Keep the winner's guard alive until every thread has tried.
                tried.wait();
                drop(guard);
            })
        })
        .collect();
    for h in handles {
        h.join().expect("join");
    }

    assert_eq!(admitted.load(Ordering::SeqCst), 1);
    assert!(!session.is_busy());
}

#[test]
fn blank_filter_clears() {
    let session = SessionContext::new();
    session.set_filter(Some("  Con "));
    assert_eq!(session.filter().as_deref(), Some("Con"));
    session.set_filter(Some("   "));
    assert_eq!(session.filter(), None);
    session.set_filter(Some("x"));
    session.set_filter(None);
    assert_eq!(session.filter(), None);
}

#[test]
fn count_warning_fires_once() {
    let session = SessionContext::new();
    assert!(session.take_count_warning());
    assert!(!session.take_count_warning());
}
