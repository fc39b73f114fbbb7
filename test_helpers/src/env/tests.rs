//! Unit tests for environment helpers.

use std::sync::{Arc, Barrier};
use std::thread;

use rstest::rstest;

use super::*;

fn value(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

#[rstest]
fn set_var_restores_absent_variable() {
    let key = "NESTCONF_HELPERS_SET_ABSENT";
    assert_eq!(value(key), None);
    {
        let guard = set_var(key, "temp");
        assert_eq!(guard.key(), key);
        assert_eq!(value(key).as_deref(), Some("temp"));
    }
    assert_eq!(value(key), None);
}

#[rstest]
fn remove_var_restores_original() {
    let key = "NESTCONF_HELPERS_REMOVE";
    let outer = set_var(key, "orig");
    {
        let _guard = remove_var(key);
        assert_eq!(value(key), None);
    }
    assert_eq!(value(key).as_deref(), Some("orig"));
    drop(outer);
}

#[rstest]
fn stacked_guards_restore_in_reverse_order() {
    let key = "NESTCONF_HELPERS_STACKED";
    let first = set_var(key, "one");
    let second = set_var(key, "two");
    assert_eq!(value(key).as_deref(), Some("two"));
    drop(second);
    assert_eq!(value(key).as_deref(), Some("one"));
    drop(first);
    assert_eq!(value(key), None);
}

#[rstest]
fn scope_applies_and_restores_every_pair() {
    let present = "NESTCONF_HELPERS_SCOPE_PRESENT";
    let removed = "NESTCONF_HELPERS_SCOPE_REMOVED";
    let _existing = set_var(removed, "kept");
    {
        let scope = vars([(present, Some("set")), (removed, None)]);
        assert_eq!(scope.len(), 2);
        assert_eq!(value(present).as_deref(), Some("set"));
        assert_eq!(value(removed), None);
    }
    assert_eq!(value(present), None);
    assert_eq!(value(removed).as_deref(), Some("kept"));
}

#[rstest]
fn scope_blocks_other_threads_until_dropped() {
    let key = "NESTCONF_HELPERS_SCOPE_LOCK";
    let scope = vars([(key, Some("held"))]);
    let barrier = Arc::new(Barrier::new(2));
    let waiter = {
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            with_lock(|| value(key))
        })
    };
    barrier.wait();
    drop(scope);
    let seen = waiter.join().expect("worker thread");
    assert_eq!(seen, None);
}
