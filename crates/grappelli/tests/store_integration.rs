//! Integration tests for Event→Store→watcher dispatch
//!
//! Tests the synchronous notification chain across the public API:
//! - reducer execution and watcher notification counts per emit
//! - notification ordering (stores before event watchers, registration order)
//! - reset semantics against the construction-time snapshot
//! - reducer replacement and duplicate-link behavior
//! - token-based unsubscription

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use grappelli::{Event, Store};
use parking_lot::Mutex;

#[test]
fn test_title_scenario_set_then_reset() {
	let set_title = Event::<String>::new();
	let reset_title = Event::<()>::new();

	let title = Store::new(String::from("default title"));
	title
		.on(&set_title, |_, payload| payload.clone())
		.reset(&reset_title);

	set_title.emit(String::from("hello"));
	assert_eq!(title.get(), "hello", "set_title should replace the title");

	reset_title.fire();
	assert_eq!(
		title.get(),
		"default title",
		"reset_title should restore the initial title"
	);
}

#[test]
fn test_reducer_and_watcher_each_run_once_per_emit() {
	let set = Event::<u32>::new();
	let store = Store::new(0_u32);

	let reductions = Arc::new(AtomicUsize::new(0));
	let reductions_clone = reductions.clone();
	store.on(&set, move |_, n| {
		reductions_clone.fetch_add(1, Ordering::SeqCst);
		*n
	});

	let notifications = Arc::new(AtomicUsize::new(0));
	let notifications_clone = notifications.clone();
	let _subscription = store.watch(move |_, _| {
		notifications_clone.fetch_add(1, Ordering::SeqCst);
	});

	set.emit(5);

	assert_eq!(
		reductions.load(Ordering::SeqCst),
		1,
		"reducer should run exactly once per emit"
	);
	assert_eq!(
		notifications.load(Ordering::SeqCst),
		1,
		"store watcher should run exactly once per emit"
	);
}

#[test]
fn test_watchers_fire_even_when_reducer_is_a_noop() {
	let touch = Event::<u32>::new();
	let store = Store::new(7_u32);
	store.on(&touch, |state, _| *state);

	let observed = Arc::new(Mutex::new(Vec::new()));
	let observed_clone = observed.clone();
	let _subscription = store.watch(move |state, payload| {
		let payload = payload.downcast_ref::<u32>().copied();
		observed_clone.lock().push((*state, payload));
	});

	touch.emit(1);
	touch.emit(2);

	assert_eq!(
		*observed.lock(),
		vec![(7, Some(1)), (7, Some(2))],
		"watchers should observe (unchanged state, payload) on every dispatch"
	);
}

#[test]
fn test_stores_are_notified_before_event_watchers() {
	let event = Event::<()>::new();
	let store = Store::new(0_u32);
	let order = Arc::new(Mutex::new(Vec::new()));

	let store_side = order.clone();
	store.on(&event, |state, _| *state);
	let _store_watch = store.watch(move |_, _| store_side.lock().push("store"));

	let event_side = order.clone();
	let _event_watch = event.watch(move |_| event_side.lock().push("event"));

	event.fire();

	assert_eq!(
		*order.lock(),
		vec!["store", "event"],
		"linked stores settle before the event's own watchers"
	);
}

#[test]
fn test_linked_stores_dispatch_in_registration_order() {
	let event = Event::<()>::new();
	let order = Arc::new(Mutex::new(Vec::new()));

	let first = Store::new(0_u32);
	let first_order = order.clone();
	first.on(&event, move |state, _| {
		first_order.lock().push("first");
		*state
	});

	let second = Store::new(0_u32);
	let second_order = order.clone();
	second.on(&event, move |state, _| {
		second_order.lock().push("second");
		*state
	});

	event.fire();

	assert_eq!(
		*order.lock(),
		vec!["first", "second"],
		"stores are dispatched in on() registration order"
	);
}

#[test]
fn test_store_watch_does_not_fire_at_registration() {
	let store = Store::new(String::from("quiet"));
	let calls = Arc::new(AtomicUsize::new(0));
	let calls_clone = calls.clone();

	let _subscription = store.watch(move |_, _| {
		calls_clone.fetch_add(1, Ordering::SeqCst);
	});

	assert_eq!(
		calls.load(Ordering::SeqCst),
		0,
		"watch() must not call back with the current state at subscribe time"
	);
}

#[test]
fn test_reset_wins_over_intervening_dispatches() {
	let set = Event::<u32>::new();
	let clear = Event::<()>::new();
	let store = Store::new(1_u32);
	store.on(&set, |_, n| *n).reset(&clear);

	set.emit(10);
	set.emit(20);
	set.emit(30);
	clear.fire();

	assert_eq!(
		store.get(),
		1,
		"reset restores the value passed at construction, regardless of history"
	);
}

#[test]
fn test_latest_reducer_replaces_earlier_registration() {
	let set = Event::<u32>::new();
	let store = Store::new(0_u32);
	store.on(&set, |state, _| state + 1000);
	store.on(&set, |_, n| *n);

	set.emit(3);

	assert_eq!(
		store.get(),
		3,
		"only the most recently registered reducer runs on dispatch"
	);
}

#[test]
fn test_unsubscribe_removes_only_its_own_watcher() {
	let set = Event::<u32>::new();
	let store = Store::new(0_u32);
	store.on(&set, |_, n| *n);

	let kept = Arc::new(AtomicUsize::new(0));
	let removed = Arc::new(AtomicUsize::new(0));
	let kept_clone = kept.clone();
	let removed_clone = removed.clone();

	let _kept_sub = store.watch(move |_, _| {
		kept_clone.fetch_add(1, Ordering::SeqCst);
	});
	let removed_sub = store.watch(move |_, _| {
		removed_clone.fetch_add(1, Ordering::SeqCst);
	});

	set.emit(1);
	removed_sub.unsubscribe();
	removed_sub.unsubscribe(); // second call is a no-op
	set.emit(2);

	assert_eq!(kept.load(Ordering::SeqCst), 2, "other watchers keep firing");
	assert_eq!(
		removed.load(Ordering::SeqCst),
		1,
		"unsubscribed watcher saw only the dispatch before unsubscription"
	);
}

#[test]
fn test_event_watch_unsubscribe_is_idempotent() {
	let event = Event::<u32>::new();
	let calls = Arc::new(AtomicUsize::new(0));
	let calls_clone = calls.clone();
	let subscription = event.watch(move |_| {
		calls_clone.fetch_add(1, Ordering::SeqCst);
	});

	event.emit(1);
	subscription.unsubscribe();
	subscription.unsubscribe();
	event.emit(2);

	assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_dropping_a_store_does_not_break_the_event() {
	let set = Event::<u32>::new();

	let survivor = Store::new(0_u32);
	survivor.on(&set, |_, n| *n);

	{
		let doomed = Store::new(0_u32);
		doomed.on(&set, |_, n| *n);
		set.emit(1);
		assert_eq!(doomed.get(), 1);
	}

	set.emit(2);

	assert_eq!(
		survivor.get(),
		2,
		"emitting after a linked store was dropped still reaches live stores"
	);
}

#[test]
fn test_has_listeners_reflects_links_and_watchers() {
	let event = Event::<u32>::new();
	assert!(!event.has_listeners(), "fresh event has no listeners");

	let subscription = event.watch(|_| {});
	assert!(event.has_listeners(), "a watcher counts as a listener");
	subscription.unsubscribe();
	assert!(!event.has_listeners());

	{
		let store = Store::new(0_u32);
		store.on(&event, |_, n| *n);
		assert!(event.has_listeners(), "a live store link counts as a listener");
	}
	assert!(
		!event.has_listeners(),
		"a dead store link no longer counts as a listener"
	);
}

#[test]
fn test_one_event_drives_multiple_stores() {
	let rename = Event::<String>::new();

	let name = Store::new(String::new());
	name.on(&rename, |_, next| next.clone());

	let history = Store::new(Vec::<String>::new());
	history.on(&rename, |log, next| {
		let mut log = log.clone();
		log.push(next.clone());
		log
	});

	rename.emit(String::from("one"));
	rename.emit(String::from("two"));

	assert_eq!(name.get(), "two");
	assert_eq!(history.get(), vec!["one", "two"]);
}

#[test]
fn test_direct_dispatch_reaches_one_store_only() {
	let set = Event::<u32>::new();
	let a = Store::new(0_u32);
	let b = Store::new(0_u32);
	a.on(&set, |_, n| *n);
	b.on(&set, |_, n| *n);

	a.dispatch(&set, 9);

	assert_eq!(a.get(), 9, "dispatch applies to the receiving store");
	assert_eq!(b.get(), 0, "dispatch does not fan out to other linked stores");
}
