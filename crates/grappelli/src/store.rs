//! Store - state container driven by events
//!
//! A [`Store`] owns a current state value, a reducer per linked [`Event`],
//! and a watcher list. It never mutates state on its own: every transition is
//! the result of an event dispatch running the reducer registered for that
//! event.
//!
//! Watchers are notified on **every** dispatch for a linked event, with the
//! post-reduction state and the triggering payload, including dispatches
//! whose reducer returned the same value as before. There is no equality
//! short-circuit.
//!
//! ## Example
//!
//! ```
//! use grappelli::{Event, Store};
//!
//! let increment = Event::<u32>::new();
//! let clear = Event::<()>::new();
//!
//! let counter = Store::new(0_u32);
//! counter
//! 	.on(&increment, |count, step| count + step)
//! 	.reset(&clear);
//!
//! increment.emit(2);
//! increment.emit(3);
//! assert_eq!(counter.get(), 5);
//!
//! clear.fire();
//! assert_eq!(counter.get(), 0);
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::{ReentrantMutex, RwLock};

use crate::event::{DispatchTarget, ErasedPayload, Event, EventId};
use crate::subscription::{Subscription, WatcherId};

/// Reducer with the payload type erased. `None` means the payload did not
/// match the type the reducer was registered with; the reduction is skipped.
type ErasedReducer<S> = Arc<dyn Fn(&S, &ErasedPayload) -> Option<S> + Send + Sync>;

type StoreWatcher<S> = Arc<dyn Fn(&S, &ErasedPayload) + Send + Sync>;

struct StoreInner<S> {
	state: RwLock<S>,
	/// Snapshot taken at construction. `reset` reducers restore this value,
	/// no matter what the state has been replaced with since.
	initial: S,
	reducers: RwLock<HashMap<EventId, ErasedReducer<S>>>,
	watchers: RwLock<Vec<(WatcherId, StoreWatcher<S>)>>,
	/// Serializes the reduce-then-notify chain per store when events are
	/// emitted from multiple threads. Reentrant so a watcher or reducer may
	/// emit back into the same store from the dispatching thread.
	dispatch_serial: ReentrantMutex<()>,
}

/// State container driven by [`Event`] dispatches
///
/// Cheap to clone; all clones share the same state cell, reducer map and
/// watcher list. Events linked via [`on`](Store::on) hold only weak
/// references back to the store, so dropping every `Store` handle frees the
/// state even while events still point at it.
pub struct Store<S> {
	inner: Arc<StoreInner<S>>,
}

impl<S> Clone for Store<S> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<S: Clone + Send + Sync + 'static> Store<S> {
	/// Create a store holding `initial`
	///
	/// The initial value is also snapshotted for [`reset`](Store::reset).
	pub fn new(initial: S) -> Self {
		Self {
			inner: Arc::new(StoreInner {
				state: RwLock::new(initial.clone()),
				initial,
				reducers: RwLock::new(HashMap::new()),
				watchers: RwLock::new(Vec::new()),
				dispatch_serial: ReentrantMutex::new(()),
			}),
		}
	}

	/// Current state
	pub fn get(&self) -> S {
		self.inner.state.read().clone()
	}

	/// Register `reducer` for `event` and link the store to it
	///
	/// At most one reducer is kept per event: a later `on` for the same event
	/// replaces the earlier reducer. The store link on the event side is
	/// appended on every call, so registering twice makes one emit dispatch
	/// twice (both times through the newest reducer).
	///
	/// Returns `&self` for chained registration.
	pub fn on<P, F>(&self, event: &Event<P>, reducer: F) -> &Self
	where
		P: Send + Sync + 'static,
		F: Fn(&S, &P) -> S + Send + Sync + 'static,
	{
		let erased: ErasedReducer<S> = Arc::new(move |state, payload| {
			payload
				.downcast_ref::<P>()
				.map(|payload| reducer(state, payload))
		});
		self.inner.reducers.write().insert(event.id(), erased);

		let inner: Arc<dyn DispatchTarget> = self.inner.clone();
		let target: Weak<dyn DispatchTarget> = Arc::downgrade(&inner);
		event.link(target);
		self
	}

	/// Register a reducer for `event` that restores the initial state
	///
	/// Sugar for `on(event, |_, _| initial.clone())` with the snapshot taken
	/// at construction. Returns `&self` for chained registration.
	pub fn reset<P>(&self, event: &Event<P>) -> &Self
	where
		P: Send + Sync + 'static,
	{
		let initial = self.inner.initial.clone();
		self.on(event, move |_state, _payload: &P| initial.clone())
	}

	/// Dispatch `event` with `payload` against this store only
	///
	/// This is the per-store half of [`Event::emit`]: the reducer registered
	/// for `event` (if any) runs, then the store's watchers are notified.
	/// Other stores linked to `event` are not involved.
	pub fn dispatch<P>(&self, event: &Event<P>, payload: P)
	where
		P: Send + Sync + 'static,
	{
		self.inner.dispatch_erased(event.id(), &payload);
	}

	/// Register a watcher called with `(state, payload)` on every dispatch
	///
	/// The watcher is **not** called at registration time; it only observes
	/// future dispatches. The payload arrives type-erased because a store can
	/// be linked to events of different payload types.
	pub fn watch<F>(&self, watcher: F) -> Subscription
	where
		F: Fn(&S, &(dyn Any + Send + Sync)) + Send + Sync + 'static,
	{
		let id = WatcherId::next();
		self.inner.watchers.write().push((id, Arc::new(watcher)));

		let slot = Arc::downgrade(&self.inner);
		Subscription::new(move || {
			if let Some(inner) = slot.upgrade() {
				inner.watchers.write().retain(|(wid, _)| *wid != id);
			}
		})
	}
}

impl<S: Clone + Send + Sync + 'static> DispatchTarget for StoreInner<S> {
	fn dispatch_erased(&self, source: EventId, payload: &ErasedPayload) {
		let _serial = self.dispatch_serial.lock();

		let reducer = self.reducers.read().get(&source).cloned();
		let reduced = reducer.is_some();
		if let Some(reduce) = reducer {
			// No data lock is held while the reducer runs, so reducers may
			// re-enter the store (get, on, further emits).
			let prev = self.state.read().clone();
			if let Some(next) = reduce(&prev, payload) {
				*self.state.write() = next;
			}
		}
		tracing::trace!(event = ?source, reduced, "dispatch");

		// Watchers observe the post-reduction state on every dispatch, even
		// when no reducer is registered or the value is unchanged.
		let current = self.state.read().clone();
		let watchers: Vec<StoreWatcher<S>> = {
			let watchers = self.watchers.read();
			watchers.iter().map(|(_, cb)| Arc::clone(cb)).collect()
		};
		for watcher in watchers {
			watcher(&current, payload);
		}
	}
}

impl<S: fmt::Debug> fmt::Debug for Store<S> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Store")
			.field("state", &*self.inner.state.read())
			.field("reducers", &self.inner.reducers.read().len())
			.field("watchers", &self.inner.watchers.read().len())
			.finish()
	}
}
