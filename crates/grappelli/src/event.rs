//! Event - payload-carrying trigger token
//!
//! An [`Event`] is the leaf primitive of the runtime: a token that can be
//! emitted with a payload. Emitting first dispatches into every linked store
//! (the link is created by `Store::on`), then calls the event's own watchers.
//! Both passes run synchronously, in registration order.
//!
//! Events hold only *weak* references to the stores they feed. Dropping the
//! last handle to a store frees it even while events still point at it; the
//! dead link is skipped and pruned on the next emit.
//!
//! ## Example
//!
//! ```
//! use grappelli::{Event, Store};
//!
//! let rename = Event::<String>::new();
//! let name = Store::new(String::from("anonymous"));
//! name.on(&rename, |_, next| next.clone());
//!
//! rename.emit(String::from("django"));
//! assert_eq!(name.get(), "django");
//! ```

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::subscription::{Subscription, WatcherId};

/// Process-unique identity of an [`Event`]
///
/// Stores key their reducer maps by this id. Clones of an `Event` share one
/// id: they are the same token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventId(u64);

impl EventId {
	fn next() -> Self {
		static COUNTER: AtomicU64 = AtomicU64::new(0);
		Self(COUNTER.fetch_add(1, Ordering::Relaxed))
	}
}

/// Payload with its concrete type erased at the Event→Store boundary.
///
/// The typed reducer wrapper registered by `Store::on` downcasts it back.
pub(crate) type ErasedPayload = dyn Any + Send + Sync;

/// Receiving end of an Event→Store link.
///
/// Object-safe so one event can feed stores of arbitrary state types.
pub(crate) trait DispatchTarget: Send + Sync {
	fn dispatch_erased(&self, source: EventId, payload: &ErasedPayload);
}

type EventWatcher<P> = Arc<dyn Fn(&P) + Send + Sync>;

struct EventInner<P> {
	id: EventId,
	/// Linked stores in registration order. A repeated `on()` for the same
	/// store adds a second entry.
	links: RwLock<Vec<Weak<dyn DispatchTarget>>>,
	watchers: RwLock<Vec<(WatcherId, EventWatcher<P>)>>,
}

/// A payload-carrying trigger token
///
/// Cheap to clone; all clones share the same identity, links and watchers.
pub struct Event<P> {
	inner: Arc<EventInner<P>>,
}

impl<P> Clone for Event<P> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<P> Event<P> {
	/// Identity of this event
	pub fn id(&self) -> EventId {
		self.inner.id
	}
}

impl<P: Send + Sync + 'static> Event<P> {
	/// Create a fresh event with no linked stores and no watchers
	pub fn new() -> Self {
		Self {
			inner: Arc::new(EventInner {
				id: EventId::next(),
				links: RwLock::new(Vec::new()),
				watchers: RwLock::new(Vec::new()),
			}),
		}
	}

	/// Emit the event with `payload`
	///
	/// Synchronously, in this order:
	///
	/// 1. every linked store is dispatched to, in registration order, which
	///    runs its registered reducer and notifies its watchers;
	/// 2. every watcher of the event itself is called, in registration order.
	///
	/// There is no isolation between steps: a panicking reducer or watcher
	/// propagates to the caller and aborts the remaining notifications.
	pub fn emit(&self, payload: P) {
		let targets: Vec<Arc<dyn DispatchTarget>> = {
			let mut links = self.inner.links.write();
			links.retain(|link| link.strong_count() > 0);
			links.iter().filter_map(Weak::upgrade).collect()
		};
		tracing::trace!(event = ?self.inner.id, stores = targets.len(), "emit");
		for target in targets {
			target.dispatch_erased(self.inner.id, &payload);
		}

		let watchers: Vec<EventWatcher<P>> = {
			let watchers = self.inner.watchers.read();
			watchers.iter().map(|(_, cb)| Arc::clone(cb)).collect()
		};
		for watcher in watchers {
			watcher(&payload);
		}
	}

	/// Register a watcher called with every emitted payload
	///
	/// The watcher only observes emissions after registration. The returned
	/// [`Subscription`] removes exactly this registration.
	pub fn watch(&self, watcher: impl Fn(&P) + Send + Sync + 'static) -> Subscription {
		let id = WatcherId::next();
		self.inner.watchers.write().push((id, Arc::new(watcher)));

		let slot = Arc::downgrade(&self.inner);
		Subscription::new(move || {
			if let Some(inner) = slot.upgrade() {
				inner.watchers.write().retain(|(wid, _)| *wid != id);
			}
		})
	}

	/// Whether anything currently observes this event
	///
	/// True when at least one linked store is still alive or at least one
	/// watcher is registered.
	pub fn has_listeners(&self) -> bool {
		let live_link = self
			.inner
			.links
			.read()
			.iter()
			.any(|link| link.strong_count() > 0);
		live_link || !self.inner.watchers.read().is_empty()
	}

	/// Append a store link. Called by `Store::on`; order of calls is the
	/// dispatch order.
	pub(crate) fn link(&self, target: Weak<dyn DispatchTarget>) {
		self.inner.links.write().push(target);
	}
}

impl Event<()> {
	/// Sugar for `emit(())` on payload-less events
	pub fn fire(&self) {
		self.emit(());
	}
}

impl<P: Send + Sync + 'static> Default for Event<P> {
	fn default() -> Self {
		Self::new()
	}
}

impl<P> fmt::Debug for Event<P> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Event")
			.field("id", &self.inner.id)
			.field("links", &self.inner.links.read().len())
			.field("watchers", &self.inner.watchers.read().len())
			.finish()
	}
}
