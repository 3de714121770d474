//! Subscription handles for watcher registrations
//!
//! Every `watch()` call returns a [`Subscription`] token. Removal is
//! token-based: the handle knows which registration it stands for, so callers
//! never have to keep the original closure around to unsubscribe, and two
//! registrations of an identical-looking closure stay independently
//! removable.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

/// Identifier of a single watcher registration.
///
/// Ids are process-unique, so removing by id can never hit a later
/// registration that happened to land in the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct WatcherId(u64);

impl WatcherId {
	/// Allocate the next unique id
	pub(crate) fn next() -> Self {
		static COUNTER: AtomicU64 = AtomicU64::new(0);
		Self(COUNTER.fetch_add(1, Ordering::Relaxed))
	}
}

type DetachFn = Box<dyn FnOnce() + Send>;

/// Handle for a watcher registered on an `Event` or a `Store`
///
/// [`unsubscribe`](Subscription::unsubscribe) removes exactly the
/// registration this handle was returned for. The call is idempotent:
/// everything after the first call is a no-op.
///
/// Dropping the handle without calling `unsubscribe` leaves the watcher
/// installed for the lifetime of the Event/Store it is attached to.
///
/// # Examples
///
/// ```
/// use grappelli::Event;
///
/// let event = Event::<u32>::new();
/// let subscription = event.watch(|n| println!("saw {n}"));
///
/// event.emit(1); // watcher runs
/// subscription.unsubscribe();
/// event.emit(2); // watcher is gone
/// subscription.unsubscribe(); // no-op
/// ```
#[must_use = "dropping the handle leaves the watcher installed; keep it to unsubscribe later"]
pub struct Subscription {
	detach: Mutex<Option<DetachFn>>,
}

impl Subscription {
	pub(crate) fn new(detach: impl FnOnce() + Send + 'static) -> Self {
		Self {
			detach: Mutex::new(Some(Box::new(detach))),
		}
	}

	/// Remove the watcher this handle was returned for
	///
	/// Idempotent: only the first call detaches anything.
	pub fn unsubscribe(&self) {
		if let Some(detach) = self.detach.lock().take() {
			detach();
		}
	}

	/// Whether the watcher is still attached through this handle
	pub fn is_active(&self) -> bool {
		self.detach.lock().is_some()
	}
}

impl fmt::Debug for Subscription {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Subscription")
			.field("active", &self.is_active())
			.finish()
	}
}
