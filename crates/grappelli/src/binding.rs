//! Subscription bridge between a store and a rendering layer
//!
//! [`StoreBinding`] is the only interface a UI layer needs from the runtime:
//! it reads the store once at attach time, follows every subsequent dispatch,
//! and detaches when dropped. The optional change callback is where a
//! consumer schedules its re-render.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::store::Store;
use crate::subscription::Subscription;

/// Live view of a store's state for a rendering layer
///
/// The bound value starts at the store's state when the binding is created
/// and is updated by every dispatch afterwards. Dropping the binding
/// unsubscribes its watcher.
///
/// # Examples
///
/// ```
/// use grappelli::{Event, Store, StoreBinding};
///
/// let set_title = Event::<String>::new();
/// let title = Store::new(String::from("default title"));
/// title.on(&set_title, |_, next| next.clone());
///
/// let binding = StoreBinding::bind(&title);
/// assert_eq!(binding.current(), "default title");
///
/// set_title.emit(String::from("hello"));
/// assert_eq!(binding.current(), "hello");
/// ```
pub struct StoreBinding<S> {
	current: Arc<RwLock<S>>,
	subscription: Subscription,
}

impl<S: Clone + Send + Sync + 'static> StoreBinding<S> {
	/// Attach to `store`, tracking its state without a change callback
	pub fn bind(store: &Store<S>) -> Self {
		Self::bind_with(store, |_| {})
	}

	/// Attach to `store`, invoking `on_change` after every update
	///
	/// `on_change` receives the new state and is the UI layer's re-render
	/// hook. It is not invoked for the initial value; only dispatches after
	/// the binding was created trigger it.
	pub fn bind_with(store: &Store<S>, on_change: impl Fn(&S) + Send + Sync + 'static) -> Self {
		let current = Arc::new(RwLock::new(store.get()));
		let cell = Arc::clone(&current);
		let subscription = store.watch(move |state, _payload| {
			*cell.write() = state.clone();
			on_change(state);
		});
		Self {
			current,
			subscription,
		}
	}

	/// Latest observed state
	pub fn current(&self) -> S {
		self.current.read().clone()
	}
}

impl<S> Drop for StoreBinding<S> {
	fn drop(&mut self) {
		self.subscription.unsubscribe();
	}
}
