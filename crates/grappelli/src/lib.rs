//! # Grappelli
//!
//! A minimal reactive state-management runtime: composable [`Event`]s,
//! [`Store`]s and [`Effect`]s that express "state changes in response to
//! actions" and "side effects produce further actions" without manual
//! subscription plumbing.
//!
//! ## Primitives
//!
//! - [`Event`]: a payload-carrying trigger token. Emitting notifies the
//!   stores linked to it, then its own watchers, synchronously and in
//!   registration order.
//! - [`Store`]: holds the current state and one reducer per linked event;
//!   reacts to emits by reducing and notifying its watchers.
//! - [`Effect`]: wraps an async callback and fires exactly one of its
//!   derived `done_data`/`fail_data` events when the work settles.
//! - [`StoreBinding`]: the subscription bridge a rendering layer uses to
//!   read a store and re-render on change.
//!
//! ## Example
//!
//! ```
//! use grappelli::{Event, Store};
//!
//! let set_title = Event::<String>::new();
//! let reset_title = Event::<()>::new();
//!
//! let title = Store::new(String::from("default title"));
//! title
//! 	.on(&set_title, |_, next| next.clone())
//! 	.reset(&reset_title);
//!
//! set_title.emit(String::from("hello"));
//! assert_eq!(title.get(), "hello");
//!
//! reset_title.fire();
//! assert_eq!(title.get(), "default title");
//! ```
//!
//! ## Threading
//!
//! Handles are `Send + Sync` and cheap to clone. Each store serializes its
//! reduce-then-notify chain, so emits racing in from different threads apply
//! one at a time per store; the serialization is reentrant and the data
//! locks are released before user callbacks run, so reducers and watchers
//! may re-enter the API from the dispatching thread. Notification chains
//! run synchronously to completion on the emitting thread; the only
//! asynchronous boundary is inside an [`Effect`]'s callback, which settles
//! on the ambient tokio runtime.
//!
//! ## Errors
//!
//! The runtime itself is infallible: a panicking reducer or watcher
//! propagates to the emitter and aborts the remaining notifications of that
//! emit; asynchronous failures are data, funneled through an effect's
//! `fail_data` event.

pub mod binding;
pub mod effect;
pub mod event;
pub mod store;
pub mod subscription;

pub use binding::StoreBinding;
pub use effect::Effect;
pub use event::{Event, EventId};
pub use store::Store;
pub use subscription::Subscription;
