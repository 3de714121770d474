//! Effect - asynchronous unit of work feeding events
//!
//! An [`Effect`] wraps an async callback and owns a pair of derived events:
//! [`done_data`](Effect::done_data) fires with the success value,
//! [`fail_data`](Effect::fail_data) with the error. Exactly one of the two
//! fires per invocation, never both. The settled value then fans out through
//! the ordinary Event→Store→watcher path.
//!
//! Invocations are independent: there is no queueing, coalescing, retry,
//! cancellation or timeout. A callback that never settles simply never fires
//! either event.
//!
//! ## Example
//!
//! ```ignore
//! use grappelli::{Effect, Store};
//!
//! let load_title = Effect::new(|()| async {
//! 	fetch_title().await // Result<String, FetchError>
//! });
//!
//! let title = Store::new(String::from("default title"));
//! title
//! 	.on(load_title.done_data(), |_, loaded| loaded.clone())
//! 	.on(load_title.fail_data(), |_, _| String::from("some error"));
//!
//! load_title.run(()); // fire-and-forget; settles on the tokio runtime
//! ```

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::task::JoinHandle;

use crate::event::Event;

type EffectHandler<P, R, E> = Arc<dyn Fn(P) -> BoxFuture<'static, Result<R, E>> + Send + Sync>;

/// Asynchronous unit of work with derived settlement events
///
/// Cheap to clone; clones share the handler and the event pair.
pub struct Effect<P, R, E> {
	handler: EffectHandler<P, R, E>,
	done_data: Event<R>,
	fail_data: Event<E>,
}

impl<P, R, E> Clone for Effect<P, R, E> {
	fn clone(&self) -> Self {
		Self {
			handler: Arc::clone(&self.handler),
			done_data: self.done_data.clone(),
			fail_data: self.fail_data.clone(),
		}
	}
}

impl<P, R, E> Effect<P, R, E>
where
	P: Send + 'static,
	R: Send + Sync + 'static,
	E: Send + Sync + 'static,
{
	/// Wrap `handler` and allocate its `done_data`/`fail_data` pair
	pub fn new<F, Fut>(handler: F) -> Self
	where
		F: Fn(P) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<R, E>> + Send + 'static,
	{
		Self {
			handler: Arc::new(move |payload| Box::pin(handler(payload))),
			done_data: Event::new(),
			fail_data: Event::new(),
		}
	}

	/// Start the wrapped callback with `payload`
	///
	/// Returns immediately; the callback and the settlement relay run as a
	/// task on the ambient tokio runtime (calling `run` outside one panics,
	/// per [`tokio::spawn`]). The returned handle may be dropped (the task
	/// keeps running detached) or awaited to observe settlement.
	///
	/// On `Ok(value)` the relay emits `done_data(value)`; on `Err(error)` it
	/// emits `fail_data(error)`. A failure nobody consumes is logged and
	/// otherwise swallowed.
	pub fn run(&self, payload: P) -> JoinHandle<()> {
		let work = (self.handler)(payload);
		let done_data = self.done_data.clone();
		let fail_data = self.fail_data.clone();
		tokio::spawn(async move {
			match work.await {
				Ok(value) => {
					tracing::debug!(event = ?done_data.id(), "effect resolved");
					done_data.emit(value);
				}
				Err(error) => {
					if fail_data.has_listeners() {
						tracing::debug!(event = ?fail_data.id(), "effect failed");
					} else {
						tracing::warn!(
							event = ?fail_data.id(),
							"effect failed with no fail_data consumer"
						);
					}
					fail_data.emit(error);
				}
			}
		})
	}

	/// Event fired with the success value of each settled invocation
	pub fn done_data(&self) -> &Event<R> {
		&self.done_data
	}

	/// Event fired with the error value of each failed invocation
	pub fn fail_data(&self) -> &Event<E> {
		&self.fail_data
	}
}

impl<P, R, E> std::fmt::Debug for Effect<P, R, E> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Effect")
			.field("done_data", &self.done_data.id())
			.field("fail_data", &self.fail_data.id())
			.finish()
	}
}
