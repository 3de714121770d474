//! Title management walk-through
//!
//! A terminal rendition of the classic "title" app: a store holding the
//! current title, events to set and reset it, and effects that load a new
//! title asynchronously (one succeeding, one failing). The store binding
//! plays the role of the UI layer and re-renders on every change.
//!
//! Run with `RUST_LOG=debug` to watch the dispatch diagnostics.

use std::time::Duration;

use grappelli::{Effect, Event, Store, StoreBinding};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Error)]
enum TitleError {
	#[error("title could not be loaded")]
	Unavailable,
}

async fn sleep_ms(ms: u64) {
	tokio::time::sleep(Duration::from_millis(ms)).await;
}

#[tokio::main]
async fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	let set_title = Event::<String>::new();
	let reset_title = Event::<()>::new();

	let load_title = Effect::new(|()| async {
		sleep_ms(300).await;
		Ok::<_, TitleError>(String::from("loaded title"))
	});
	let load_title_broken = Effect::new(|()| async {
		sleep_ms(300).await;
		Err::<String, _>(TitleError::Unavailable)
	});

	let title = Store::new(String::from("default title"));
	title
		.on(&set_title, |_, next| next.clone())
		.on(load_title.done_data(), |_, loaded| loaded.clone())
		.on(load_title_broken.fail_data(), |_, _| String::from("some error"))
		.reset(&reset_title);

	// Side-channel logging, the way the original app watched setTitle.
	let set_log = set_title.watch(|next| tracing::info!(%next, "set_title"));

	// The "UI": re-render the title line on every dispatch.
	let binding = StoreBinding::bind_with(&title, |state| println!("title: {state}"));
	println!("title: {}", binding.current());

	set_title.emit(String::from("hello"));
	reset_title.fire();

	// Fire-and-forget from the app's point of view; awaited here so the
	// walk-through prints in a stable order before exiting.
	let _ = load_title.run(()).await;
	let _ = load_title_broken.run(()).await;

	reset_title.fire();
	println!("final: {}", binding.current());

	set_log.unsubscribe();
}
