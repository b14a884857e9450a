//! Log output setup.

use tracing_subscriber::EnvFilter;

/// Installs the global `fmt` subscriber.
///
/// `RUST_LOG` takes precedence over `default_level`. Calling this twice is
/// harmless; the second call keeps the first subscriber.
pub fn init_tracing(default_level: &str) {
	let filter = EnvFilter::try_from_default_env()
		.or_else(|_| EnvFilter::try_new(default_level))
		.unwrap_or_else(|_| EnvFilter::new("info"));

	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(true)
		.try_init();
}
