//! Cached access to settings.

use parking_lot::RwLock;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::builder::ConfigError;
use crate::settings::Settings;

/// How long loaded settings are reused before reloading.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

type Loader = dyn Fn() -> Result<Settings, ConfigError> + Send + Sync;

struct Cached {
	settings: Arc<Settings>,
	loaded_at: Instant,
}

/// Loads settings lazily and caches them for a fixed TTL.
///
/// Concurrent readers share one cached value. When the entry expires,
/// exactly one caller reloads while the others wait on the write lock and
/// then reuse the fresh value. If a reload fails and a previous value
/// exists, the previous value keeps being served.
pub struct SettingsManager {
	loader: Box<Loader>,
	ttl: Duration,
	cache: RwLock<Option<Cached>>,
}

impl SettingsManager {
	/// Manager that loads through [`Settings::load`].
	pub fn new() -> Self {
		Self::with_loader(DEFAULT_TTL, Settings::load)
	}

	/// Manager with a custom loader and TTL.
	///
	/// # Examples
	///
	/// ```
	/// use formpress_conf::{Settings, SettingsManager};
	/// use std::time::Duration;
	///
	/// let manager = SettingsManager::with_loader(Duration::from_secs(60), || Ok(Settings::default()));
	/// assert_eq!(manager.get().unwrap().server.port, 9200);
	/// ```
	pub fn with_loader<F>(ttl: Duration, loader: F) -> Self
	where
		F: Fn() -> Result<Settings, ConfigError> + Send + Sync + 'static,
	{
		Self {
			loader: Box::new(loader),
			ttl,
			cache: RwLock::new(None),
		}
	}

	pub fn ttl(&self) -> Duration {
		self.ttl
	}

	/// Returns the cached settings, reloading them if expired.
	///
	/// # Errors
	///
	/// Fails only if loading fails and nothing was cached before.
	pub fn get(&self) -> Result<Arc<Settings>, ConfigError> {
		if let Some(cached) = self.cache.read().as_ref()
			&& cached.loaded_at.elapsed() < self.ttl
		{
			return Ok(cached.settings.clone());
		}

		let mut guard = self.cache.write();
		// Another caller may have reloaded while we waited for the lock
		if let Some(cached) = guard.as_ref()
			&& cached.loaded_at.elapsed() < self.ttl
		{
			return Ok(cached.settings.clone());
		}

		match (self.loader)() {
			Ok(settings) => {
				let settings = Arc::new(settings);
				*guard = Some(Cached {
					settings: settings.clone(),
					loaded_at: Instant::now(),
				});
				tracing::debug!("settings reloaded");
				Ok(settings)
			}
			Err(err) => match guard.as_ref() {
				Some(stale) => {
					tracing::warn!(error = %err, "settings reload failed, serving previous values");
					Ok(stale.settings.clone())
				}
				None => Err(err),
			},
		}
	}

	/// Drops the cached value so the next [`get`](Self::get) reloads.
	pub fn invalidate(&self) {
		*self.cache.write() = None;
	}
}

impl Default for SettingsManager {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::sync::atomic::{AtomicU16, AtomicUsize, Ordering};

	fn counting_manager(ttl: Duration) -> (SettingsManager, Arc<AtomicUsize>) {
		let calls = Arc::new(AtomicUsize::new(0));
		let counter = calls.clone();
		let manager = SettingsManager::with_loader(ttl, move || {
			let n = counter.fetch_add(1, Ordering::SeqCst);
			let mut settings = Settings::default();
			settings.server.port = 9200 + n as u16;
			Ok(settings)
		});
		(manager, calls)
	}

	#[rstest]
	fn test_cached_within_ttl() {
		// Arrange
		let (manager, calls) = counting_manager(Duration::from_secs(300));

		// Act
		let first = manager.get().unwrap();
		let second = manager.get().unwrap();

		// Assert
		assert_eq!(calls.load(Ordering::SeqCst), 1);
		assert!(Arc::ptr_eq(&first, &second));
	}

	#[rstest]
	fn test_reloads_after_expiry() {
		// Arrange
		let (manager, calls) = counting_manager(Duration::from_millis(10));
		let first = manager.get().unwrap();

		// Act
		std::thread::sleep(Duration::from_millis(30));
		let second = manager.get().unwrap();

		// Assert
		assert_eq!(calls.load(Ordering::SeqCst), 2);
		assert_eq!(first.server.port, 9200);
		assert_eq!(second.server.port, 9201);
	}

	#[rstest]
	fn test_invalidate_forces_reload() {
		// Arrange
		let (manager, calls) = counting_manager(Duration::from_secs(300));
		manager.get().unwrap();

		// Act
		manager.invalidate();
		manager.get().unwrap();

		// Assert
		assert_eq!(calls.load(Ordering::SeqCst), 2);
	}

	#[rstest]
	fn test_failed_reload_serves_stale_value() {
		// Arrange
		let attempt = Arc::new(AtomicU16::new(0));
		let counter = attempt.clone();
		let manager = SettingsManager::with_loader(Duration::from_millis(5), move || {
			if counter.fetch_add(1, Ordering::SeqCst) == 0 {
				Ok(Settings::default())
			} else {
				Err(ConfigError::Invalid("broken file".into()))
			}
		});
		manager.get().unwrap();
		std::thread::sleep(Duration::from_millis(20));

		// Act
		let settings = manager.get().unwrap();

		// Assert
		assert_eq!(settings.server.port, 9200);
		assert_eq!(attempt.load(Ordering::SeqCst), 2);
	}

	#[rstest]
	fn test_initial_failure_is_returned() {
		// Arrange
		let manager = SettingsManager::with_loader(DEFAULT_TTL, || {
			Err(ConfigError::Invalid("missing".into()))
		});

		// Act
		let result = manager.get();

		// Assert
		assert!(matches!(result, Err(ConfigError::Invalid(_))));
	}

	#[rstest]
	fn test_concurrent_readers_share_single_load() {
		// Arrange
		let (manager, calls) = counting_manager(Duration::from_secs(300));
		let manager = Arc::new(manager);

		// Act
		let handles: Vec<_> = (0..8)
			.map(|_| {
				let manager = manager.clone();
				std::thread::spawn(move || manager.get().unwrap().server.port)
			})
			.collect();
		let ports: Vec<u16> = handles.into_iter().map(|h| h.join().unwrap()).collect();

		// Assert
		assert_eq!(calls.load(Ordering::SeqCst), 1);
		assert!(ports.iter().all(|&p| p == 9200));
	}
}
