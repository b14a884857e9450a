//! Graceful shutdown coordination.
//!
//! A [`ShutdownCoordinator`] is shared between the accept loop, every
//! connection task and whoever listens for OS signals. Calling
//! [`ShutdownCoordinator::shutdown`] stops the accept loop and asks open
//! connections to finish their in-flight request. [`wait_for_shutdown`]
//! then waits for those connections, bounded by the configured timeout.
//!
//! [`wait_for_shutdown`]: ShutdownCoordinator::wait_for_shutdown

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{Notify, broadcast};

#[derive(Debug)]
struct Inner {
	timeout: Duration,
	signal: broadcast::Sender<()>,
	triggered: AtomicBool,
	stopped_accepting: AtomicBool,
	active: AtomicUsize,
	idle: Notify,
	accept_done: Notify,
}

/// Cloneable handle that coordinates shutdown across tasks.
#[derive(Debug, Clone)]
pub struct ShutdownCoordinator {
	inner: Arc<Inner>,
}

impl ShutdownCoordinator {
	/// Creates a coordinator that waits at most `timeout` for open
	/// connections once shutdown starts.
	///
	/// # Examples
	///
	/// ```
	/// use formpress_server::ShutdownCoordinator;
	/// use std::time::Duration;
	///
	/// let coordinator = ShutdownCoordinator::new(Duration::from_secs(10));
	/// assert!(!coordinator.is_shutting_down());
	/// assert_eq!(coordinator.active_connections(), 0);
	/// ```
	pub fn new(timeout: Duration) -> Self {
		let (signal, _) = broadcast::channel(1);
		Self {
			inner: Arc::new(Inner {
				timeout,
				signal,
				triggered: AtomicBool::new(false),
				stopped_accepting: AtomicBool::new(false),
				active: AtomicUsize::new(0),
				idle: Notify::new(),
				accept_done: Notify::new(),
			}),
		}
	}

	/// Subscribes to the shutdown signal.
	pub fn subscribe(&self) -> broadcast::Receiver<()> {
		self.inner.signal.subscribe()
	}

	/// Starts shutdown. Calling it more than once has no further effect.
	pub fn shutdown(&self) {
		if !self.inner.triggered.swap(true, Ordering::SeqCst) {
			tracing::info!("shutdown requested");
			// No receivers simply means nothing is listening yet
			let _ = self.inner.signal.send(());
		}
	}

	/// Whether shutdown has been requested.
	pub fn is_shutting_down(&self) -> bool {
		self.inner.triggered.load(Ordering::SeqCst)
	}

	/// Called by the accept loop once it no longer accepts connections.
	pub fn notify_shutdown_complete(&self) {
		self.inner.stopped_accepting.store(true, Ordering::SeqCst);
		self.inner.accept_done.notify_waiters();
	}

	/// Registers an open connection. The returned guard unregisters it on drop.
	pub fn track_connection(&self) -> ConnectionGuard {
		self.inner.active.fetch_add(1, Ordering::SeqCst);
		ConnectionGuard {
			inner: self.inner.clone(),
		}
	}

	/// Number of connections currently registered.
	pub fn active_connections(&self) -> usize {
		self.inner.active.load(Ordering::SeqCst)
	}

	/// Grace period allowed for open connections.
	pub fn timeout(&self) -> Duration {
		self.inner.timeout
	}

	/// Waits until the accept loop stopped and every connection drained.
	///
	/// Returns `true` if draining finished before the timeout.
	pub async fn wait_for_shutdown(&self) -> bool {
		let drained = async {
			loop {
				let accept_done = self.inner.accept_done.notified();
				if self.inner.stopped_accepting.load(Ordering::SeqCst) {
					break;
				}
				accept_done.await;
			}
			loop {
				let idle = self.inner.idle.notified();
				if self.inner.active.load(Ordering::SeqCst) == 0 {
					break;
				}
				idle.await;
			}
		};

		match tokio::time::timeout(self.inner.timeout, drained).await {
			Ok(()) => {
				tracing::info!("all connections drained");
				true
			}
			Err(_) => {
				tracing::warn!(
					remaining = self.active_connections(),
					timeout_secs = self.inner.timeout.as_secs(),
					"shutdown timeout elapsed with open connections"
				);
				false
			}
		}
	}
}

/// Keeps a connection counted while alive.
#[derive(Debug)]
pub struct ConnectionGuard {
	inner: Arc<Inner>,
}

impl Drop for ConnectionGuard {
	fn drop(&mut self) {
		if self.inner.active.fetch_sub(1, Ordering::SeqCst) == 1 {
			self.inner.idle.notify_waiters();
		}
	}
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
pub async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(e) = tokio::signal::ctrl_c().await {
			tracing::error!(error = %e, "failed to install Ctrl+C handler");
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
			Ok(mut signal) => {
				signal.recv().await;
			}
			Err(e) => {
				tracing::error!(error = %e, "failed to install SIGTERM handler");
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => tracing::info!("received Ctrl+C, initiating graceful shutdown"),
		_ = terminate => tracing::info!("received SIGTERM, initiating graceful shutdown"),
	}
}
