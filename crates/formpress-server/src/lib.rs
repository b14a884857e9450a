//! HTTP server for formpress.
//!
//! A thin HTTP/1.1 server on top of hyper that feeds collected requests into
//! a [`formpress_http::Handler`]. It enforces a body size limit, a header
//! read timeout and an overall request timeout, and supports graceful
//! shutdown through [`ShutdownCoordinator`].
//!
//! ## Basic Usage
//!
//! ```rust,ignore
//! use formpress_server::{HttpServer, ShutdownCoordinator, shutdown_signal};
//! use std::time::Duration;
//!
//! let coordinator = ShutdownCoordinator::new(Duration::from_secs(10));
//! let server = HttpServer::new(handler);
//!
//! tokio::select! {
//!     result = server.listen_with_shutdown(addr, coordinator.clone()) => result?,
//!     _ = shutdown_signal() => {
//!         coordinator.shutdown();
//!         coordinator.wait_for_shutdown().await;
//!     }
//! }
//! ```

pub mod http;
pub mod shutdown;
pub mod timeout;

pub use http::{DEFAULT_MAX_BODY_BYTES, HttpServer, ServerLimits, serve, serve_with_shutdown};
pub use shutdown::{ConnectionGuard, ShutdownCoordinator, shutdown_signal};
pub use timeout::TimeoutHandler;
