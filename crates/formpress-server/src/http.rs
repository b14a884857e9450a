use bytes::Bytes;
use formpress_http::{Error, Handler, Middleware, MiddlewareChain, Request, Response};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::Service;
use hyper_util::rt::{TokioIo, TokioTimer};
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;

use crate::shutdown::ShutdownCoordinator;
use crate::timeout::TimeoutHandler;

/// Default request body limit (10 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Connection-level limits applied by [`HttpServer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerLimits {
	/// Largest accepted request body. Larger bodies get a 413.
	pub max_body_bytes: usize,
	/// Time allowed for a client to send the request head.
	pub header_read_timeout: Duration,
	/// Upper bound for producing a response, if any.
	pub request_timeout: Option<Duration>,
}

impl Default for ServerLimits {
	fn default() -> Self {
		Self {
			max_body_bytes: DEFAULT_MAX_BODY_BYTES,
			header_read_timeout: Duration::from_secs(10),
			request_timeout: Some(Duration::from_secs(60)),
		}
	}
}

/// HTTP Server with middleware support
pub struct HttpServer {
	pub handler: Arc<dyn Handler>,
	pub(crate) middlewares: Vec<Arc<dyn Middleware>>,
	limits: ServerLimits,
}

impl HttpServer {
	/// Create a new server with the given handler
	///
	/// # Examples
	///
	/// ```
	/// use std::sync::Arc;
	/// use formpress_server::HttpServer;
	/// use formpress_http::{Handler, Request, Response, Result};
	///
	/// struct Ping;
	///
	/// #[async_trait::async_trait]
	/// impl Handler for Ping {
	///     async fn handle(&self, _req: Request) -> Result<Response> {
	///         Ok(Response::ok().with_body("pong"))
	///     }
	/// }
	///
	/// let server = HttpServer::new(Arc::new(Ping));
	/// assert_eq!(server.limits().max_body_bytes, 10 * 1024 * 1024);
	/// ```
	pub fn new(handler: Arc<dyn Handler>) -> Self {
		Self {
			handler,
			middlewares: Vec::new(),
			limits: ServerLimits::default(),
		}
	}

	/// Add a middleware. The first middleware added runs outermost.
	pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
		self.middlewares.push(middleware);
		self
	}

	/// Replace the connection limits.
	pub fn with_limits(mut self, limits: ServerLimits) -> Self {
		self.limits = limits;
		self
	}

	pub fn limits(&self) -> ServerLimits {
		self.limits
	}

	/// Build the final handler: middleware chain, then the request timeout.
	pub(crate) fn build_handler(&self) -> Arc<dyn Handler> {
		let mut handler = self.handler.clone();

		if !self.middlewares.is_empty() {
			let mut chain = MiddlewareChain::new(handler);
			for middleware in &self.middlewares {
				chain.add_middleware(middleware.clone());
			}
			handler = Arc::new(chain);
		}

		if let Some(timeout) = self.limits.request_timeout {
			handler = Arc::new(TimeoutHandler::new(handler, timeout));
		}

		handler
	}

	/// Start the server and listen on the given address until an error occurs.
	pub async fn listen(self, addr: SocketAddr) -> std::io::Result<()> {
		let listener = TcpListener::bind(addr).await?;
		tracing::info!(addr = %addr, "server listening");

		let handler = self.build_handler();
		let limits = self.limits;

		loop {
			let (stream, socket_addr) = listener.accept().await?;
			let handler = handler.clone();

			tokio::task::spawn(async move {
				if let Err(err) =
					Self::handle_connection(stream, socket_addr, handler, limits, None).await
				{
					tracing::debug!(peer = %socket_addr, error = %err, "connection error");
				}
			});
		}
	}

	/// Bind `addr` and serve until `coordinator` signals shutdown.
	///
	/// # Examples
	///
	/// ```no_run
	/// use std::sync::Arc;
	/// use std::time::Duration;
	/// use formpress_server::{HttpServer, ShutdownCoordinator};
	/// use formpress_http::{Handler, Request, Response, Result};
	///
	/// struct Ping;
	///
	/// #[async_trait::async_trait]
	/// impl Handler for Ping {
	///     async fn handle(&self, _req: Request) -> Result<Response> {
	///         Ok(Response::ok())
	///     }
	/// }
	///
	/// # async fn example() -> std::io::Result<()> {
	/// let coordinator = ShutdownCoordinator::new(Duration::from_secs(10));
	/// HttpServer::new(Arc::new(Ping))
	///     .listen_with_shutdown("127.0.0.1:9200".parse().unwrap(), coordinator)
	///     .await?;
	/// # Ok(())
	/// # }
	/// ```
	pub async fn listen_with_shutdown(
		self,
		addr: SocketAddr,
		coordinator: ShutdownCoordinator,
	) -> std::io::Result<()> {
		let listener = TcpListener::bind(addr).await?;
		tracing::info!(addr = %addr, "server listening");
		self.serve_listener(listener, coordinator).await
	}

	/// Serve connections from an already bound listener until shutdown.
	///
	/// On shutdown the accept loop stops and every open connection is asked
	/// to finish its current request before closing.
	pub async fn serve_listener(
		self,
		listener: TcpListener,
		coordinator: ShutdownCoordinator,
	) -> std::io::Result<()> {
		let handler = self.build_handler();
		let limits = self.limits;
		let mut shutdown_rx = coordinator.subscribe();

		if coordinator.is_shutting_down() {
			coordinator.notify_shutdown_complete();
			return Ok(());
		}

		loop {
			tokio::select! {
				result = listener.accept() => {
					let (stream, socket_addr) = match result {
						Ok(accepted) => accepted,
						Err(err) => {
							tracing::warn!(error = %err, "failed to accept connection");
							continue;
						}
					};
					let handler = handler.clone();
					let conn_shutdown = coordinator.subscribe();
					let guard = coordinator.track_connection();

					tokio::task::spawn(async move {
						let _guard = guard;
						if let Err(err) = Self::handle_connection(
							stream,
							socket_addr,
							handler,
							limits,
							Some(conn_shutdown),
						)
						.await
						{
							tracing::debug!(peer = %socket_addr, error = %err, "connection error");
						}
					});
				}
				_ = shutdown_rx.recv() => {
					tracing::info!("shutdown signal received, no longer accepting connections");
					break;
				}
			}
		}

		coordinator.notify_shutdown_complete();
		Ok(())
	}

	/// Serve HTTP/1.1 requests on a single TCP connection.
	pub async fn handle_connection(
		stream: TcpStream,
		socket_addr: SocketAddr,
		handler: Arc<dyn Handler>,
		limits: ServerLimits,
		shutdown: Option<broadcast::Receiver<()>>,
	) -> Result<(), hyper::Error> {
		let io = TokioIo::new(stream);
		let service = RequestService {
			handler,
			remote_addr: socket_addr,
			max_body_bytes: limits.max_body_bytes,
		};

		let mut builder = http1::Builder::new();
		builder
			.timer(TokioTimer::new())
			.header_read_timeout(limits.header_read_timeout);
		let conn = builder.serve_connection(io, service);
		tokio::pin!(conn);

		let stop = async move {
			match shutdown {
				Some(mut rx) => {
					let _ = rx.recv().await;
				}
				None => std::future::pending::<()>().await,
			}
		};

		tokio::select! {
			result = conn.as_mut() => result,
			_ = stop => {
				conn.as_mut().graceful_shutdown();
				conn.as_mut().await
			}
		}
	}
}

/// Service implementation for hyper
struct RequestService {
	handler: Arc<dyn Handler>,
	remote_addr: SocketAddr,
	max_body_bytes: usize,
}

impl Service<hyper::Request<Incoming>> for RequestService {
	type Response = hyper::Response<Full<Bytes>>;
	type Error = Infallible;
	type Future =
		Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

	fn call(&self, req: hyper::Request<Incoming>) -> Self::Future {
		let handler = self.handler.clone();
		let remote_addr = self.remote_addr;
		let max_body_bytes = self.max_body_bytes;

		Box::pin(async move {
			let (parts, body) = req.into_parts();

			let body_bytes = match Limited::new(body, max_body_bytes).collect().await {
				Ok(collected) => collected.to_bytes(),
				Err(err) => {
					let error = if err.downcast_ref::<LengthLimitError>().is_some() {
						Error::PayloadTooLarge("request body too large".into())
					} else {
						Error::BadRequest("failed to read request body".into())
					};
					tracing::warn!(peer = %remote_addr, error = %err, "rejected request body");
					return Ok(into_hyper_response(Response::from(error)));
				}
			};

			let mut request = Request::new(
				parts.method,
				parts.uri,
				parts.version,
				parts.headers,
				body_bytes,
			);
			request.remote_addr = Some(remote_addr);

			let response = match handler.handle(request).await {
				Ok(response) => response,
				Err(err) => {
					if err.status_code() >= 500 {
						tracing::error!(error = %err, "request failed");
					}
					Response::from(err)
				}
			};

			Ok(into_hyper_response(response))
		})
	}
}

fn into_hyper_response(response: Response) -> hyper::Response<Full<Bytes>> {
	let mut hyper_response = hyper::Response::new(Full::new(response.body));
	*hyper_response.status_mut() = response.status;
	*hyper_response.headers_mut() = response.headers;
	hyper_response
}

/// Create a server for `handler` and listen on `addr`.
pub async fn serve(addr: SocketAddr, handler: Arc<dyn Handler>) -> std::io::Result<()> {
	HttpServer::new(handler).listen(addr).await
}

/// Create a server for `handler` and listen on `addr` until shutdown.
pub async fn serve_with_shutdown(
	addr: SocketAddr,
	handler: Arc<dyn Handler>,
	coordinator: ShutdownCoordinator,
) -> std::io::Result<()> {
	HttpServer::new(handler)
		.listen_with_shutdown(addr, coordinator)
		.await
}
