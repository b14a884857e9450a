//! Handler and middleware traits.
//!
//! A [`Handler`] turns a [`Request`] into a [`Response`]. A [`Middleware`]
//! wraps the next handler and can inspect or rewrite both sides of the
//! exchange. [`MiddlewareChain`] nests middleware around a final handler in
//! registration order, so the first middleware added is the outermost.
//!
//! ```rust
//! use formpress_http::{Handler, Middleware, Request, Response, Result};
//! use async_trait::async_trait;
//! use std::sync::Arc;
//!
//! struct Tagging;
//!
//! #[async_trait]
//! impl Middleware for Tagging {
//!     async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
//!         let response = next.handle(request).await?;
//!         Ok(response.with_header("X-Served-By", "formpress"))
//!     }
//! }
//! ```

use async_trait::async_trait;
use std::sync::Arc;

use crate::{Request, Response, Result};

/// Handler trait for processing requests.
#[async_trait]
pub trait Handler: Send + Sync {
	/// Handles an HTTP request and produces a response.
	///
	/// # Errors
	///
	/// Returns an error if the request cannot be processed. The server turns
	/// the error into a JSON error response.
	async fn handle(&self, request: Request) -> Result<Response>;
}

#[async_trait]
impl<T: Handler + ?Sized> Handler for Arc<T> {
	async fn handle(&self, request: Request) -> Result<Response> {
		(**self).handle(request).await
	}
}

/// Middleware trait for request/response processing.
#[async_trait]
pub trait Middleware: Send + Sync {
	/// Processes a request, usually by calling `next` and adjusting the result.
	///
	/// # Errors
	///
	/// Returns an error if the middleware or next handler fails.
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response>;

	/// Whether this middleware applies to the request at all.
	///
	/// Skipped middleware is removed from the chain for this request only.
	fn should_continue(&self, _request: &Request) -> bool {
		true
	}
}

/// Composes middleware around a final handler.
pub struct MiddlewareChain {
	middlewares: Vec<Arc<dyn Middleware>>,
	handler: Arc<dyn Handler>,
}

impl MiddlewareChain {
	/// Creates a chain with no middleware.
	pub fn new(handler: Arc<dyn Handler>) -> Self {
		Self {
			middlewares: Vec::new(),
			handler,
		}
	}

	/// Adds a middleware using builder pattern.
	pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
		self.middlewares.push(middleware);
		self
	}

	/// Adds a middleware.
	pub fn add_middleware(&mut self, middleware: Arc<dyn Middleware>) {
		self.middlewares.push(middleware);
	}

	/// Number of registered middleware.
	pub fn len(&self) -> usize {
		self.middlewares.len()
	}

	/// Returns `true` when only the final handler is registered.
	pub fn is_empty(&self) -> bool {
		self.middlewares.is_empty()
	}
}

#[async_trait]
impl Handler for MiddlewareChain {
	async fn handle(&self, request: Request) -> Result<Response> {
		if self.middlewares.is_empty() {
			return self.handler.handle(request).await;
		}

		// Wrap from the innermost outwards, leaving out middleware that opts
		// out for this request.
		let mut current: Arc<dyn Handler> = self.handler.clone();
		for middleware in self
			.middlewares
			.iter()
			.rev()
			.filter(|mw| mw.should_continue(&request))
		{
			current = Arc::new(ComposedHandler {
				middleware: middleware.clone(),
				next: current,
			});
		}

		current.handle(request).await
	}
}

struct ComposedHandler {
	middleware: Arc<dyn Middleware>,
	next: Arc<dyn Handler>,
}

#[async_trait]
impl Handler for ComposedHandler {
	async fn handle(&self, request: Request) -> Result<Response> {
		self.middleware.process(request, self.next.clone()).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Error;
	use hyper::{Method, StatusCode};
	use rstest::rstest;

	struct EchoPath;

	#[async_trait]
	impl Handler for EchoPath {
		async fn handle(&self, request: Request) -> Result<Response> {
			Ok(Response::ok().with_body(request.path().to_string()))
		}
	}

	struct Prefix(&'static str);

	#[async_trait]
	impl Middleware for Prefix {
		async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
			let response = next.handle(request).await?;
			let body = format!("{}{}", self.0, response.body_text());
			Ok(response.with_body(body))
		}
	}

	// Applies only to API paths
	struct ApiOnly;

	#[async_trait]
	impl Middleware for ApiOnly {
		async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
			let response = next.handle(request).await?;
			Ok(response.with_header("X-Api", "1"))
		}

		fn should_continue(&self, request: &Request) -> bool {
			request.path().starts_with("/api/")
		}
	}

	struct Preflight;

	#[async_trait]
	impl Middleware for Preflight {
		async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
			if request.method == Method::OPTIONS {
				return Ok(Response::no_content().with_stop_chain(true));
			}
			next.handle(request).await
		}
	}

	struct Failing;

	#[async_trait]
	impl Handler for Failing {
		async fn handle(&self, _request: Request) -> Result<Response> {
			Err(Error::NotFound("form not found".into()))
		}
	}

	fn request(method: Method, uri: &str) -> Request {
		Request::builder().method(method).uri(uri).build().unwrap()
	}

	#[rstest]
	#[tokio::test]
	async fn test_empty_chain_calls_handler() {
		// Arrange
		let chain = MiddlewareChain::new(Arc::new(EchoPath));

		// Act
		let response = chain.handle(request(Method::GET, "/f/1")).await.unwrap();

		// Assert
		assert!(chain.is_empty());
		assert_eq!(response.body_text(), "/f/1");
	}

	#[rstest]
	#[tokio::test]
	async fn test_first_added_is_outermost() {
		// Arrange
		let chain = MiddlewareChain::new(Arc::new(EchoPath))
			.with_middleware(Arc::new(Prefix("outer:")))
			.with_middleware(Arc::new(Prefix("inner:")));

		// Act
		let response = chain.handle(request(Method::GET, "/x")).await.unwrap();

		// Assert
		assert_eq!(chain.len(), 2);
		assert_eq!(response.body_text(), "outer:inner:/x");
	}

	#[rstest]
	#[case("/api/public/v1/embeds/1/data", true)]
	#[case("/embedv1.js", false)]
	#[tokio::test]
	async fn test_should_continue_skips_middleware(#[case] path: &str, #[case] applied: bool) {
		// Arrange
		let mut chain = MiddlewareChain::new(Arc::new(EchoPath));
		chain.add_middleware(Arc::new(ApiOnly));

		// Act
		let response = chain.handle(request(Method::GET, path)).await.unwrap();

		// Assert
		assert_eq!(response.headers.contains_key("x-api"), applied);
	}

	#[rstest]
	#[tokio::test]
	async fn test_early_return_skips_inner_layers() {
		// Arrange
		let chain = MiddlewareChain::new(Arc::new(EchoPath))
			.with_middleware(Arc::new(Preflight))
			.with_middleware(Arc::new(Prefix("inner:")));

		// Act
		let response = chain.handle(request(Method::OPTIONS, "/x")).await.unwrap();

		// Assert
		assert_eq!(response.status, StatusCode::NO_CONTENT);
		assert!(response.should_stop_chain());
		assert!(response.body.is_empty());
	}

	#[rstest]
	#[tokio::test]
	async fn test_handler_error_propagates_through_chain() {
		// Arrange
		let chain = MiddlewareChain::new(Arc::new(Failing)).with_middleware(Arc::new(Prefix("p:")));

		// Act
		let result = chain.handle(request(Method::GET, "/x")).await;

		// Assert
		assert_eq!(result.unwrap_err(), Error::NotFound("form not found".into()));
	}
}
