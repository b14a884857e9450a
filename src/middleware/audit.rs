//! Request id and client address resolution.

use async_trait::async_trait;
use formpress_http::{Handler, Middleware, Request, Response, Result};
use std::sync::Arc;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Per-request audit data, stored in the request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
	pub request_id: String,
	pub client_ip: String,
}

/// `req_` followed by 16 hex characters.
pub fn generate_request_id() -> String {
	let hex = Uuid::new_v4().simple().to_string();
	format!("req_{}", &hex[..16])
}

/// Client address, preferring proxy headers over the peer address.
///
/// The first `X-Forwarded-For` entry wins, then `X-Real-IP`, then
/// `CF-Connecting-IP`.
pub fn client_ip(request: &Request) -> String {
	let forwarded = request
		.header("x-forwarded-for")
		.and_then(|v| v.split(',').next())
		.map(str::trim);

	forwarded
		.into_iter()
		.chain(request.header("x-real-ip").map(str::trim))
		.chain(request.header("cf-connecting-ip").map(str::trim))
		.find(|ip| !ip.is_empty())
		.map(str::to_string)
		.or_else(|| request.remote_addr.map(|addr| addr.ip().to_string()))
		.unwrap_or_default()
}

/// Tags each request with a [`RequestContext`] and echoes the request id.
///
/// Errors from inner layers are turned into responses here so that every
/// response carries the id.
#[derive(Debug, Default)]
pub struct AuditMiddleware;

#[async_trait]
impl Middleware for AuditMiddleware {
	async fn process(&self, mut request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let request_id = request
			.header(REQUEST_ID_HEADER)
			.map(str::trim)
			.filter(|id| !id.is_empty())
			.map(str::to_string)
			.unwrap_or_else(generate_request_id);
		let client_ip = client_ip(&request);
		request.extensions.insert(RequestContext {
			request_id: request_id.clone(),
			client_ip,
		});

		let response = next.handle(request).await.unwrap_or_else(Response::from);
		Ok(response.with_header(REQUEST_ID_HEADER, &request_id))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use formpress_http::Error;
	use rstest::rstest;
	use std::net::SocketAddr;

	struct Inspect;

	#[async_trait]
	impl Handler for Inspect {
		async fn handle(&self, request: Request) -> Result<Response> {
			let ctx = request.extensions.get::<RequestContext>().unwrap();
			Ok(Response::ok().with_body(ctx.client_ip.clone()))
		}
	}

	struct Failing;

	#[async_trait]
	impl Handler for Failing {
		async fn handle(&self, _request: Request) -> Result<Response> {
			Err(Error::NotFound("not found".into()))
		}
	}

	fn peer() -> SocketAddr {
		"192.0.2.10:51234".parse().unwrap()
	}

	#[rstest]
	#[case(&[("X-Forwarded-For", "203.0.113.1, 10.0.0.1"), ("X-Real-IP", "198.51.100.2")], "203.0.113.1")]
	#[case(&[("X-Real-IP", "198.51.100.2"), ("CF-Connecting-IP", "198.51.100.3")], "198.51.100.2")]
	#[case(&[("CF-Connecting-IP", "198.51.100.3")], "198.51.100.3")]
	#[case(&[], "192.0.2.10")]
	fn test_client_ip(#[case] headers: &[(&str, &str)], #[case] expected: &str) {
		// Arrange
		let mut builder = Request::builder().remote_addr(peer());
		for (name, value) in headers {
			builder = builder.header(name, value);
		}
		let request = builder.build().unwrap();

		// Act & Assert
		assert_eq!(client_ip(&request), expected);
	}

	#[rstest]
	fn test_generate_request_id_shape() {
		// Act
		let id = generate_request_id();

		// Assert
		assert_eq!(id.len(), 20);
		assert!(id.starts_with("req_"));
		assert!(id[4..].chars().all(|c| c.is_ascii_hexdigit()));
	}

	#[rstest]
	#[tokio::test]
	async fn test_incoming_request_id_is_echoed() {
		// Arrange
		let request = Request::builder()
			.header("X-Request-Id", "trace-123")
			.remote_addr(peer())
			.build()
			.unwrap();

		// Act
		let response = AuditMiddleware.process(request, Arc::new(Inspect)).await.unwrap();

		// Assert
		assert_eq!(response.headers.get("x-request-id").unwrap(), "trace-123");
		assert_eq!(response.body_text(), "192.0.2.10");
	}

	#[rstest]
	#[tokio::test]
	async fn test_errors_become_responses_with_id() {
		// Arrange
		let request = Request::builder().build().unwrap();

		// Act
		let response = AuditMiddleware.process(request, Arc::new(Failing)).await.unwrap();

		// Assert
		assert_eq!(response.status.as_u16(), 404);
		let id = response.headers.get("x-request-id").unwrap().to_str().unwrap();
		assert!(id.starts_with("req_"));
	}
}
