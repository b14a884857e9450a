//! Incoming HTTP request.

mod params;

use bytes::Bytes;
use hyper::{HeaderMap, Method, Uri, Version};
use std::collections::HashMap;
use std::net::SocketAddr;

use crate::{Error, Extensions, Result};

/// An HTTP request with a fully collected body.
///
/// Bodies are collected up front by the server, so handlers can read
/// [`Request::body`] synchronously.
#[derive(Debug)]
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub version: Version,
	pub headers: HeaderMap,
	pub body: Bytes,
	/// Peer address of the TCP connection, when known.
	pub remote_addr: Option<SocketAddr>,
	/// Parameters captured from the route pattern.
	pub path_params: HashMap<String, String>,
	/// Raw (still percent-encoded) query parameters.
	pub query_params: HashMap<String, String>,
	pub extensions: Extensions,
}

impl Request {
	/// Creates a request from already-parsed parts.
	pub fn new(
		method: Method,
		uri: Uri,
		version: Version,
		headers: HeaderMap,
		body: Bytes,
	) -> Self {
		let query_params = Self::parse_query_params(&uri);
		Self {
			method,
			uri,
			version,
			headers,
			body,
			remote_addr: None,
			path_params: HashMap::new(),
			query_params,
			extensions: Extensions::new(),
		}
	}

	/// Starts building a request.
	///
	/// # Examples
	///
	/// ```
	/// use formpress_http::Request;
	/// use hyper::Method;
	///
	/// let request = Request::builder()
	///     .method(Method::POST)
	///     .uri("/api/public/v1/embeds/abc/submissions?lang=en")
	///     .body("name=Ada")
	///     .build()
	///     .unwrap();
	///
	/// assert_eq!(request.method, Method::POST);
	/// assert_eq!(request.query_params.get("lang"), Some(&"en".to_string()));
	/// ```
	pub fn builder() -> RequestBuilder {
		RequestBuilder::default()
	}
}

/// Builder for [`Request`].
#[derive(Debug, Default)]
pub struct RequestBuilder {
	method: Option<Method>,
	uri: Option<String>,
	version: Option<Version>,
	headers: HeaderMap,
	body: Bytes,
	remote_addr: Option<SocketAddr>,
}

impl RequestBuilder {
	pub fn method(mut self, method: Method) -> Self {
		self.method = Some(method);
		self
	}

	pub fn uri(mut self, uri: impl Into<String>) -> Self {
		self.uri = Some(uri.into());
		self
	}

	pub fn version(mut self, version: Version) -> Self {
		self.version = Some(version);
		self
	}

	pub fn headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;
		self
	}

	/// Appends a single header. Invalid names or values are ignored.
	pub fn header(mut self, name: &str, value: &str) -> Self {
		if let (Ok(name), Ok(value)) = (
			hyper::header::HeaderName::from_bytes(name.as_bytes()),
			hyper::header::HeaderValue::from_str(value),
		) {
			self.headers.append(name, value);
		}
		self
	}

	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	pub fn remote_addr(mut self, addr: SocketAddr) -> Self {
		self.remote_addr = Some(addr);
		self
	}

	/// Finishes the request.
	///
	/// # Errors
	///
	/// Returns [`Error::BadRequest`] if the URI cannot be parsed.
	pub fn build(self) -> Result<Request> {
		let uri: Uri = self
			.uri
			.as_deref()
			.unwrap_or("/")
			.parse()
			.map_err(|e| Error::BadRequest(format!("invalid uri: {}", e)))?;
		let mut request = Request::new(
			self.method.unwrap_or(Method::GET),
			uri,
			self.version.unwrap_or(Version::HTTP_11),
			self.headers,
			self.body,
		);
		request.remote_addr = self.remote_addr;
		Ok(request)
	}
}
