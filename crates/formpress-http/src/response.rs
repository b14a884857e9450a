use bytes::Bytes;
use hyper::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use hyper::{HeaderMap, StatusCode};
use serde::Serialize;

/// HTTP Response representation
#[derive(Debug)]
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
	/// When true, the middleware chain returns this response without
	/// running the remaining middleware or the handler.
	stop_chain: bool,
}

impl Response {
	/// Create a new Response with the given status code
	///
	/// # Examples
	///
	/// ```
	/// use formpress_http::Response;
	/// use hyper::StatusCode;
	///
	/// let response = Response::new(StatusCode::ACCEPTED);
	/// assert_eq!(response.status, StatusCode::ACCEPTED);
	/// assert!(response.body.is_empty());
	/// ```
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
			stop_chain: false,
		}
	}

	/// Create a Response with HTTP 200 OK status
	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	/// Create a Response with HTTP 204 No Content status
	pub fn no_content() -> Self {
		Self::new(StatusCode::NO_CONTENT)
	}

	/// Create a Response with HTTP 400 Bad Request status
	pub fn bad_request() -> Self {
		Self::new(StatusCode::BAD_REQUEST)
	}

	/// Create a Response with HTTP 404 Not Found status
	pub fn not_found() -> Self {
		Self::new(StatusCode::NOT_FOUND)
	}

	/// Create a Response with HTTP 500 Internal Server Error status
	pub fn internal_server_error() -> Self {
		Self::new(StatusCode::INTERNAL_SERVER_ERROR)
	}

	/// Set the response body
	///
	/// # Examples
	///
	/// ```
	/// use formpress_http::Response;
	/// use bytes::Bytes;
	///
	/// let response = Response::ok().with_body("<form></form>");
	/// assert_eq!(response.body, Bytes::from("<form></form>"));
	/// ```
	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Add a header to the response, replacing any existing value.
	///
	/// Names or values that are not valid HTTP tokens are ignored.
	///
	/// # Examples
	///
	/// ```
	/// use formpress_http::Response;
	///
	/// let response = Response::ok().with_header("X-Form-Language", "en");
	/// assert_eq!(
	///     response.headers.get("x-form-language").unwrap().to_str().unwrap(),
	///     "en"
	/// );
	/// ```
	pub fn with_header(mut self, name: &str, value: &str) -> Self {
		if let (Ok(name), Ok(value)) = (
			HeaderName::from_bytes(name.as_bytes()),
			HeaderValue::from_str(value),
		) {
			self.headers.insert(name, value);
		}
		self
	}

	/// Set the Content-Type header.
	pub fn with_content_type(self, content_type: &str) -> Self {
		self.with_header(CONTENT_TYPE.as_str(), content_type)
	}

	/// Serialize `data` as the JSON body and set `Content-Type: application/json`.
	///
	/// # Examples
	///
	/// ```
	/// use formpress_http::Response;
	/// use serde_json::json;
	///
	/// let response = Response::ok().with_json(&json!({"success": true})).unwrap();
	/// assert_eq!(
	///     response.headers.get("content-type").unwrap().to_str().unwrap(),
	///     "application/json"
	/// );
	/// assert_eq!(response.body, r#"{"success":true}"#);
	/// ```
	pub fn with_json<T: Serialize>(mut self, data: &T) -> crate::Result<Self> {
		let json = serde_json::to_vec(data)?;
		self.body = Bytes::from(json);
		self.headers
			.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		Ok(self)
	}

	/// Check if this response should stop the middleware chain
	pub fn should_stop_chain(&self) -> bool {
		self.stop_chain
	}

	/// Set whether this response should stop the middleware chain
	///
	/// Used for early returns such as CORS preflight answers.
	///
	/// # Examples
	///
	/// ```
	/// use formpress_http::Response;
	///
	/// let preflight = Response::no_content()
	///     .with_header("Access-Control-Allow-Origin", "https://example.com")
	///     .with_stop_chain(true);
	/// assert!(preflight.should_stop_chain());
	/// ```
	pub fn with_stop_chain(mut self, stop: bool) -> Self {
		self.stop_chain = stop;
		self
	}

	/// Body as UTF-8 text, replacing invalid sequences.
	pub fn body_text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}

impl From<crate::Error> for Response {
	fn from(error: crate::Error) -> Self {
		Response::new(error.status())
			.with_json(&error.to_json())
			.unwrap_or_else(|_| Response::internal_server_error())
	}
}
