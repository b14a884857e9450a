//! HTTP-facing error type.
//!
//! Every variant maps to a single status code. The message is what the
//! client sees in the `{"error":{"code","message"}}` body, so variants that
//! wrap internal failures carry an already-sanitized message.

use hyper::StatusCode;
use thiserror::Error;

/// Result type for request handling.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to HTTP clients.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
	/// Malformed input (400).
	#[error("{0}")]
	BadRequest(String),

	/// Missing or invalid credentials (401).
	#[error("{0}")]
	Unauthorized(String),

	/// Resource does not exist (404).
	#[error("{0}")]
	NotFound(String),

	/// Route exists but not for this method (405).
	#[error("{0}")]
	MethodNotAllowed(String),

	/// Request body exceeded the configured limit (413).
	#[error("{0}")]
	PayloadTooLarge(String),

	/// Input was well-formed but failed validation (422).
	#[error("{0}")]
	UnprocessableEntity(String),

	/// Upstream rate limit reached (429).
	#[error("{0}")]
	TooManyRequests(String),

	/// Request did not complete in time (503).
	#[error("{0}")]
	Timeout(String),

	/// Unexpected failure (500).
	#[error("{0}")]
	Internal(String),

	/// Response serialization failed (500).
	#[error("serialization error: {0}")]
	Serialization(String),
}

impl Error {
	/// Returns the HTTP status code for this error.
	///
	/// # Examples
	///
	/// ```
	/// use formpress_http::Error;
	///
	/// assert_eq!(Error::NotFound("form not found".into()).status_code(), 404);
	/// assert_eq!(Error::TooManyRequests("slow down".into()).status_code(), 429);
	/// ```
	pub fn status_code(&self) -> u16 {
		match self {
			Error::BadRequest(_) => 400,
			Error::Unauthorized(_) => 401,
			Error::NotFound(_) => 404,
			Error::MethodNotAllowed(_) => 405,
			Error::PayloadTooLarge(_) => 413,
			Error::UnprocessableEntity(_) => 422,
			Error::TooManyRequests(_) => 429,
			Error::Timeout(_) => 503,
			Error::Internal(_) | Error::Serialization(_) => 500,
		}
	}

	/// Returns the status as a typed [`StatusCode`].
	pub fn status(&self) -> StatusCode {
		StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
	}

	/// Builds the JSON error body sent to clients.
	pub fn to_json(&self) -> serde_json::Value {
		serde_json::json!({
			"error": {
				"code": self.status_code(),
				"message": self.to_string(),
			}
		})
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Error::Serialization(err.to_string())
	}
}
