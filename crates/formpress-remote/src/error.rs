//! Upstream call failures.

use thiserror::Error;

/// Failures talking to the form service.
///
/// Messages are safe to show to clients; upstream bodies and transport
/// details only go to the logs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
	#[error("{0}")]
	NotFound(String),

	#[error("{0}")]
	BadRequest(String),

	/// The form service rejected the call because of rate limiting.
	#[error("{0}")]
	TooManyRequests(String),

	/// Transport failures, undecodable bodies and unexpected statuses.
	#[error("{0}")]
	Upstream(String),
}

impl RemoteError {
	pub fn status_code(&self) -> u16 {
		match self {
			RemoteError::NotFound(_) => 404,
			RemoteError::BadRequest(_) => 400,
			RemoteError::TooManyRequests(_) => 429,
			RemoteError::Upstream(_) => 500,
		}
	}
}

pub type RemoteResult<T> = Result<T, RemoteError>;
