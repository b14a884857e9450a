//! Widget errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WidgetError {
	/// The embed data endpoint answered with a non-success status.
	#[error("Failed to load form (status: {0})")]
	LoadStatus(u16),

	/// The embed data response could not be decoded.
	#[error("invalid form response: {0}")]
	Decode(String),

	#[error(transparent)]
	Transport(#[from] reqwest::Error),

	/// No container with this embed id is attached.
	#[error("Form not found: {0}")]
	UnknownEmbed(String),

	/// The container has no rendered form yet.
	#[error("form {0} is not ready")]
	NotReady(String),

	/// A submission is already in flight.
	#[error("submission already in progress")]
	SubmissionInProgress,
}

pub type WidgetResult<T> = Result<T, WidgetError>;
