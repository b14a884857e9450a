//! Conversion of library errors into HTTP errors.

use formpress_forms::FormError;
use formpress_http::Error;
use formpress_remote::RemoteError;
use formpress_render::RenderError;

/// Keeps the upstream status class and message.
pub fn from_remote(err: RemoteError) -> Error {
	match err {
		RemoteError::NotFound(msg) => Error::NotFound(msg),
		RemoteError::BadRequest(msg) => Error::BadRequest(msg),
		RemoteError::TooManyRequests(msg) => Error::TooManyRequests(msg),
		RemoteError::Upstream(msg) => Error::Internal(msg),
	}
}

/// Unparsable payloads are 400, failed validation is 422 with the first
/// field message.
pub fn from_form(err: FormError) -> Error {
	match err {
		FormError::Validation(_) => Error::UnprocessableEntity(err.to_string()),
		FormError::InvalidPayload(ref detail) => {
			tracing::debug!(detail = %detail, "rejected submission payload");
			Error::BadRequest(err.to_string())
		}
		other => Error::Internal(other.to_string()),
	}
}

pub fn from_render(err: RenderError) -> Error {
	tracing::error!(error = %err, "failed to render template");
	Error::Internal("failed to render form".into())
}

#[cfg(test)]
mod tests {
	use super::*;
	use indexmap::IndexMap;
	use rstest::rstest;

	#[rstest]
	#[case(RemoteError::NotFound("form not found".into()), 404, "form not found")]
	#[case(RemoteError::BadRequest("invalid form ID".into()), 400, "invalid form ID")]
	#[case(RemoteError::TooManyRequests("monthly limit reached".into()), 429, "monthly limit reached")]
	#[case(RemoteError::Upstream("failed to call form service".into()), 500, "failed to call form service")]
	fn test_from_remote(#[case] err: RemoteError, #[case] status: u16, #[case] message: &str) {
		// Act
		let err = from_remote(err);

		// Assert
		assert_eq!(err.status_code(), status);
		assert_eq!(err.to_string(), message);
	}

	#[rstest]
	fn test_from_form() {
		// Arrange
		let mut errors = IndexMap::new();
		errors.insert("email".to_string(), "Invalid email address".to_string());

		// Act
		let validation = from_form(FormError::Validation(errors));
		let payload = from_form(FormError::InvalidPayload("expected object".into()));

		// Assert
		assert_eq!(validation, Error::UnprocessableEntity("Invalid email address".into()));
		assert_eq!(payload, Error::BadRequest("invalid form data".into()));
	}
}
