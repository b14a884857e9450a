use indexmap::IndexMap;

/// Errors raised while reading or validating form data.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum FormError {
	/// The submitted body could not be parsed.
	#[error("invalid form data")]
	InvalidPayload(String),

	/// One or more fields failed validation. Keys are field names in
	/// definition order.
	#[error("{}", first_message(.0))]
	Validation(IndexMap<String, String>),

	#[error("invalid form definition: {0}")]
	Definition(#[from] serde_json::Error),
}

pub type FormResult<T> = Result<T, FormError>;

fn first_message(errors: &IndexMap<String, String>) -> &str {
	errors
		.values()
		.next()
		.map(String::as_str)
		.unwrap_or("validation failed")
}

impl FormError {
	/// Field errors, when this is a validation failure.
	pub fn field_errors(&self) -> Option<&IndexMap<String, String>> {
		match self {
			Self::Validation(errors) => Some(errors),
			_ => None,
		}
	}
}
