//! Wire types of the form service.

use formpress_forms::{FormDefinition, FormStyling};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A published form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormRecord {
	pub id: Uuid,
	pub name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	pub form_definition: FormDefinition,
	#[serde(default)]
	pub form_styling: FormStyling,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DataEnvelope<T> {
	pub data: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
	pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
	#[serde(default)]
	pub message: String,
}
