//! Submitted form data.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::definition::FormDefinition;
use crate::error::{FormError, FormResult};
use crate::language::select_best_language;
use crate::validation::FieldConstraints;

/// Field values posted by a browser, in the order they were received.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionPayload {
	values: IndexMap<String, Value>,
}

impl SubmissionPayload {
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses a request body according to its content type.
	///
	/// JSON bodies must be objects. URL-encoded bodies, and bodies without
	/// a content type, are read as pairs where repeated keys are joined with
	/// `,`.
	///
	/// # Examples
	///
	/// ```
	/// use formpress_forms::SubmissionPayload;
	///
	/// let payload = SubmissionPayload::parse(
	///     Some("application/x-www-form-urlencoded"),
	///     b"name=Ada+Lovelace&topics=a&topics=b",
	/// ).unwrap();
	///
	/// assert_eq!(payload.text("name"), "Ada Lovelace");
	/// assert_eq!(payload.text("topics"), "a,b");
	/// ```
	pub fn parse(content_type: Option<&str>, body: &[u8]) -> FormResult<Self> {
		let media_type = content_type
			.map(|ct| ct.split(';').next().unwrap_or_default().trim().to_ascii_lowercase())
			.unwrap_or_default();

		match media_type.as_str() {
			"application/json" => Self::from_json(body),
			"" | "application/x-www-form-urlencoded" => Self::from_urlencoded(body),
			other => Err(FormError::InvalidPayload(format!(
				"unsupported content type {}",
				other
			))),
		}
	}

	fn from_json(body: &[u8]) -> FormResult<Self> {
		match serde_json::from_slice::<Value>(body) {
			Ok(Value::Object(map)) => Ok(Self {
				values: map.into_iter().collect(),
			}),
			Ok(_) => Err(FormError::InvalidPayload("expected a JSON object".into())),
			Err(err) => Err(FormError::InvalidPayload(err.to_string())),
		}
	}

	fn from_urlencoded(body: &[u8]) -> FormResult<Self> {
		let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
			.map_err(|err| FormError::InvalidPayload(err.to_string()))?;

		let mut payload = Self::new();
		for (name, value) in pairs {
			payload.append(name, value);
		}
		Ok(payload)
	}

	/// Adds a value, joining it to an existing one with `,`.
	pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
		let value = value.into();
		match self.values.entry(name.into()) {
			indexmap::map::Entry::Occupied(mut entry) => {
				let joined = format!("{},{}", value_text(entry.get()), value);
				entry.insert(Value::String(joined));
			}
			indexmap::map::Entry::Vacant(entry) => {
				entry.insert(Value::String(value));
			}
		}
	}

	pub fn get(&self, name: &str) -> Option<&Value> {
		self.values.get(name)
	}

	/// Value of `name` as text, empty when absent.
	pub fn text(&self, name: &str) -> String {
		self.values.get(name).map(value_text).unwrap_or_default()
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// The payload as a JSON object for forwarding.
	pub fn to_json(&self) -> Value {
		Value::Object(
			self.values
				.iter()
				.map(|(k, v)| (k.clone(), v.clone()))
				.collect::<Map<String, Value>>(),
		)
	}
}

fn value_text(value: &Value) -> String {
	match value {
		Value::Null => String::new(),
		Value::String(s) => s.clone(),
		Value::Array(items) => items.iter().map(value_text).collect::<Vec<_>>().join(","),
		other => other.to_string(),
	}
}

/// Validates every input field of `definition` against `payload`.
///
/// Messages come from the field translation for the negotiated language.
///
/// # Errors
///
/// Returns [`FormError::Validation`] with one message per failing field.
pub fn validate_submission(
	definition: &FormDefinition,
	lang: &str,
	payload: &SubmissionPayload,
) -> FormResult<()> {
	let lang = select_best_language(lang, &definition.languages);
	let mut errors = IndexMap::new();

	for field in &definition.fields {
		let Some(constraints) = FieldConstraints::from_field(field, field.translation(lang)) else {
			continue;
		};
		let result = constraints.validate(&payload.text(&field.name));
		if let Some(message) = result.message.filter(|_| !result.valid) {
			errors.insert(field.name.clone(), message);
		}
	}

	if errors.is_empty() {
		Ok(())
	} else {
		tracing::debug!(failed = errors.len(), "submission failed validation");
		Err(FormError::Validation(errors))
	}
}
