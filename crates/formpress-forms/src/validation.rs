//! Field validation engine.
//!
//! Constraints mirror the attributes the renderer puts on each input
//! (`required`, `minlength`, `maxlength`, `pattern`, `min`, `max` and the
//! `data-error-*` messages), so a value judged valid here is judged valid by
//! the browser script as well.
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. required
//! 2. empty optional values pass without further checks
//! 3. minimum then maximum length, counted in characters
//! 4. email format for email inputs
//! 5. phone format for tel inputs with a configured phone message
//! 6. pattern, matched anywhere in the value
//! 7. numeric minimum then maximum for number inputs

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::definition::{FieldTranslation, FieldType, FormField};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9+\-\s()]+$").unwrap());

pub const DEFAULT_REQUIRED_MESSAGE: &str = "This field is required";
pub const DEFAULT_MINLENGTH_MESSAGE: &str = "Too short";
pub const DEFAULT_MAXLENGTH_MESSAGE: &str = "Too long";
pub const DEFAULT_EMAIL_MESSAGE: &str = "Invalid email address";
pub const DEFAULT_PHONE_MESSAGE: &str = "Invalid phone number";
pub const DEFAULT_PATTERN_MESSAGE: &str = "Invalid format";
pub const DEFAULT_MIN_MESSAGE: &str = "Value too small";
pub const DEFAULT_MAX_MESSAGE: &str = "Value too large";

/// Kind of control a field is rendered as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
	Text,
	Email,
	Tel,
	TextArea,
	Number,
	Select,
	Radio,
	Checkbox,
}

impl InputKind {
	/// Input kind for a field type, or `None` for fields that take no input.
	pub fn for_field_type(field_type: &FieldType) -> Option<Self> {
		let kind = match field_type {
			FieldType::Email => Self::Email,
			FieldType::Phone => Self::Tel,
			FieldType::Textarea => Self::TextArea,
			FieldType::Select => Self::Select,
			FieldType::Radio => Self::Radio,
			FieldType::Checkbox => Self::Checkbox,
			FieldType::Text => Self::Text,
			_ => return None,
		};
		Some(kind)
	}

	/// Whether the field is a group of options sharing one name.
	pub fn is_group(self) -> bool {
		matches!(self, Self::Radio | Self::Checkbox)
	}
}

/// Custom messages, the equivalent of `data-error-*` attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationMessages {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub required: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub minlength: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub maxlength: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub phone: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub pattern: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub min: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub max: Option<String>,
}

fn non_empty(text: &str) -> Option<String> {
	(!text.is_empty()).then(|| text.to_string())
}

fn message_or<'a>(custom: &'a Option<String>, default: &'a str) -> &'a str {
	custom.as_deref().unwrap_or(default)
}

/// Validation constraints for one input.
///
/// Serialized as part of the embed data response so that the widget
/// validates with exactly the same rules as the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConstraints {
	pub name: String,
	pub kind: InputKind,
	#[serde(default)]
	pub required: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub min_length: Option<usize>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max_length: Option<usize>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pattern: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub min: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max: Option<f64>,
	/// Option values for select, radio and checkbox fields.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub options: Vec<String>,
	#[serde(default)]
	pub messages: ValidationMessages,
}

impl FieldConstraints {
	/// Unconstrained input of the given kind.
	pub fn new(name: impl Into<String>, kind: InputKind) -> Self {
		Self {
			name: name.into(),
			kind,
			required: false,
			min_length: None,
			max_length: None,
			pattern: None,
			min: None,
			max: None,
			options: Vec::new(),
			messages: ValidationMessages::default(),
		}
	}

	pub fn required(mut self, required: bool) -> Self {
		self.required = required;
		self
	}

	pub fn with_min_length(mut self, min: usize) -> Self {
		self.min_length = Some(min);
		self
	}

	pub fn with_max_length(mut self, max: usize) -> Self {
		self.max_length = Some(max);
		self
	}

	pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
		self.pattern = Some(pattern.into());
		self
	}

	pub fn with_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
		self.min = min;
		self.max = max;
		self
	}

	pub fn with_messages(mut self, messages: ValidationMessages) -> Self {
		self.messages = messages;
		self
	}

	/// Derives the constraints the renderer emits for `field`.
	///
	/// Returns `None` for layout fields, captchas and unknown types.
	/// Checkbox groups are never required because the renderer does not mark
	/// their inputs as required.
	///
	/// # Examples
	///
	/// ```
	/// use formpress_forms::{FieldConstraints, FormField, InputKind};
	///
	/// let field = FormField { name: "email".into(), field_type: "email".into(), required: true, ..Default::default() };
	/// let constraints = FieldConstraints::from_field(&field, None).unwrap();
	/// assert_eq!(constraints.kind, InputKind::Email);
	/// assert!(constraints.required);
	/// ```
	pub fn from_field(field: &FormField, translation: Option<&FieldTranslation>) -> Option<Self> {
		let kind = InputKind::for_field_type(&field.kind())?;
		let empty = FieldTranslation::default();
		let translation = translation.unwrap_or(&empty);
		let required = field.required && kind != InputKind::Checkbox;

		let mut messages = ValidationMessages::default();
		if required && kind != InputKind::Radio {
			messages.required = non_empty(&translation.required);
		}

		// Radio inputs carry only the required attribute
		let attributed = kind != InputKind::Radio && kind != InputKind::Checkbox;
		let min_length = field.min_length().filter(|_| attributed);
		let max_length = field.max_length().filter(|_| attributed);
		if attributed {
			if min_length.is_some() {
				messages.minlength = non_empty(&translation.min_length);
			}
			if max_length.is_some() {
				messages.maxlength = non_empty(&translation.max_length);
			}
			if field.email_check() {
				messages.email = non_empty(&translation.email);
			}
			if field.phone_check() {
				messages.phone = non_empty(&translation.phone);
			}
		}

		Some(Self {
			name: field.name.clone(),
			kind,
			required,
			min_length,
			max_length,
			pattern: None,
			min: None,
			max: None,
			options: field.options.iter().map(|o| o.value.clone()).collect(),
			messages,
		})
	}

	/// Validates a raw value against these constraints.
	pub fn validate(&self, raw_value: &str) -> FieldValidationResult {
		validate_field(self, raw_value)
	}
}

/// Outcome of validating one value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValidationResult {
	pub valid: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
}

impl FieldValidationResult {
	pub fn ok() -> Self {
		Self {
			valid: true,
			message: None,
		}
	}

	pub fn invalid(message: impl Into<String>) -> Self {
		Self {
			valid: false,
			message: Some(message.into()),
		}
	}
}

/// Validates `raw_value` against `constraints`.
///
/// # Examples
///
/// ```
/// use formpress_forms::{FieldConstraints, InputKind, validate_field};
///
/// let email = FieldConstraints::new("email", InputKind::Email).required(true);
/// assert!(validate_field(&email, " a@b.co ").valid);
/// assert_eq!(validate_field(&email, "").message.as_deref(), Some("This field is required"));
/// assert_eq!(validate_field(&email, "a@b").message.as_deref(), Some("Invalid email address"));
/// ```
pub fn validate_field(constraints: &FieldConstraints, raw_value: &str) -> FieldValidationResult {
	let value = raw_value.trim();
	let messages = &constraints.messages;

	if value.is_empty() {
		if constraints.required {
			return FieldValidationResult::invalid(message_or(
				&messages.required,
				DEFAULT_REQUIRED_MESSAGE,
			));
		}
		return FieldValidationResult::ok();
	}

	let length = value.chars().count();
	if let Some(min) = constraints.min_length
		&& length < min
	{
		return FieldValidationResult::invalid(message_or(
			&messages.minlength,
			DEFAULT_MINLENGTH_MESSAGE,
		));
	}
	if let Some(max) = constraints.max_length
		&& length > max
	{
		return FieldValidationResult::invalid(message_or(
			&messages.maxlength,
			DEFAULT_MAXLENGTH_MESSAGE,
		));
	}

	if constraints.kind == InputKind::Email && !EMAIL_RE.is_match(value) {
		return FieldValidationResult::invalid(message_or(&messages.email, DEFAULT_EMAIL_MESSAGE));
	}

	if constraints.kind == InputKind::Tel
		&& messages.phone.is_some()
		&& !PHONE_RE.is_match(value)
	{
		return FieldValidationResult::invalid(message_or(&messages.phone, DEFAULT_PHONE_MESSAGE));
	}

	if let Some(pattern) = &constraints.pattern {
		match Regex::new(pattern) {
			Ok(re) if !re.is_match(value) => {
				return FieldValidationResult::invalid(message_or(
					&messages.pattern,
					DEFAULT_PATTERN_MESSAGE,
				));
			}
			Ok(_) => {}
			Err(err) => {
				tracing::warn!(
					field = %constraints.name,
					pattern = %pattern,
					error = %err,
					"ignoring invalid pattern"
				);
			}
		}
	}

	if constraints.kind == InputKind::Number {
		// NaN compares false, so unparsable input passes the range checks
		let number = parse_float_prefix(value).unwrap_or(f64::NAN);
		if let Some(min) = constraints.min
			&& number < min
		{
			return FieldValidationResult::invalid(message_or(&messages.min, DEFAULT_MIN_MESSAGE));
		}
		if let Some(max) = constraints.max
			&& number > max
		{
			return FieldValidationResult::invalid(message_or(&messages.max, DEFAULT_MAX_MESSAGE));
		}
	}

	FieldValidationResult::ok()
}

/// Parses the longest leading decimal number in `input`.
///
/// Accepts an optional sign, digits with an optional fraction, an optional
/// exponent and the literal `Infinity`. Trailing text is ignored, so `"12px"`
/// parses as `12`.
pub fn parse_float_prefix(input: &str) -> Option<f64> {
	let s = input.trim_start();
	let bytes = s.as_bytes();
	let mut end = 0;

	if matches!(bytes.first(), Some(b'+' | b'-')) {
		end += 1;
	}
	if s[end..].starts_with("Infinity") {
		return s[..end + "Infinity".len()].replace("Infinity", "inf").parse().ok();
	}

	let digits_start = end;
	while end < bytes.len() && bytes[end].is_ascii_digit() {
		end += 1;
	}
	let mut mantissa_digits = end - digits_start;
	if end < bytes.len() && bytes[end] == b'.' {
		let fraction_start = end + 1;
		let mut fraction_end = fraction_start;
		while fraction_end < bytes.len() && bytes[fraction_end].is_ascii_digit() {
			fraction_end += 1;
		}
		mantissa_digits += fraction_end - fraction_start;
		if mantissa_digits > 0 {
			end = fraction_end;
		}
	}
	if mantissa_digits == 0 {
		return None;
	}

	if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
		let mut exp_end = end + 1;
		if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
			exp_end += 1;
		}
		let exp_digits_start = exp_end;
		while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
			exp_end += 1;
		}
		if exp_end > exp_digits_start {
			end = exp_end;
		}
	}

	s[..end].parse().ok()
}
