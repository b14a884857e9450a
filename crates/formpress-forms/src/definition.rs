//! Form definition model as delivered by the form service.
//!
//! Field translations are kept in document order so that "first available
//! translation" fallbacks are deterministic.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Languages a form is available in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageSettings {
	pub default: String,
	#[serde(default)]
	pub supported: Vec<String>,
}

/// A complete form: its languages and its fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormDefinition {
	pub languages: LanguageSettings,
	#[serde(default)]
	pub fields: Vec<FormField>,
}

impl FormDefinition {
	/// Looks up a field by id.
	pub fn field(&self, id: &str) -> Option<&FormField> {
		self.fields.iter().find(|field| field.id == id)
	}

	/// Fields that collect user input, in definition order.
	pub fn input_fields(&self) -> impl Iterator<Item = &FormField> {
		self.fields.iter().filter(|field| field.kind().is_input())
	}
}

/// Known field types. Unknown types are preserved so they can be reported
/// as unsupported when rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
	Text,
	Email,
	Phone,
	Textarea,
	Select,
	Radio,
	Checkbox,
	Captcha,
	Heading,
	Paragraph,
	SubmitButton,
	Divider,
	Spacer,
	Other(String),
}

impl FieldType {
	/// Parses the wire name of a field type.
	///
	/// # Examples
	///
	/// ```
	/// use formpress_forms::FieldType;
	///
	/// assert_eq!(FieldType::parse("submit_button"), FieldType::SubmitButton);
	/// assert_eq!(FieldType::parse("rating"), FieldType::Other("rating".into()));
	/// ```
	pub fn parse(name: &str) -> Self {
		match name {
			"text" => Self::Text,
			"email" => Self::Email,
			"phone" => Self::Phone,
			"textarea" => Self::Textarea,
			"select" => Self::Select,
			"radio" => Self::Radio,
			"checkbox" => Self::Checkbox,
			"captcha" => Self::Captcha,
			"heading" => Self::Heading,
			"paragraph" => Self::Paragraph,
			"submit_button" => Self::SubmitButton,
			"divider" => Self::Divider,
			"spacer" => Self::Spacer,
			other => Self::Other(other.to_string()),
		}
	}

	pub fn as_str(&self) -> &str {
		match self {
			Self::Text => "text",
			Self::Email => "email",
			Self::Phone => "phone",
			Self::Textarea => "textarea",
			Self::Select => "select",
			Self::Radio => "radio",
			Self::Checkbox => "checkbox",
			Self::Captcha => "captcha",
			Self::Heading => "heading",
			Self::Paragraph => "paragraph",
			Self::SubmitButton => "submit_button",
			Self::Divider => "divider",
			Self::Spacer => "spacer",
			Self::Other(name) => name,
		}
	}

	/// Whether the field submits a user-entered value.
	pub fn is_input(&self) -> bool {
		matches!(
			self,
			Self::Text
				| Self::Email | Self::Phone
				| Self::Textarea
				| Self::Select | Self::Radio
				| Self::Checkbox
		)
	}
}

/// A single form field with per-language texts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormField {
	pub id: String,
	pub name: String,
	#[serde(rename = "type")]
	pub field_type: String,
	#[serde(default)]
	pub required: bool,
	#[serde(
		rename = "allowMultipleSelections",
		default,
		skip_serializing_if = "Option::is_none"
	)]
	pub allow_multiple_selections: Option<bool>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub options: Vec<SelectOption>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub validation: Option<FieldValidation>,
	#[serde(default)]
	pub translations: IndexMap<String, FieldTranslation>,
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub tag: String,
	#[serde(default, skip_serializing_if = "is_zero")]
	pub format: u8,
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub alignment: String,
}

fn is_zero(value: &u8) -> bool {
	*value == 0
}

impl FormField {
	pub fn kind(&self) -> FieldType {
		FieldType::parse(&self.field_type)
	}

	/// Translation for `lang`, falling back to the first one defined.
	///
	/// # Examples
	///
	/// ```
	/// use formpress_forms::{FieldTranslation, FormField};
	///
	/// let mut field = FormField::default();
	/// field.translations.insert("de".into(), FieldTranslation { label: "Name".into(), ..Default::default() });
	/// field.translations.insert("en".into(), FieldTranslation { label: "Name (en)".into(), ..Default::default() });
	///
	/// assert_eq!(field.translation("en").unwrap().label, "Name (en)");
	/// assert_eq!(field.translation("fr").unwrap().label, "Name");
	/// ```
	pub fn translation(&self, lang: &str) -> Option<&FieldTranslation> {
		self.translations
			.get(lang)
			.or_else(|| self.translations.values().next())
	}

	/// Label shown for `option` in `lang`.
	///
	/// Falls back to the first translation of the option, then to its value.
	pub fn option_label<'a>(&self, option: &'a SelectOption, lang: &str) -> &'a str {
		option
			.translations
			.get(lang)
			.or_else(|| option.translations.values().next())
			.map(String::as_str)
			.unwrap_or(option.value.as_str())
	}

	pub fn email_check(&self) -> bool {
		self.validation
			.as_ref()
			.and_then(|v| v.email)
			.unwrap_or(false)
	}

	pub fn phone_check(&self) -> bool {
		self.validation
			.as_ref()
			.and_then(|v| v.phone)
			.unwrap_or(false)
	}

	/// Minimum length, only when positive.
	pub fn min_length(&self) -> Option<usize> {
		self.validation
			.as_ref()
			.and_then(|v| v.min_length)
			.filter(|n| *n > 0)
			.map(|n| n as usize)
	}

	/// Maximum length, only when positive.
	pub fn max_length(&self) -> Option<usize> {
		self.validation
			.as_ref()
			.and_then(|v| v.max_length)
			.filter(|n| *n > 0)
			.map(|n| n as usize)
	}
}

/// Extra validation settings. Only email, phone and the length bounds are
/// enforced. The remaining keys are carried through for the form service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValidation {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub phone: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub min_length: Option<i64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max_length: Option<i64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub step: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max_size: Option<i64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max_files: Option<i64>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub accept: Vec<String>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub mime_types: Vec<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub min_selected: Option<i64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max_selected: Option<i64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub min_date: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max_date: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub alphanumeric_only: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub no_special_chars: Option<bool>,
}

/// Texts for one field in one language. Empty strings mean "not set".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldTranslation {
	#[serde(default)]
	pub label: String,
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub placeholder: String,
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub required: String,
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub min_length: String,
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub max_length: String,
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub email: String,
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub phone: String,
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub help_text: String,
	#[serde(default, skip_serializing_if = "IndexMap::is_empty")]
	pub error_messages: IndexMap<String, String>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub options: Vec<TranslatedOption>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslatedOption {
	pub value: String,
	pub label: String,
}

/// Choice for select, radio and checkbox fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
	pub value: String,
	#[serde(default)]
	pub translations: IndexMap<String, String>,
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	fn contact_form_json() -> serde_json::Value {
		json!({
			"languages": {"default": "en", "supported": ["en", "de"]},
			"fields": [
				{
					"id": "f1",
					"name": "email",
					"type": "email",
					"required": true,
					"validation": {"email": true, "minLength": 5, "maxLength": 0, "mimeTypes": ["text/plain"]},
					"translations": {
						"en": {"label": "Email", "required": "Please enter your email", "email": "Bad email"}
					}
				},
				{
					"id": "f2",
					"name": "topic",
					"type": "radio",
					"options": [
						{"value": "sales", "translations": {"en": "Sales", "de": "Vertrieb"}},
						{"value": "other", "translations": {}}
					],
					"translations": {"en": {"label": "Topic"}}
				},
				{"id": "h1", "name": "title", "type": "heading", "tag": "h3", "format": 5, "alignment": "center", "translations": {}}
			]
		})
	}

	#[rstest]
	fn test_deserialize_wire_format() {
		// Act
		let definition: FormDefinition = serde_json::from_value(contact_form_json()).unwrap();

		// Assert
		assert_eq!(definition.languages.default, "en");
		assert_eq!(definition.fields.len(), 3);
		let email = definition.field("f1").unwrap();
		assert_eq!(email.kind(), FieldType::Email);
		assert!(email.email_check());
		assert!(!email.phone_check());
		assert_eq!(email.min_length(), Some(5));
		assert_eq!(email.max_length(), None);
		assert_eq!(
			email.validation.as_ref().unwrap().mime_types,
			vec!["text/plain".to_string()]
		);
		let heading = definition.field("h1").unwrap();
		assert_eq!(heading.format, 5);
		assert_eq!(heading.tag, "h3");
	}

	#[rstest]
	fn test_input_fields_skip_layout_fields() {
		// Arrange
		let definition: FormDefinition = serde_json::from_value(contact_form_json()).unwrap();

		// Act
		let names: Vec<&str> = definition.input_fields().map(|f| f.name.as_str()).collect();

		// Assert
		assert_eq!(names, vec!["email", "topic"]);
	}

	#[rstest]
	#[case("de", 0, "Vertrieb")]
	#[case("fr", 0, "Sales")]
	#[case("en", 1, "other")]
	fn test_option_label_fallbacks(
		#[case] lang: &str,
		#[case] index: usize,
		#[case] expected: &str,
	) {
		// Arrange
		let definition: FormDefinition = serde_json::from_value(contact_form_json()).unwrap();
		let field = definition.field("f2").unwrap();

		// Act
		let label = field.option_label(&field.options[index], lang);

		// Assert
		assert_eq!(label, expected);
	}

	#[rstest]
	fn test_translation_missing_everywhere() {
		// Arrange
		let field = FormField {
			field_type: "text".into(),
			..Default::default()
		};

		// Act & Assert
		assert!(field.translation("en").is_none());
	}

	#[rstest]
	fn test_serialize_omits_unset_keys() {
		// Arrange
		let field = FormField {
			id: "f9".into(),
			name: "nick".into(),
			field_type: "text".into(),
			..Default::default()
		};

		// Act
		let value = serde_json::to_value(&field).unwrap();

		// Assert
		assert_eq!(value["type"], "text");
		assert!(value.get("validation").is_none());
		assert!(value.get("allowMultipleSelections").is_none());
		assert!(value.get("format").is_none());
	}
}
