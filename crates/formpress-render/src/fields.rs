//! Markup for individual fields.

use std::fmt::Write;

use formpress_forms::{FieldTranslation, FieldType, FormField, FormStyling};

use crate::classes::{alignment_classes, format_classes};
use crate::escape::escape_html;
use crate::layout::FieldLayout;

const REQUIRED_MARK: &str = r#" <span class="fp-text-red-600">*</span>"#;
const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// Renders fields to HTML fragments.
#[derive(Debug, Clone, Default)]
pub struct FieldRenderer {
	captcha_site_key: String,
}

impl FieldRenderer {
	pub fn new(captcha_site_key: impl Into<String>) -> Self {
		Self {
			captcha_site_key: captcha_site_key.into(),
		}
	}

	/// Renders one field wrapped in its `field-type-{type}` container.
	pub fn render_field(
		&self,
		field: &FormField,
		translation: &FieldTranslation,
		lang: &str,
		styling: &FormStyling,
	) -> String {
		let layout = FieldLayout::resolve(styling, &field.field_type);

		match field.kind() {
			FieldType::Heading => {
				let tag = HEADING_TAGS
					.iter()
					.find(|t| **t == field.tag)
					.copied()
					.unwrap_or("h2");
				let content = format!(
					r#"<{tag} class="{} {}">{}</{tag}>"#,
					alignment_classes(&field.alignment),
					format_classes(field.format),
					escape_html(&translation.label)
				);
				wrap_field_type(&field.field_type, &content)
			}
			FieldType::Paragraph => {
				let content = format!(
					r#"<p class="{} {}">{}</p>"#,
					alignment_classes(&field.alignment),
					format_classes(field.format),
					escape_html(&translation.label)
				);
				wrap_field_type(&field.field_type, &content)
			}
			FieldType::Text | FieldType::Email | FieldType::Phone => {
				let input_type = match field.kind() {
					FieldType::Email => "email",
					FieldType::Phone => "tel",
					_ => "text",
				};
				let control = Control::Input(input_type);
				render_text_control(field, translation, &layout, control)
			}
			FieldType::Textarea => {
				render_text_control(field, translation, &layout, Control::TextArea)
			}
			FieldType::Select => {
				let mut options = String::new();
				if !translation.placeholder.is_empty() {
					let _ = write!(
						options,
						r#"<option value="" disabled selected>{}</option>"#,
						escape_html(&translation.placeholder)
					);
				}
				for option in &field.options {
					let _ = write!(
						options,
						r#"<option value="{}">{}</option>"#,
						escape_html(&option.value),
						escape_html(field.option_label(option, lang))
					);
				}
				let label = render_label(
					&field.id,
					&format!("inline-label {}", layout.label_classes),
					&translation.label,
					field.required,
				);
				let content = format!(
					r#"{label}<select id="{}" name="{}"{}{}>{options}</select>"#,
					escape_html(&field.id),
					escape_html(&field.name),
					required_attr(field.required),
					validation_attributes(field, translation)
				);
				wrap_field_type(&field.field_type, &wrap_form_field(&layout.classes, &content))
			}
			FieldType::Radio | FieldType::Checkbox => {
				let is_radio = field.kind() == FieldType::Radio;
				let (input_type, option_class) = if is_radio {
					("radio", "radio-option")
				} else {
					("checkbox", "checkbox-option")
				};
				// Only radio inputs carry the required attribute
				let required = is_radio && field.required;

				let mut options = String::from("<div>");
				for (i, option) in field.options.iter().enumerate() {
					let option_id = escape_html(&format!("{}_{}", field.id, i));
					let _ = write!(
						options,
						r#"<div class="{option_class}"><input type="{input_type}" id="{option_id}" name="{}" value="{}"{}><label for="{option_id}">{}</label></div>"#,
						escape_html(&field.name),
						escape_html(&option.value),
						required_attr(required),
						escape_html(field.option_label(option, lang))
					);
				}
				options.push_str("</div>");

				let fieldset = format!(
					r#"<legend class="inline-label {}">{}{}</legend>{options}"#,
					layout.label_classes,
					escape_html(&translation.label),
					if required { REQUIRED_MARK } else { "" }
				);
				wrap_field_type(&field.field_type, &wrap_form_field(&layout.classes, &fieldset))
			}
			FieldType::SubmitButton => {
				let content = format!(
					r#"<button type="submit">{}</button>"#,
					escape_html(&translation.label)
				);
				wrap_field_type(&field.field_type, &wrap_form_field("", &content))
			}
			FieldType::Captcha => {
				let key = escape_html(&self.captcha_site_key);
				let content = format!(
					r#"<div class="captcha-container"><input type="hidden" id="g-recaptcha" name="g-recaptcha" value="{key}"></div><script src="https://www.google.com/recaptcha/api.js?render={key}" defer></script>"#
				);
				wrap_field_type(&field.field_type, &wrap_form_field("", &content))
			}
			FieldType::Divider | FieldType::Spacer | FieldType::Other(_) => {
				tracing::debug!(
					field_id = %field.id,
					field_type = %field.field_type,
					"unsupported field type"
				);
				let content = format!(
					"<div>Unsupported field type: {}</div>",
					escape_html(&field.field_type)
				);
				wrap_field_type(&field.field_type, &content)
			}
		}
	}
}

#[derive(Clone, Copy)]
enum Control {
	Input(&'static str),
	TextArea,
}

impl Control {
	fn render(self, id: &str, name: &str, attrs: &str) -> String {
		match self {
			Self::Input(input_type) => {
				format!(r#"<input type="{input_type}" id="{id}" name="{name}"{attrs}>"#)
			}
			Self::TextArea => format!(r#"<textarea id="{id}" name="{name}"{attrs}></textarea>"#),
		}
	}
}

fn render_text_control(
	field: &FormField,
	translation: &FieldTranslation,
	layout: &FieldLayout,
	control: Control,
) -> String {
	let id = escape_html(&field.id);
	let name = escape_html(&field.name);
	let mut placeholder = if translation.placeholder.is_empty() {
		String::new()
	} else {
		format!(r#" placeholder="{}""#, escape_html(&translation.placeholder))
	};
	let tail = format!(
		"{}{}",
		required_attr(field.required),
		validation_attributes(field, translation)
	);

	let content = match layout.label_layout() {
		"hidden" => control.render(&id, &name, &format!("{placeholder}{tail}")),
		"floating" => {
			if placeholder.is_empty() {
				placeholder = format!(r#" placeholder="{}""#, escape_html(&translation.label));
			}
			let label = render_label(
				&field.id,
				&format!("floating-label {}", layout.label_classes),
				&translation.label,
				field.required,
			);
			format!(
				r#"<div class="floating-input-container">{}{label}</div>"#,
				control.render(&id, &name, &format!("{placeholder}{tail}"))
			)
		}
		"inline" => {
			let label = render_label(
				&field.id,
				&format!("inline-label {}", layout.label_classes),
				&translation.label,
				field.required,
			);
			format!(
				r#"{label}<div class="inline-input">{}</div>"#,
				control.render(&id, &name, &format!("{placeholder}{tail}"))
			)
		}
		_ => {
			let label = render_label(&field.id, "", &translation.label, field.required);
			format!(
				"{label}{}",
				control.render(&id, &name, &format!("{placeholder}{tail}"))
			)
		}
	};
	wrap_field_type(&field.field_type, &wrap_form_field(&layout.classes, &content))
}

fn required_attr(required: bool) -> &'static str {
	if required { " required" } else { "" }
}

fn wrap_field_type(field_type: &str, content: &str) -> String {
	format!(
		r#"<div class="field-type-{}">{content}</div>"#,
		escape_html(field_type)
	)
}

fn wrap_form_field(layout_classes: &str, content: &str) -> String {
	format!(r#"<div class="form-field {layout_classes}">{content}</div>"#)
}

fn render_label(field_id: &str, classes: &str, label: &str, required: bool) -> String {
	let mark = if required { REQUIRED_MARK } else { "" };
	let classes = classes.trim();
	if classes.is_empty() {
		format!(
			r#"<label for="{}">{}{mark}</label>"#,
			escape_html(field_id),
			escape_html(label)
		)
	} else {
		format!(
			r#"<label for="{}" class="{classes}">{}{mark}</label>"#,
			escape_html(field_id),
			escape_html(label)
		)
	}
}

/// `minlength`, `maxlength` and `data-error-*` attributes for an input.
pub fn validation_attributes(field: &FormField, translation: &FieldTranslation) -> String {
	let mut attrs = String::new();

	if field.required && !translation.required.is_empty() {
		let _ = write!(attrs, r#" data-error-required="{}""#, escape_html(&translation.required));
	}
	if field.validation.is_none() {
		return attrs;
	}
	if let Some(min) = field.min_length() {
		let _ = write!(attrs, r#" minlength="{min}""#);
		if !translation.min_length.is_empty() {
			let _ = write!(
				attrs,
				r#" data-error-minlength="{}""#,
				escape_html(&translation.min_length)
			);
		}
	}
	if let Some(max) = field.max_length() {
		let _ = write!(attrs, r#" maxlength="{max}""#);
		if !translation.max_length.is_empty() {
			let _ = write!(
				attrs,
				r#" data-error-maxlength="{}""#,
				escape_html(&translation.max_length)
			);
		}
	}
	if field.email_check() && !translation.email.is_empty() {
		let _ = write!(attrs, r#" data-error-email="{}""#, escape_html(&translation.email));
	}
	if field.phone_check() && !translation.phone.is_empty() {
		let _ = write!(attrs, r#" data-error-phone="{}""#, escape_html(&translation.phone));
	}
	attrs
}
