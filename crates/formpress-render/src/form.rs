//! The form document: container, message slot and the canvas grid.

use formpress_forms::{FieldTranslation, FormDefinition, FormStyling, select_best_language};
use serde::Serialize;

use crate::classes::transform_classes;
use crate::error::RenderResult;
use crate::fields::FieldRenderer;
use crate::grid::{ROW_CLASSES, column_classes};
use crate::templates::{self, FORM};

/// Everything needed to render one form.
#[derive(Debug, Clone, Copy)]
pub struct FormDocument<'a> {
	pub definition: &'a FormDefinition,
	pub styling: &'a FormStyling,
	/// Requested language, negotiated against the definition.
	pub lang: &'a str,
	pub form_id: &'a str,
	pub submission_url: &'a str,
}

#[derive(Serialize)]
struct FormContext<'a> {
	container_classes: String,
	form_id: &'a str,
	submission_url: &'a str,
	form_classes: String,
	rows: Vec<RowContext<'a>>,
}

#[derive(Serialize)]
struct RowContext<'a> {
	id: &'a str,
	classes: &'static str,
	columns: Vec<ColumnContext<'a>>,
}

#[derive(Serialize)]
struct ColumnContext<'a> {
	id: &'a str,
	classes: String,
	fields: Vec<String>,
}

impl FormDocument<'_> {
	/// Renders the form markup.
	///
	/// Field references that do not resolve to a field are skipped.
	pub fn render(&self, renderer: &FieldRenderer) -> RenderResult<String> {
		let lang = select_best_language(self.lang, &self.definition.languages);
		let fallback = FieldTranslation::default();

		let rows = self
			.styling
			.canvas_layout
			.rows
			.iter()
			.map(|row| RowContext {
				id: &row.id,
				classes: ROW_CLASSES,
				columns: row
					.columns
					.iter()
					.map(|column| ColumnContext {
						id: &column.id,
						classes: column_classes(column),
						fields: column
							.fields
							.iter()
							.filter_map(|reference| {
								let field = self.definition.field(&reference.field_id);
								if field.is_none() {
									tracing::debug!(
										field_id = %reference.field_id,
										"skipping unknown field reference"
									);
								}
								field
							})
							.map(|field| {
								let translation = field.translation(lang).unwrap_or(&fallback);
								renderer.render_field(field, translation, lang, self.styling)
							})
							.collect(),
					})
					.collect(),
			})
			.collect();

		templates::render(
			FORM,
			&FormContext {
				container_classes: transform_classes(&self.styling.styling.form_container.classes),
				form_id: self.form_id,
				submission_url: self.submission_url,
				form_classes: transform_classes(&self.styling.canvas_layout.container_classes),
				rows,
			},
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};
	use serde_json::json;

	#[fixture]
	fn definition() -> FormDefinition {
		serde_json::from_value(json!({
			"languages": {"default": "en", "supported": ["en", "de"]},
			"fields": [
				{"id": "f1", "name": "title", "type": "heading", "tag": "h3",
					"translations": {"en": {"label": "Contact us"}, "de": {"label": "Kontakt"}}},
				{"id": "f2", "name": "email", "type": "email", "required": true,
					"translations": {"en": {"label": "Email"}, "de": {"label": "E-Mail"}}},
				{"id": "f3", "name": "send", "type": "submit_button",
					"translations": {"en": {"label": "Send"}}}
			]
		}))
		.unwrap()
	}

	#[fixture]
	fn styling() -> FormStyling {
		serde_json::from_value(json!({
			"canvas_layout": {
				"container_classes": "space-y-8 grid-cols-1",
				"rows": [
					{"id": "row-1", "columns": [
						{"id": "col-1", "responsive_spans": {"lg": 6}, "fields": [{"field_id": "f1"}, {"field_id": "missing"}]},
						{"id": "col-2", "responsive_spans": {"lg": 6}, "fields": [{"field_id": "f2"}]}
					]},
					{"id": "row-2", "columns": [{"id": "col-3", "fields": [{"field_id": "f3"}]}]}
				]
			},
			"styling": {"form_container": {"classes": "max-w-7xl mx-auto"}}
		}))
		.unwrap()
	}

	fn render(definition: &FormDefinition, styling: &FormStyling, lang: &str) -> String {
		FormDocument {
			definition,
			styling,
			lang,
			form_id: "form-1",
			submission_url: "/api/public/v1/embeds/form-1/submissions",
		}
		.render(&FieldRenderer::default())
		.unwrap()
	}

	#[rstest]
	fn test_document_structure(definition: FormDefinition, styling: FormStyling) {
		// Act
		let html = render(&definition, &styling, "en");

		// Assert
		assert!(html.starts_with(r#"<div class="form-container fp-max-w-7xl fp-mx-auto">"#));
		assert!(html.contains(r#"<div id="fp-message-form-1" class="fp-hidden"></div>"#));
		assert!(html.contains("<noscript>"));
		assert!(html.contains(
			r#"<form action="/api/public/v1/embeds/form-1/submissions" method="POST" class="fp-space-y-8" data-fp-id="form-1">"#
		));
		assert!(html.contains(r#"<div id="row-1" class="fp-grid fp-lg-grid-cols-12">"#));
		assert!(html.contains(r#"<div id="col-1" class="fp-lg-col-6 fp-col-12">"#));
		assert!(html.contains(r#"<div id="col-3" class="fp-col-12">"#));
	}

	#[rstest]
	fn test_fields_render_in_canvas_order(definition: FormDefinition, styling: FormStyling) {
		// Act
		let html = render(&definition, &styling, "en");

		// Assert
		let heading = html.find("Contact us").unwrap();
		let email = html.find(r#"type="email""#).unwrap();
		let submit = html.find(r#"<button type="submit""#).unwrap();
		assert!(heading < email && email < submit);
		assert_eq!(html.matches("field-type-").count(), 3);
	}

	#[rstest]
	#[case("de", "Kontakt")]
	#[case("fr", "Contact us")]
	#[case("", "Contact us")]
	fn test_language_is_negotiated(
		definition: FormDefinition,
		styling: FormStyling,
		#[case] lang: &str,
		#[case] heading: &str,
	) {
		// Act
		let html = render(&definition, &styling, lang);

		// Assert
		assert!(html.contains(&format!(">{heading}</h3>")));
	}

	#[rstest]
	fn test_empty_canvas_renders_empty_form(definition: FormDefinition) {
		// Act
		let html = render(&definition, &FormStyling::default(), "en");

		// Assert
		assert!(html.contains(r#"class="" data-fp-id="form-1">"#));
		assert!(!html.contains("field-type-"));
	}
}
