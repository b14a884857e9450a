//! Shared application state and form presentation.

use std::sync::Arc;

use formpress_conf::Settings;
use formpress_forms::{FieldConstraints, select_best_language};
use formpress_remote::{FormRecord, FormSource};
use formpress_render::{
	EmbedScript, FieldRenderer, FormDocument, RenderResult, StandalonePage, generate_field_css,
	render_standalone_page,
};
use serde::Serialize;

/// A form rendered for one language.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedForm {
	/// Negotiated language.
	pub lang: String,
	pub form_id: String,
	pub css: String,
	pub html: String,
	/// Constraints the widget validates with.
	pub fields: Vec<FieldConstraints>,
}

/// State shared by all handlers.
pub struct AppState {
	source: Arc<dyn FormSource>,
	renderer: FieldRenderer,
	embed_script: EmbedScript,
	base_url: String,
}

impl AppState {
	pub fn new(source: Arc<dyn FormSource>, base_url: &str, captcha_site_key: &str) -> Self {
		let base_url = base_url.trim_end_matches('/').to_string();
		Self {
			source,
			renderer: FieldRenderer::new(captcha_site_key),
			embed_script: EmbedScript::new(base_url.clone()),
			base_url,
		}
	}

	pub fn from_settings(source: Arc<dyn FormSource>, settings: &Settings) -> Self {
		Self::new(source, settings.base.trimmed_url(), &settings.captcha.site_key)
	}

	pub fn source(&self) -> &dyn FormSource {
		self.source.as_ref()
	}

	pub fn embed_script(&self) -> &EmbedScript {
		&self.embed_script
	}

	/// Public URL that receives submissions for `embed_id`.
	pub fn submission_url(&self, embed_id: &str) -> String {
		format!("{}/api/public/v1/embeds/{}/submissions", self.base_url, embed_id)
	}

	/// Renders `record` in the best language for `requested`.
	pub fn render_form(&self, record: &FormRecord, requested: &str) -> RenderResult<RenderedForm> {
		let definition = &record.form_definition;
		let lang = select_best_language(requested, &definition.languages).to_string();
		let form_id = record.id.to_string();
		let submission_url = self.submission_url(&form_id);

		let html = FormDocument {
			definition,
			styling: &record.form_styling,
			lang: &lang,
			form_id: &form_id,
			submission_url: &submission_url,
		}
		.render(&self.renderer)?;

		let fields = definition
			.fields
			.iter()
			.filter_map(|field| FieldConstraints::from_field(field, field.translation(&lang)))
			.collect();

		tracing::debug!(form_id = %form_id, lang = %lang, "rendered form");
		Ok(RenderedForm {
			css: generate_field_css(&record.form_styling),
			lang,
			form_id,
			html,
			fields,
		})
	}

	/// Renders `record` as a complete HTML page.
	pub fn render_page(&self, record: &FormRecord, requested: &str) -> RenderResult<String> {
		let form = self.render_form(record, requested)?;
		let submission_url = self.submission_url(&form.form_id);
		render_standalone_page(&StandalonePage {
			lang: &form.lang,
			title: &record.name,
			dynamic_css: &form.css,
			form_html: &form.html,
			form_id: &form.form_id,
			submission_url: &submission_url,
		})
	}
}
