//! Static assets and whole-document outputs: the embed script and the
//! standalone form page.

use once_cell::sync::OnceCell;
use serde::Serialize;

use crate::error::RenderResult;
use crate::templates::{self, EMBED_SCRIPT, PAGE};

/// Stylesheet shared by every form. Injected once per host page.
pub const STATIC_CSS: &str = include_str!("../assets/formpress.css");

#[derive(Serialize)]
struct EmbedScriptContext<'a> {
	api_base_url: &'a str,
	static_css: &'a str,
}

/// Renders the embed script for an API base URL.
pub fn render_embed_script(api_base_url: &str) -> RenderResult<String> {
	templates::render(
		EMBED_SCRIPT,
		&EmbedScriptContext {
			api_base_url: api_base_url.trim_end_matches('/'),
			static_css: STATIC_CSS,
		},
	)
}

/// The embed script, rendered on first use and reused afterwards.
///
/// # Examples
///
/// ```
/// use formpress_render::EmbedScript;
///
/// let script = EmbedScript::new("https://forms.example.com/");
/// let first = script.get().unwrap();
///
/// assert!(first.contains(r#"var API_BASE_URL = "https://forms.example.com";"#));
/// assert!(std::ptr::eq(first, script.get().unwrap()));
/// ```
#[derive(Debug)]
pub struct EmbedScript {
	api_base_url: String,
	rendered: OnceCell<String>,
}

impl EmbedScript {
	pub fn new(api_base_url: impl Into<String>) -> Self {
		Self {
			api_base_url: api_base_url.into(),
			rendered: OnceCell::new(),
		}
	}

	pub fn get(&self) -> RenderResult<&str> {
		self.rendered
			.get_or_try_init(|| {
				tracing::debug!(api_base_url = %self.api_base_url, "rendering embed script");
				render_embed_script(&self.api_base_url)
			})
			.map(String::as_str)
	}
}

/// Inputs for a standalone form page.
#[derive(Debug, Clone, Serialize)]
pub struct StandalonePage<'a> {
	/// Value of the document `lang` attribute.
	pub lang: &'a str,
	/// Document title, usually the form name.
	pub title: &'a str,
	pub dynamic_css: &'a str,
	pub form_html: &'a str,
	pub form_id: &'a str,
	pub submission_url: &'a str,
}

#[derive(Serialize)]
struct PageContext<'a> {
	#[serde(flatten)]
	page: &'a StandalonePage<'a>,
	static_css: &'a str,
}

/// Renders a complete HTML document around an already rendered form.
pub fn render_standalone_page(page: &StandalonePage<'_>) -> RenderResult<String> {
	templates::render(
		PAGE,
		&PageContext {
			page,
			static_css: STATIC_CSS,
		},
	)
}
