//! Bundled tera templates.
//!
//! Templates are compiled into the binary and registered once. Names ending
//! in `.html` are escaped with [`escape_html`]; script templates insert values
//! through `json_encode`.

use once_cell::sync::Lazy;
use serde::Serialize;
use tera::{Context, Tera};

use crate::error::RenderResult;
use crate::escape::escape_html;

pub(crate) const FORM: &str = "form.html";
pub(crate) const PAGE: &str = "page.html";
pub(crate) const EMBED_SCRIPT: &str = "embed.js";

static TERA: Lazy<Tera> = Lazy::new(|| {
	let mut tera = Tera::default();
	tera.autoescape_on(vec![".html"]);
	tera.set_escape_fn(escape_html);

	tera.add_raw_templates(vec![
		("core.js", include_str!("../templates/core.js")),
		("form_script.js", include_str!("../templates/form_script.js")),
		(EMBED_SCRIPT, include_str!("../templates/embed.js")),
		(FORM, include_str!("../templates/form.html")),
		(PAGE, include_str!("../templates/page.html")),
	])
	.expect("bundled templates must parse");

	tera
});

pub(crate) fn render<T: Serialize>(name: &str, data: &T) -> RenderResult<String> {
	let context = Context::from_serialize(data)?;
	let rendered = TERA.render(name, &context)?;
	tracing::trace!(template = name, bytes = rendered.len(), "rendered template");
	Ok(rendered)
}
