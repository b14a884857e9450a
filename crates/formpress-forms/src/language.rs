//! Language negotiation.

use crate::definition::LanguageSettings;

/// Picks the language a form is rendered in.
///
/// An empty or unsupported request falls back to the form's default.
///
/// # Examples
///
/// ```
/// use formpress_forms::{LanguageSettings, select_best_language};
///
/// let languages = LanguageSettings { default: "en".into(), supported: vec!["en".into(), "de".into()] };
/// assert_eq!(select_best_language("de", &languages), "de");
/// assert_eq!(select_best_language("fr", &languages), "en");
/// assert_eq!(select_best_language("", &languages), "en");
/// ```
pub fn select_best_language<'a>(requested: &'a str, settings: &'a LanguageSettings) -> &'a str {
	if requested.is_empty() {
		return &settings.default;
	}
	if settings.supported.iter().any(|lang| lang == requested) {
		requested
	} else {
		&settings.default
	}
}

/// Language a widget asks the server for.
///
/// The container attribute wins, then the primary subtag of the browser
/// language. An empty result lets the server choose.
pub fn detect_language(container_lang: Option<&str>, browser_language: Option<&str>) -> String {
	if let Some(lang) = container_lang.map(str::trim)
		&& !lang.is_empty()
	{
		return lang.to_string();
	}
	browser_language
		.and_then(|tag| tag.split('-').next())
		.map(str::trim)
		.unwrap_or_default()
		.to_string()
}
