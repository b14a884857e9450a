//! Host containers that request a form.

use std::collections::HashMap;

use indexmap::IndexMap;

/// Attribute holding the embed id.
pub const FORM_ATTR: &str = "data-formpress-form";
/// Attribute holding the requested language.
pub const LANG_ATTR: &str = "data-formpress-lang";
/// Attribute enabling reload on language change.
pub const RELOAD_ATTR: &str = "data-formpress-reload-on-change";

/// Read access to the attributes of a host element.
pub trait HostElement {
	fn attribute(&self, name: &str) -> Option<&str>;
}

impl HostElement for HashMap<String, String> {
	fn attribute(&self, name: &str) -> Option<&str> {
		self.get(name).map(String::as_str)
	}
}

impl HostElement for IndexMap<String, String> {
	fn attribute(&self, name: &str) -> Option<&str> {
		self.get(name).map(String::as_str)
	}
}

/// A host element marked as a form container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedContainer {
	pub embed_id: String,
	pub lang: Option<String>,
	pub reload_on_change: bool,
}

impl EmbedContainer {
	pub fn new(embed_id: impl Into<String>) -> Self {
		Self {
			embed_id: embed_id.into(),
			lang: None,
			reload_on_change: false,
		}
	}

	pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
		self.lang = Some(lang.into());
		self
	}

	pub fn with_reload_on_change(mut self, enabled: bool) -> Self {
		self.reload_on_change = enabled;
		self
	}

	/// Reads a container from element attributes.
	///
	/// Returns `None` when the embed id is missing or empty.
	pub fn from_element<E: HostElement + ?Sized>(element: &E) -> Option<Self> {
		let embed_id = element.attribute(FORM_ATTR).filter(|id| !id.is_empty())?;
		Some(Self {
			embed_id: embed_id.to_string(),
			lang: element.attribute(LANG_ATTR).map(str::to_string),
			reload_on_change: element.attribute(RELOAD_ATTR) == Some("true"),
		})
	}
}

/// Containers among `elements`, in document order.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use formpress_widget::locate_containers;
///
/// let elements = vec![
///     HashMap::from([("data-formpress-form".to_string(), "a1".to_string())]),
///     HashMap::from([("class".to_string(), "sidebar".to_string())]),
/// ];
///
/// let containers = locate_containers(&elements);
/// assert_eq!(containers.len(), 1);
/// assert_eq!(containers[0].embed_id, "a1");
/// ```
pub fn locate_containers<E: HostElement>(elements: &[E]) -> Vec<EmbedContainer> {
	let containers: Vec<EmbedContainer> = elements
		.iter()
		.filter_map(|element| {
			let container = EmbedContainer::from_element(element);
			if container.is_none() && element.attribute(FORM_ATTR).is_some() {
				tracing::warn!("form container missing {} value", FORM_ATTR);
			}
			container
		})
		.collect();
	tracing::debug!(count = containers.len(), "located form containers");
	containers
}
