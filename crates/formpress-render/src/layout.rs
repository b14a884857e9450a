//! Label layout resolution and layout classes.

use formpress_forms::{FormStyling, LayoutSettings};

/// Breakpoints in the order their classes are emitted.
pub const BREAKPOINTS: [&str; 3] = ["mobile", "tablet", "desktop"];

pub const DEFAULT_LABEL_LAYOUT: &str = "stacked";

fn apply_override(
	layout: &mut LayoutSettings,
	styling: &FormStyling,
	field_type: &str,
	responsive: bool,
) {
	let Some(overrides) = styling
		.styling
		.field_styling
		.get(field_type)
		.and_then(|style| style.layout_override.as_ref())
	else {
		return;
	};
	if !overrides.label_layout.is_empty() {
		layout.label_layout = overrides.label_layout.clone();
	}
	if overrides.inline_settings.is_some() {
		layout.inline_settings = overrides.inline_settings.clone();
	}
	if responsive && overrides.responsive_behaviors.is_some() {
		layout.responsive_behaviors = overrides.responsive_behaviors.clone();
	}
}

fn with_fallback(mut layout: LayoutSettings) -> LayoutSettings {
	if layout.label_layout.is_empty() {
		layout.label_layout = DEFAULT_LABEL_LAYOUT.to_string();
	}
	layout
}

/// Effective layout of a field type at a breakpoint.
pub fn resolve_field_layout(
	styling: &FormStyling,
	field_type: &str,
	breakpoint: &str,
) -> LayoutSettings {
	let mut layout = styling.styling.layout_default.clone();
	apply_override(&mut layout, styling, field_type, true);

	if let Some(behaviors) = &layout.responsive_behaviors {
		let responsive = behaviors.for_breakpoint(breakpoint);
		if !responsive.is_empty() {
			layout.label_layout = responsive.to_string();
		}
	}
	with_fallback(layout)
}

/// Layout of a field type ignoring responsive behaviors.
pub fn resolve_base_layout(styling: &FormStyling, field_type: &str) -> LayoutSettings {
	let mut layout = styling.styling.layout_default.clone();
	apply_override(&mut layout, styling, field_type, false);
	with_fallback(layout)
}

/// Whether any responsive behavior applies to `field_type`.
pub fn has_responsive_behaviors(styling: &FormStyling, field_type: &str) -> bool {
	let global = styling
		.styling
		.layout_default
		.responsive_behaviors
		.as_ref()
		.is_some_and(|b| !b.is_empty());
	let field = styling
		.styling
		.field_styling
		.get(field_type)
		.and_then(|style| style.layout_override.as_ref())
		.and_then(|layout| layout.responsive_behaviors.as_ref())
		.is_some_and(|b| !b.is_empty());
	global || field
}

/// Layouts per breakpoint, empty when the field has no responsive behavior.
pub fn resolve_responsive_layouts(
	styling: &FormStyling,
	field_type: &str,
) -> Vec<(&'static str, LayoutSettings)> {
	if !has_responsive_behaviors(styling, field_type) {
		return Vec::new();
	}
	BREAKPOINTS
		.iter()
		.map(|bp| (*bp, resolve_field_layout(styling, field_type, bp)))
		.collect()
}

/// `fp-layout-{l} fp-{type}-layout-{l}`
pub fn layout_classes(layout: &LayoutSettings, field_type: &str) -> String {
	format!(
		"fp-layout-{l} fp-{t}-layout-{l}",
		l = layout.label_layout,
		t = field_type
	)
}

/// Label width and alignment classes for inline layouts.
pub fn label_layout_classes(layout: &LayoutSettings) -> String {
	match (&layout.inline_settings, layout.label_layout.as_str()) {
		(Some(inline), "inline") => format!(
			"fp-label-width-{} fp-label-align-{}",
			inline.label_width.replace('%', ""),
			inline.label_alignment
		),
		_ => String::new(),
	}
}

pub fn responsive_layout_classes(layouts: &[(&str, LayoutSettings)], field_type: &str) -> String {
	let mut classes = Vec::new();
	for (bp, layout) in layouts {
		let l = &layout.label_layout;
		classes.push(format!("fp-{bp}-layout-{l}"));
		classes.push(format!("fp-{field_type}-{bp}-layout-{l}"));
		if l == "inline"
			&& let Some(inline) = &layout.inline_settings
		{
			classes.push(format!("fp-{bp}-label-width-{}", inline.label_width.replace('%', "")));
			classes.push(format!("fp-{bp}-label-align-{}", inline.label_alignment));
		}
	}
	classes.join(" ")
}

/// Layout classes and structural layout for rendering one field.
#[derive(Debug, Clone)]
pub struct FieldLayout {
	/// Layout that decides the markup structure.
	pub primary: LayoutSettings,
	/// Classes for the `form-field` wrapper.
	pub classes: String,
	/// Extra classes for inline labels.
	pub label_classes: String,
}

impl FieldLayout {
	pub fn resolve(styling: &FormStyling, field_type: &str) -> Self {
		let base = resolve_base_layout(styling, field_type);
		let base_classes = layout_classes(&base, field_type);
		let label_classes = label_layout_classes(&base);

		let responsive = resolve_responsive_layouts(styling, field_type);
		let responsive_classes = responsive_layout_classes(&responsive, field_type);

		let primary = responsive
			.iter()
			.find(|(bp, _)| *bp == "desktop")
			.map(|(_, layout)| layout.clone())
			.unwrap_or(base);

		Self {
			primary,
			classes: format!("{} {}", base_classes, responsive_classes)
				.trim()
				.to_string(),
			label_classes,
		}
	}

	pub fn label_layout(&self) -> &str {
		&self.primary.label_layout
	}
}
