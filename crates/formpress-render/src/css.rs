//! Per-form stylesheet generation.

use std::fmt::Write;

use formpress_forms::{FormStyling, LayoutSettings};

use crate::classes::classes_to_css;

const LABEL_WIDTHS: [u32; 4] = [25, 30, 40, 50];
const ALIGNMENTS: [&str; 3] = ["left", "right", "center"];
const MEDIA_QUERIES: [(&str, &str); 3] = [
	("mobile", "@media (max-width: 767px)"),
	("tablet", "@media (min-width: 768px) and (max-width: 1023px)"),
	("desktop", "@media (min-width: 1024px)"),
];

/// Removes constructs that could escape a style block or run script.
///
/// # Examples
///
/// ```
/// use formpress_render::sanitize_css;
///
/// assert_eq!(sanitize_css("color: red; background: url(javascript:x)</style>"), "color: red; background: url(x)/style");
/// ```
pub fn sanitize_css(css: &str) -> String {
	css.replace("javascript:", "")
		.replace("expression(", "")
		.replace("@import", "")
		.replace(['<', '>'], "")
}

/// Input width paired with a label width. Unknown widths count as 30.
pub fn input_width(label_width: &str) -> u32 {
	let width = label_width
		.parse::<u32>()
		.ok()
		.filter(|w| LABEL_WIDTHS.contains(w))
		.unwrap_or(30);
	100 - width
}

/// Builds the dynamic stylesheet for a form.
///
/// Layout rules come first, then one rule per styled part of each field
/// type in document order, then layout override rules for that type.
pub fn generate_field_css(styling: &FormStyling) -> String {
	let mut css = generate_layout_css();

	for (field_type, style) in &styling.styling.field_styling {
		let t = field_type.as_str();
		let mut rule = |selector: String, classes: &str| {
			if !classes.is_empty() {
				let _ = writeln!(
					css,
					"{} {{ {} }}",
					selector,
					sanitize_css(&classes_to_css(classes))
				);
			}
		};

		rule(format!(".field-type-{t} .form-field"), &style.wrapper);
		rule(format!(".field-type-{t} .form-field label"), &style.label);
		rule(
			format!(".field-type-{t} .form-field input, .field-type-{t} .form-field textarea, .field-type-{t} .form-field select"),
			&style.input,
		);
		rule(
			format!(
				".field-type-{t} h1, .field-type-{t} h2, .field-type-{t} h3, .field-type-{t} h4, .field-type-{t} h5, .field-type-{t} h6, .field-type-{t} p"
			),
			&style.element,
		);
		rule(format!(".field-type-{t} .form-field .error"), &style.error);
		rule(format!(".field-type-{t} .form-field button"), &style.button);

		if let Some(layout) = &style.layout_override {
			css.push_str(&generate_field_layout_css(t, layout));
		}
	}

	css
}

/// Responsive rules for every label width and alignment.
///
/// Field overrides and breakpoints may select any of them, so the full set
/// is always emitted.
pub fn generate_layout_css() -> String {
	let mut css = String::new();

	for (bp, query) in MEDIA_QUERIES {
		for width in LABEL_WIDTHS {
			let _ = write!(
				css,
				r#"
{query} {{
	/* {bp} - Inline layout with {width}% label width */
	.fp-{bp}-label-width-{width} .form-field.fp-{bp}-layout-inline {{
		display: flex;
		align-items: flex-start;
		gap: 1rem;
	}}
	.fp-{bp}-label-width-{width} .form-field.fp-{bp}-layout-inline .inline-label {{
		width: {width}%;
		flex-shrink: 0;
		padding-top: 0.75rem;
	}}
	.fp-{bp}-label-width-{width} .form-field.fp-{bp}-layout-inline .inline-input {{
		width: {input}%;
		flex-grow: 1;
	}}

	/* {bp} - Layout type overrides */
	.fp-{bp}-layout-stacked .form-field {{
		display: block !important;
	}}
	.fp-{bp}-layout-stacked .form-field .inline-label {{
		width: auto !important;
		padding-top: 0 !important;
		margin-bottom: 0.5rem !important;
		display: block !important;
	}}
	.fp-{bp}-layout-stacked .form-field .inline-input {{
		width: 100% !important;
	}}

	.fp-{bp}-layout-inline .form-field {{
		display: flex !important;
		align-items: flex-start !important;
		gap: 1rem !important;
	}}

	.fp-{bp}-layout-floating .form-field {{
		position: relative !important;
	}}

	.fp-{bp}-layout-hidden .form-field label {{
		display: none !important;
	}}
}}
"#,
				input = input_width(&width.to_string()),
			);
		}

		for align in ALIGNMENTS {
			let _ = write!(
				css,
				r#"
{query} {{
	.fp-{bp}-label-align-{align} .inline-label {{
		text-align: {align} !important;
	}}
}}
"#
			);
		}
	}

	css
}

/// Extra rules for field types whose override uses a floating or hidden
/// label.
pub fn generate_field_layout_css(field_type: &str, layout: &LayoutSettings) -> String {
	let t = field_type;
	match layout.label_layout.as_str() {
		"floating" => format!(
			r#"
/* Floating label for {t} fields */
.field-type-{t} .fp-layout-floating .floating-input-container {{
	position: relative;
}}
.field-type-{t} .fp-layout-floating .floating-label {{
	position: absolute;
	top: 0.75rem;
	left: 0.75rem;
	background: white;
	padding: 0 0.25rem;
	transition: all 0.2s ease-in-out;
	pointer-events: none;
	color: #6b7280;
}}
.field-type-{t} .fp-layout-floating input:focus + .floating-label,
.field-type-{t} .fp-layout-floating input:not(:placeholder-shown) + .floating-label,
.field-type-{t} .fp-layout-floating textarea:focus + .floating-label,
.field-type-{t} .fp-layout-floating textarea:not(:placeholder-shown) + .floating-label {{
	top: -0.5rem;
	font-size: 0.75rem;
	color: #3b82f6;
}}
"#
		),
		"hidden" => format!(
			r#"
/* Hidden label for {t} fields */
.field-type-{t} .fp-layout-hidden label {{
	display: none;
}}
"#
		),
		_ => String::new(),
	}
}
