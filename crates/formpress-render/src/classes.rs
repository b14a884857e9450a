//! Utility class translation.
//!
//! Form styling documents are authored with utility classes. The embed runs
//! inside arbitrary host pages, so every class is rewritten to the `fp-`
//! namespace provided by the bundled stylesheet, or turned into plain CSS
//! declarations for field styling rules.

use once_cell::sync::Lazy;
use std::collections::HashMap;

static CLASS_MAP: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
	HashMap::from([
		// Grid
		("grid", "fp-grid"),
		("grid-cols-1", ""),
		("grid-cols-12", "fp-lg-grid-cols-12"),
		("lg:grid-cols-12", "fp-lg-grid-cols-12"),
		// Layout and spacing
		("gap-4", "fp-gap-4"),
		("gap-6", "fp-gap-6"),
		("space-y-4", "fp-space-y-4"),
		("space-y-8", "fp-space-y-8"),
		("hidden", "fp-hidden"),
		("block", "fp-block"),
		("lg:block", "fp-lg-block"),
		("flex", "fp-flex"),
		("items-center", "fp-items-center"),
		// Sizing
		("max-w-7xl", "fp-max-w-7xl"),
		("mx-auto", "fp-mx-auto"),
		("p-6", "fp-p-6"),
		("sm:p-8", "fp-sm-p-8"),
		("w-full", "fp-w-full"),
		("h-fit", "fp-h-fit"),
		// Colors
		("bg-white", "fp-bg-white"),
		("bg-gray-50", "fp-bg-gray-50"),
		("bg-green-600", "fp-bg-green-600"),
		("hover:bg-green-700", "fp-hover-bg-green-700"),
		("text-white", "fp-text-white"),
		("text-gray-700", "fp-text-gray-700"),
		("text-gray-900", "fp-text-gray-900"),
		("text-red-600", "fp-text-red-600"),
		("text-blue-600", "fp-text-blue-600"),
		// Borders
		("rounded-lg", "fp-rounded-lg"),
		("rounded", "fp-rounded"),
		("border", "fp-border"),
		("border-gray-300", "fp-border-gray-300"),
		("border-b-2", "fp-border-b-2"),
		("border-gray-200", "fp-border-gray-200"),
		// Typography
		("text-2xl", "fp-text-2xl"),
		("text-lg", "fp-text-lg"),
		("text-sm", "fp-text-sm"),
		("font-bold", "fp-font-bold"),
		("font-semibold", "fp-font-semibold"),
		("font-medium", "fp-font-medium"),
		// Spacing
		("mb-2", "fp-mb-2"),
		("mb-4", "fp-mb-4"),
		("mb-6", "fp-mb-6"),
		("mt-2", "fp-mt-2"),
		("mt-8", "fp-mt-8"),
		("px-4", "fp-px-4"),
		("px-8", "fp-px-8"),
		("py-3", "fp-py-3"),
		("py-4", "fp-py-4"),
		("pb-2", "fp-pb-2"),
		("mr-2", "fp-mr-2"),
		("h-4", "fp-h-4"),
		("w-4", "fp-w-4"),
		// Position
		("sticky", "fp-sticky"),
		("top-4", "fp-top-4"),
		// Interaction
		("focus:ring-2", "fp-focus-ring-2"),
		("focus:ring-blue-500", "fp-focus-ring-blue-500"),
		("focus:ring-green-500", "fp-focus-ring-green-500"),
		("focus:border-blue-500", "fp-focus-border-blue-500"),
		("focus:outline-none", "fp-focus-outline-none"),
		("focus:ring-offset-2", "fp-focus-ring-offset-2"),
		("transition-colors", "fp-transition-colors"),
		("duration-200", "fp-duration-200"),
	])
});

static CSS_MAP: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
	HashMap::from([
		("mb-4", "margin-bottom: 1rem;"),
		("mb-6", "margin-bottom: 1.5rem;"),
		("mb-2", "margin-bottom: 0.5rem;"),
		("mt-8", "margin-top: 2rem;"),
		("mt-2", "margin-top: 0.5rem;"),
		("block", "display: block;"),
		("flex", "display: flex;"),
		("items-center", "align-items: center;"),
		("text-sm", "font-size: 0.875rem; line-height: 1.25rem;"),
		("text-lg", "font-size: 1.125rem; line-height: 1.75rem;"),
		("text-2xl", "font-size: 1.5rem; line-height: 2rem;"),
		("font-medium", "font-weight: 500;"),
		("font-semibold", "font-weight: 600;"),
		("font-bold", "font-weight: 700;"),
		("text-gray-700", "color: #374151;"),
		("text-gray-900", "color: #111827;"),
		("text-red-600", "color: #dc2626;"),
		("text-blue-600", "color: #2563eb;"),
		("text-white", "color: #ffffff;"),
		("bg-green-600", "background-color: #059669;"),
		("hover:bg-green-700", "background-color: #047857;"),
		("bg-gray-50", "background-color: #f9fafb;"),
		("bg-white", "background-color: #ffffff;"),
		("w-full", "width: 100%;"),
		("px-4", "padding-left: 1rem; padding-right: 1rem;"),
		("py-3", "padding-top: 0.75rem; padding-bottom: 0.75rem;"),
		("py-4", "padding-top: 1rem; padding-bottom: 1rem;"),
		("px-8", "padding-left: 2rem; padding-right: 2rem;"),
		("p-6", "padding: 1.5rem;"),
		("border", "border-width: 1px;"),
		("border-gray-300", "border-color: #d1d5db;"),
		("border-b-2", "border-bottom-width: 2px;"),
		("border-gray-200", "border-color: #e5e7eb;"),
		("rounded-lg", "border-radius: 0.5rem;"),
		("rounded", "border-radius: 0.25rem;"),
		("focus:ring-2", "outline: none;"),
		("focus:ring-blue-500", "box-shadow: 0 0 0 2px rgba(59, 130, 246, 0.5);"),
		("focus:border-blue-500", "border-color: #3b82f6;"),
		(
			"transition-colors",
			"transition: color 0.15s ease-in-out, background-color 0.15s ease-in-out, border-color 0.15s ease-in-out;",
		),
		("duration-200", "transition-duration: 0.2s;"),
		("mr-2", "margin-right: 0.5rem;"),
		("h-4", "height: 1rem;"),
		("w-4", "width: 1rem;"),
		("pb-2", "padding-bottom: 0.5rem;"),
	])
});

/// Column span utilities are dropped; spans come from `responsive_spans`.
fn is_column_span(class: &str) -> bool {
	let bare = ["lg:", "md:", "sm:"]
		.iter()
		.find_map(|prefix| class.strip_prefix(prefix))
		.unwrap_or(class);
	bare.strip_prefix("col-span-")
		.and_then(|n| n.parse::<u8>().ok())
		.is_some_and(|n| (1..=12).contains(&n))
}

/// Rewrites utility classes into the `fp-` namespace.
///
/// Unknown classes are kept unchanged and dropped mappings are removed.
///
/// # Examples
///
/// ```
/// use formpress_render::transform_classes;
///
/// assert_eq!(transform_classes("grid gap-4 lg:col-span-6 my-custom"), "fp-grid fp-gap-4 my-custom");
/// ```
pub fn transform_classes(classes: &str) -> String {
	classes
		.split_whitespace()
		.filter(|class| !is_column_span(class))
		.filter_map(|class| match CLASS_MAP.get(class) {
			Some(mapped) if mapped.is_empty() => None,
			Some(mapped) => Some(*mapped),
			None => Some(class),
		})
		.collect::<Vec<_>>()
		.join(" ")
}

/// Turns utility classes into CSS declarations.
///
/// Input that already looks like CSS, containing `:` and either `;` or no
/// whitespace, is returned unchanged. Unknown classes are skipped.
pub fn classes_to_css(classes: &str) -> String {
	if classes.contains(':') && (classes.contains(';') || !classes.contains(' ')) {
		return classes.to_string();
	}
	classes
		.split_whitespace()
		.filter_map(|class| CSS_MAP.get(class).copied())
		.collect::<Vec<_>>()
		.join(" ")
}

/// Text format classes for heading and paragraph fields.
///
/// The format is a bit set: 1 bold, 2 italic, 4 underline.
pub fn format_classes(format: u8) -> &'static str {
	match format {
		1 => "fp-font-bold",
		2 => "fp-font-italic",
		3 => "fp-font-bold fp-font-italic",
		4 => "fp-underline",
		5 => "fp-font-bold fp-underline",
		6 => "fp-font-italic fp-underline",
		7 => "fp-font-bold fp-font-italic fp-underline",
		_ => "",
	}
}

pub fn alignment_classes(alignment: &str) -> &'static str {
	match alignment {
		"center" => "fp-text-center",
		"right" => "fp-text-right",
		_ => "",
	}
}
