//! Canvas layout and styling model.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Layout grid plus per-type styling for one form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormStyling {
	pub canvas_layout: CanvasLayout,
	pub styling: Styling,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasLayout {
	pub grid_system: String,
	pub responsive_breakpoints: IndexMap<String, String>,
	pub container_classes: String,
	pub rows: Vec<Row>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Row {
	pub id: String,
	pub columns: Vec<Column>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Column {
	pub id: String,
	/// Spans keyed by breakpoint (`xl`, `lg`, `md`, `sm`).
	pub responsive_spans: IndexMap<String, i64>,
	pub responsive_classes: String,
	pub column_classes: String,
	pub gap: String,
	pub fields: Vec<FieldReference>,
}

impl Column {
	/// Span for a breakpoint, if set and positive.
	pub fn span(&self, breakpoint: &str) -> Option<i64> {
		self.responsive_spans
			.get(breakpoint)
			.copied()
			.filter(|span| *span > 0)
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldReference {
	pub field_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Styling {
	pub form_container: FormContainerStyle,
	pub layout_default: LayoutSettings,
	pub field_styling: IndexMap<String, FieldTypeStyle>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormContainerStyle {
	pub classes: String,
}

/// Utility classes applied to the parts of one field type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldTypeStyle {
	#[serde(skip_serializing_if = "String::is_empty")]
	pub wrapper: String,
	#[serde(skip_serializing_if = "String::is_empty")]
	pub label: String,
	#[serde(skip_serializing_if = "String::is_empty")]
	pub input: String,
	/// Heading and paragraph element classes.
	#[serde(skip_serializing_if = "String::is_empty")]
	pub element: String,
	#[serde(skip_serializing_if = "String::is_empty")]
	pub error: String,
	#[serde(skip_serializing_if = "String::is_empty")]
	pub button: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub layout_override: Option<LayoutSettings>,
}

/// Label placement: `stacked`, `inline`, `floating` or `hidden`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
	#[serde(skip_serializing_if = "String::is_empty")]
	pub label_layout: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub inline_settings: Option<InlineSettings>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub responsive_behaviors: Option<ResponsiveBehaviors>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InlineSettings {
	/// Percentage such as `30%`.
	pub label_width: String,
	pub label_alignment: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponsiveBehaviors {
	pub mobile: String,
	pub tablet: String,
	pub desktop: String,
}

impl ResponsiveBehaviors {
	/// Layout for a breakpoint name; empty when unset or unknown.
	pub fn for_breakpoint(&self, breakpoint: &str) -> &str {
		match breakpoint {
			"mobile" => &self.mobile,
			"tablet" => &self.tablet,
			"desktop" => &self.desktop,
			_ => "",
		}
	}

	pub fn is_empty(&self) -> bool {
		self.mobile.is_empty() && self.tablet.is_empty() && self.desktop.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_partial_document_uses_defaults() {
		// Arrange
		let value = json!({
			"canvas_layout": {
				"rows": [{"id": "r1", "columns": [{"id": "c1", "responsive_spans": {"lg": 6, "sm": 0}, "fields": [{"field_id": "f1"}]}]}]
			},
			"styling": {
				"layout_default": {"label_layout": "inline", "inline_settings": {"label_width": "40%", "label_alignment": "right"}},
				"field_styling": {"text": {"input": "border p-2", "layout_override": {"label_layout": "floating"}}}
			}
		});

		// Act
		let styling: FormStyling = serde_json::from_value(value).unwrap();

		// Assert
		let column = &styling.canvas_layout.rows[0].columns[0];
		assert_eq!(column.span("lg"), Some(6));
		assert_eq!(column.span("sm"), None);
		assert_eq!(column.span("xl"), None);
		assert_eq!(column.fields[0].field_id, "f1");
		assert_eq!(styling.styling.layout_default.label_layout, "inline");
		assert_eq!(
			styling.styling.field_styling["text"]
				.layout_override
				.as_ref()
				.unwrap()
				.label_layout,
			"floating"
		);
		assert!(styling.styling.form_container.classes.is_empty());
	}

	#[rstest]
	#[case("mobile", "stacked")]
	#[case("tablet", "")]
	#[case("desktop", "inline")]
	#[case("watch", "")]
	fn test_behavior_for_breakpoint(#[case] breakpoint: &str, #[case] expected: &str) {
		// Arrange
		let behaviors = ResponsiveBehaviors {
			mobile: "stacked".into(),
			tablet: String::new(),
			desktop: "inline".into(),
		};

		// Act & Assert
		assert_eq!(behaviors.for_breakpoint(breakpoint), expected);
		assert!(!behaviors.is_empty());
	}
}
