//! Grid classes for canvas rows and columns.

use formpress_forms::Column;

use crate::classes::transform_classes;

pub const ROW_CLASSES: &str = "fp-grid fp-lg-grid-cols-12";

const SPAN_BREAKPOINTS: [&str; 4] = ["xl", "lg", "md", "sm"];

/// Classes for a column, largest breakpoint span first.
///
/// Every column ends with `fp-col-12` so it stacks on narrow screens.
///
/// # Examples
///
/// ```
/// use formpress_forms::Column;
/// use formpress_render::column_classes;
///
/// let mut column = Column::default();
/// column.responsive_spans.insert("lg".into(), 6);
/// column.column_classes = "bg-white".into();
///
/// assert_eq!(column_classes(&column), "fp-bg-white fp-lg-col-6 fp-col-12");
/// ```
pub fn column_classes(column: &Column) -> String {
	let mut classes: Vec<String> = Vec::new();

	for source in [&column.responsive_classes, &column.column_classes] {
		let mapped = transform_classes(source);
		if !mapped.is_empty() {
			classes.push(mapped);
		}
	}
	for bp in SPAN_BREAKPOINTS {
		if let Some(span) = column.span(bp) {
			classes.push(format!("fp-{bp}-col-{span}"));
		}
	}
	classes.push("fp-col-12".to_string());

	classes.join(" ")
}
