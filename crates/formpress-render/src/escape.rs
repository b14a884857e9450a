//! HTML escaping.

/// Escapes text for use in element content and quoted attributes.
///
/// # Examples
///
/// ```
/// use formpress_render::escape_html;
///
/// assert_eq!(escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#), "&lt;a href=&#34;x&#34;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;");
/// ```
pub fn escape_html(input: &str) -> String {
	let mut escaped = String::with_capacity(input.len());
	for ch in input.chars() {
		match ch {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&#34;"),
			'\'' => escaped.push_str("&#39;"),
			'\0' => escaped.push('\u{FFFD}'),
			other => escaped.push(other),
		}
	}
	escaped
}
