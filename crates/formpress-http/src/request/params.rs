use super::Request;
use hyper::Uri;
use percent_encoding::percent_decode_str;
use std::collections::HashMap;

impl Request {
	/// Parse query parameters from URI
	pub(super) fn parse_query_params(uri: &Uri) -> HashMap<String, String> {
		uri.query()
			.map(|q| {
				q.split('&')
					.filter(|pair| !pair.is_empty())
					.filter_map(|pair| {
						// Split on the first '=' only so values may contain '='
						let mut parts = pair.splitn(2, '=');
						Some((
							parts.next()?.to_string(),
							parts.next().unwrap_or("").to_string(),
						))
					})
					.collect()
			})
			.unwrap_or_default()
	}

	/// Get the request path
	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// Get a single URL-decoded query parameter.
	///
	/// `+` is treated as a space, matching form encoding.
	///
	/// # Examples
	///
	/// ```
	/// use formpress_http::Request;
	///
	/// let request = Request::builder()
	///     .uri("/data?lang=pt%2DBR&q=a+b")
	///     .build()
	///     .unwrap();
	///
	/// assert_eq!(request.query("lang").as_deref(), Some("pt-BR"));
	/// assert_eq!(request.query("q").as_deref(), Some("a b"));
	/// assert_eq!(request.query("missing"), None);
	/// ```
	pub fn query(&self, name: &str) -> Option<String> {
		self.decoded_query_params().remove(name)
	}

	/// Get URL-decoded query parameters
	pub fn decoded_query_params(&self) -> HashMap<String, String> {
		self.query_params
			.iter()
			.map(|(k, v)| (decode_component(k), decode_component(v)))
			.collect()
	}

	/// Set a path parameter (used by the router for `{name}` captures)
	pub fn set_path_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.path_params.insert(key.into(), value.into());
	}

	/// Get a captured path parameter.
	pub fn path_param(&self, key: &str) -> Option<&str> {
		self.path_params.get(key).map(String::as_str)
	}

	/// Get a header value as a string slice, ignoring non-ASCII values.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|v| v.to_str().ok())
	}

	/// The media type of the body, without parameters, lowercased.
	///
	/// # Examples
	///
	/// ```
	/// use formpress_http::Request;
	///
	/// let request = Request::builder()
	///     .header("Content-Type", "Application/JSON; charset=utf-8")
	///     .build()
	///     .unwrap();
	///
	/// assert_eq!(request.content_type().as_deref(), Some("application/json"));
	/// ```
	pub fn content_type(&self) -> Option<String> {
		self.header("content-type").map(|ct| {
			ct.split(';')
				.next()
				.unwrap_or_default()
				.trim()
				.to_ascii_lowercase()
		})
	}
}

fn decode_component(raw: &str) -> String {
	let spaced = raw.replace('+', " ");
	percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("/x?a=1&b=2", "a", Some("1"))]
	#[case("/x?token=abc==", "token", Some("abc=="))]
	#[case("/x?flag", "flag", Some(""))]
	#[case("/x?&&a=1", "a", Some("1"))]
	#[case("/x", "a", None)]
	fn test_parse_query_params(
		#[case] uri: &str,
		#[case] key: &str,
		#[case] expected: Option<&str>,
	) {
		// Arrange
		let request = Request::builder().uri(uri).build().unwrap();

		// Act & Assert
		assert_eq!(request.query_params.get(key).map(String::as_str), expected);
	}

	#[rstest]
	fn test_path_params() {
		// Arrange
		let mut request = Request::builder().uri("/f/123").build().unwrap();

		// Act
		request.set_path_param("formId", "123");

		// Assert
		assert_eq!(request.path(), "/f/123");
		assert_eq!(request.path_param("formId"), Some("123"));
		assert_eq!(request.path_param("other"), None);
	}

	#[rstest]
	fn test_content_type_absent() {
		// Arrange
		let request = Request::builder().build().unwrap();

		// Act & Assert
		assert_eq!(request.content_type(), None);
	}
}
