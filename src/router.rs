//! Method and path dispatch.
//!
//! Patterns use `{name}` placeholders that capture one path segment, e.g.
//! `/api/public/v1/embeds/{embedId}/data`.

use async_trait::async_trait;
use formpress_http::{Error, Handler, Request, Response, Result};
use hyper::Method;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A compiled route pattern.
#[derive(Debug, Clone)]
pub struct PathPattern {
	pattern: String,
	regex: Regex,
	param_names: Vec<String>,
}

impl PathPattern {
	/// Compiles `pattern`.
	///
	/// # Errors
	///
	/// Fails if a placeholder is unterminated or has an invalid name.
	///
	/// # Examples
	///
	/// ```
	/// use formpress::router::PathPattern;
	///
	/// let pattern = PathPattern::new("/f/{formId}").unwrap();
	/// let params = pattern.matches("/f/42").unwrap();
	/// assert_eq!(params.get("formId").map(String::as_str), Some("42"));
	/// assert!(pattern.matches("/f/42/extra").is_none());
	/// ```
	pub fn new(pattern: &str) -> std::result::Result<Self, String> {
		let (regex_str, param_names) = Self::compile(pattern)?;
		let regex = Regex::new(&regex_str)
			.map_err(|e| format!("invalid route pattern {pattern:?}: {e}"))?;
		Ok(Self {
			pattern: pattern.to_string(),
			regex,
			param_names,
		})
	}

	fn compile(pattern: &str) -> std::result::Result<(String, Vec<String>), String> {
		let mut regex_str = String::from("^");
		let mut param_names = Vec::new();
		let mut chars = pattern.chars();

		while let Some(c) = chars.next() {
			if c != '{' {
				regex_str.push_str(&regex::escape(c.encode_utf8(&mut [0; 4])));
				continue;
			}

			let mut name = String::new();
			loop {
				match chars.next() {
					Some('}') => break,
					Some(c) if c.is_ascii_alphanumeric() || c == '_' => name.push(c),
					_ => return Err(format!("invalid placeholder in route pattern {pattern:?}")),
				}
			}
			if name.is_empty() {
				return Err(format!("empty placeholder in route pattern {pattern:?}"));
			}
			regex_str.push_str(&format!("(?P<{name}>[^/]+)"));
			param_names.push(name);
		}

		regex_str.push('$');
		Ok((regex_str, param_names))
	}

	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	pub fn param_names(&self) -> &[String] {
		&self.param_names
	}

	/// Captured parameters if `path` matches.
	pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
		let caps = self.regex.captures(path)?;
		Some(
			self.param_names
				.iter()
				.filter_map(|name| caps.name(name).map(|m| (name.clone(), m.as_str().to_string())))
				.collect(),
		)
	}
}

impl fmt::Display for PathPattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.pattern)
	}
}

struct Route {
	method: Method,
	pattern: PathPattern,
	handler: Arc<dyn Handler>,
}

/// Dispatches requests to the first route matching method and path.
///
/// A path that matches some route under another method yields 405.
#[derive(Default)]
pub struct Router {
	routes: Vec<Route>,
}

impl Router {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a route.
	///
	/// # Panics
	///
	/// Panics if `pattern` does not compile. Routes are fixed at startup.
	pub fn route(mut self, method: Method, pattern: &str, handler: Arc<dyn Handler>) -> Self {
		let pattern = PathPattern::new(pattern).unwrap_or_else(|err| panic!("{err}"));
		self.routes.push(Route {
			method,
			pattern,
			handler,
		});
		self
	}

	pub fn get(self, pattern: &str, handler: Arc<dyn Handler>) -> Self {
		self.route(Method::GET, pattern, handler)
	}

	pub fn post(self, pattern: &str, handler: Arc<dyn Handler>) -> Self {
		self.route(Method::POST, pattern, handler)
	}

	pub fn len(&self) -> usize {
		self.routes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.routes.is_empty()
	}
}

#[async_trait]
impl Handler for Router {
	async fn handle(&self, mut request: Request) -> Result<Response> {
		let mut path_matched = false;

		for route in &self.routes {
			let Some(params) = route.pattern.matches(request.path()) else {
				continue;
			};
			// HEAD is served by GET routes
			let method_ok = route.method == request.method
				|| (route.method == Method::GET && request.method == Method::HEAD);
			if !method_ok {
				path_matched = true;
				continue;
			}

			for (name, value) in params {
				request.set_path_param(name, value);
			}
			return route.handler.handle(request).await;
		}

		if path_matched {
			Err(Error::MethodNotAllowed("method not allowed".into()))
		} else {
			Err(Error::NotFound("not found".into()))
		}
	}
}
