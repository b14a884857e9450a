//! Cross-origin access for embedding pages.

use async_trait::async_trait;
use formpress_conf::CorsSettings;
use formpress_http::{Handler, Middleware, Request, Response, Result};
use hyper::Method;
use hyper::header::{self, HeaderValue};
use std::sync::Arc;

const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const ALLOW_HEADERS: &str = "Accept, Authorization, Content-Type, X-CSRF-Token, X-Requested-With";
const EXPOSE_HEADERS: &str = "Link, X-Form-Language";

/// CORS middleware configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
	/// Origin patterns. A trailing `*` matches any suffix.
	pub allowed_origins: Vec<String>,
	pub max_age_secs: u64,
}

impl Default for CorsConfig {
	fn default() -> Self {
		Self::from(&CorsSettings::default())
	}
}

impl From<&CorsSettings> for CorsConfig {
	fn from(settings: &CorsSettings) -> Self {
		Self {
			allowed_origins: settings.allowed_origins.clone(),
			max_age_secs: settings.max_age_secs,
		}
	}
}

impl CorsConfig {
	/// Whether `origin` matches one of the allowed patterns.
	///
	/// # Examples
	///
	/// ```
	/// use formpress::middleware::CorsConfig;
	///
	/// let config = CorsConfig::default();
	/// assert!(config.allows("https://shop.example.com"));
	/// assert!(!config.allows("chrome-extension://abc"));
	/// ```
	pub fn allows(&self, origin: &str) -> bool {
		self.allowed_origins.iter().any(|pattern| match pattern.strip_suffix('*') {
			Some(prefix) => origin.len() > prefix.len() && origin.starts_with(prefix),
			None => origin == pattern,
		})
	}
}

/// Echoes allowed origins and answers preflight requests.
pub struct CorsMiddleware {
	config: CorsConfig,
}

impl CorsMiddleware {
	pub fn new(config: CorsConfig) -> Self {
		Self { config }
	}

	fn apply(&self, mut response: Response, origin: Option<&str>) -> Response {
		let Some(origin) = origin.filter(|o| self.config.allows(o)) else {
			return response;
		};
		let Ok(origin) = HeaderValue::from_str(origin) else {
			return response;
		};

		let headers = &mut response.headers;
		headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
		headers.insert(
			header::ACCESS_CONTROL_ALLOW_METHODS,
			HeaderValue::from_static(ALLOW_METHODS),
		);
		headers.insert(
			header::ACCESS_CONTROL_ALLOW_HEADERS,
			HeaderValue::from_static(ALLOW_HEADERS),
		);
		headers.insert(
			header::ACCESS_CONTROL_EXPOSE_HEADERS,
			HeaderValue::from_static(EXPOSE_HEADERS),
		);
		headers.insert(header::ACCESS_CONTROL_MAX_AGE, HeaderValue::from(self.config.max_age_secs));
		headers.append(header::VARY, HeaderValue::from_static("Origin"));
		response
	}
}

#[async_trait]
impl Middleware for CorsMiddleware {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let origin = request.header("origin").map(str::to_string);

		if request.method == Method::OPTIONS {
			let response = Response::no_content().with_stop_chain(true);
			return Ok(self.apply(response, origin.as_deref()));
		}

		// Error responses carry CORS headers as well
		let response = next.handle(request).await.unwrap_or_else(Response::from);
		Ok(self.apply(response, origin.as_deref()))
	}
}
