use async_trait::async_trait;
use formpress_http::{Handler, Middleware, Request, Response, Result};
use std::sync::Arc;
use std::time::Instant;

use super::audit::RequestContext;

/// Logs one event per request with method, path, status and latency.
#[derive(Debug, Default)]
pub struct LoggingMiddleware;

#[async_trait]
impl Middleware for LoggingMiddleware {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let start = Instant::now();
		let method = request.method.clone();
		let path = request.path().to_string();
		let ctx = request.extensions.get::<RequestContext>().cloned();
		let (request_id, client_ip) = ctx
			.map(|ctx| (ctx.request_id, ctx.client_ip))
			.unwrap_or_default();

		let result = next.handle(request).await;
		let latency_ms = start.elapsed().as_millis() as u64;
		let status = match &result {
			Ok(response) => response.status.as_u16(),
			Err(err) => err.status_code(),
		};

		if status >= 500 {
			tracing::error!(
				%method,
				%path,
				status,
				latency_ms,
				%request_id,
				%client_ip,
				"request failed"
			);
		} else {
			tracing::info!(
				%method,
				%path,
				status,
				latency_ms,
				%request_id,
				%client_ip,
				"request completed"
			);
		}

		result
	}
}
