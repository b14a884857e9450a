use async_trait::async_trait;
use formpress_http::{Handler, Request, Response, Result};
use serde_json::json;

/// Liveness probe.
pub struct HealthHandler;

#[async_trait]
impl Handler for HealthHandler {
	async fn handle(&self, _request: Request) -> Result<Response> {
		Response::ok().with_json(&json!({"status": "ok"}))
	}
}
