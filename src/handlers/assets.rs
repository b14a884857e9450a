use async_trait::async_trait;
use formpress_http::{Handler, Request, Response, Result};
use std::sync::Arc;

use crate::errors::from_render;
use crate::state::AppState;

pub const SCRIPT_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// Serves `/embedv1.js`.
pub struct EmbedScriptHandler {
	state: Arc<AppState>,
}

impl EmbedScriptHandler {
	pub fn new(state: Arc<AppState>) -> Self {
		Self { state }
	}
}

#[async_trait]
impl Handler for EmbedScriptHandler {
	async fn handle(&self, _request: Request) -> Result<Response> {
		let script = self.state.embed_script().get().map_err(from_render)?;
		Ok(Response::ok()
			.with_content_type("application/javascript; charset=utf-8")
			.with_header("Cache-Control", SCRIPT_CACHE_CONTROL)
			.with_body(script.to_string()))
	}
}
