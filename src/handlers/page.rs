use async_trait::async_trait;
use formpress_http::{Handler, Request, Response, Result};
use std::sync::Arc;

use super::{requested_language, uuid_param};
use crate::errors::{from_remote, from_render};
use crate::state::AppState;

/// Serves `/f/{formId}`, the form as a standalone HTML page.
pub struct StandalonePageHandler {
	state: Arc<AppState>,
}

impl StandalonePageHandler {
	pub fn new(state: Arc<AppState>) -> Self {
		Self { state }
	}
}

#[async_trait]
impl Handler for StandalonePageHandler {
	async fn handle(&self, request: Request) -> Result<Response> {
		let form_id = uuid_param(&request, "formId", "invalid form ID")?;
		let record = self.state.source().get_form(form_id).await.map_err(from_remote)?;
		let html = self
			.state
			.render_page(&record, &requested_language(&request))
			.map_err(from_render)?;

		Ok(Response::ok()
			.with_content_type("text/html; charset=utf-8")
			.with_body(html))
	}
}
