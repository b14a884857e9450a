//! Public embed API used by the widget.

use async_trait::async_trait;
use formpress_forms::{SubmissionPayload, validate_submission};
use formpress_http::{Error, Handler, Request, Response, Result};
use serde_json::json;
use std::sync::Arc;

use super::{requested_language, uuid_param};
use crate::errors::{from_form, from_remote, from_render};
use crate::state::AppState;

pub const DATA_CONTENT_TYPE: &str = "text/json; charset=utf-8";
pub const DATA_CACHE_CONTROL: &str = "public, max-age=300, stale-while-revalidate=60";
pub const SUCCESS_MESSAGE: &str = "Form submitted successfully!";

/// `GET /api/public/v1/embeds/{embedId}/data`
pub struct EmbedDataHandler {
	state: Arc<AppState>,
}

impl EmbedDataHandler {
	pub fn new(state: Arc<AppState>) -> Self {
		Self { state }
	}
}

#[async_trait]
impl Handler for EmbedDataHandler {
	async fn handle(&self, request: Request) -> Result<Response> {
		let embed_id = uuid_param(&request, "embedId", "invalid embed ID")?;

		let record = self.state.source().get_form(embed_id).await.map_err(|err| {
			tracing::error!(embed_id = %embed_id, error = %err, "failed to get form");
			Error::Internal("failed to get form from form service".into())
		})?;

		let rendered = self
			.state
			.render_form(&record, &requested_language(&request))
			.map_err(from_render)?;
		let lang = rendered.lang.clone();

		Ok(Response::ok()
			.with_json(&json!({ "data": rendered }))?
			.with_content_type(DATA_CONTENT_TYPE)
			.with_header("Cache-Control", DATA_CACHE_CONTROL)
			.with_header("X-Form-Language", &lang))
	}
}

/// `POST /api/public/v1/embeds/{embedId}/submissions`
///
/// Accepts JSON or urlencoded bodies, validates them against the form
/// definition and forwards them to the form service.
pub struct SubmissionHandler {
	state: Arc<AppState>,
}

impl SubmissionHandler {
	pub fn new(state: Arc<AppState>) -> Self {
		Self { state }
	}
}

#[async_trait]
impl Handler for SubmissionHandler {
	async fn handle(&self, request: Request) -> Result<Response> {
		let embed_id = uuid_param(&request, "embedId", "invalid embed ID")?;
		let payload = SubmissionPayload::parse(request.content_type().as_deref(), &request.body)
			.map_err(from_form)?;

		let source = self.state.source();
		let record = source.get_form(embed_id).await.map_err(from_remote)?;
		validate_submission(&record.form_definition, &requested_language(&request), &payload)
			.map_err(from_form)?;

		source
			.submit_form(embed_id, &payload.to_json(), &request.headers)
			.await
			.map_err(from_remote)?;
		tracing::info!(embed_id = %embed_id, fields = payload.len(), "submission forwarded");

		Response::ok().with_json(&json!({
			"success": true,
			"message": SUCCESS_MESSAGE,
			"embedId": embed_id,
		}))
	}
}
