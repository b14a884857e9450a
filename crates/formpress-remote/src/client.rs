//! HTTP client for the form service.

use std::time::Duration;

use async_trait::async_trait;
use formpress_conf::RemoteSettings;
use http::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{RemoteError, RemoteResult};
use crate::model::{DataEnvelope, ErrorEnvelope, FormRecord};

const USER_AGENT: &str = concat!("formpress/", env!("CARGO_PKG_VERSION"));
const API_KEY_HEADER: &str = "x-api-key";

/// Client headers never forwarded upstream.
const SKIPPED_HEADERS: [HeaderName; 12] = [
	header::CONNECTION,
	HeaderName::from_static("keep-alive"),
	header::PROXY_AUTHENTICATE,
	header::PROXY_AUTHORIZATION,
	header::TE,
	header::TRAILER,
	header::TRANSFER_ENCODING,
	header::UPGRADE,
	header::HOST,
	header::CONTENT_TYPE,
	header::CONTENT_LENGTH,
	header::ACCEPT_ENCODING,
];

/// Source of published forms and sink for their submissions.
#[async_trait]
pub trait FormSource: Send + Sync {
	/// Fetches a published form.
	async fn get_form(&self, form_id: Uuid) -> RemoteResult<FormRecord>;

	/// Forwards a validated submission. `client_headers` are the headers of
	/// the browser request.
	async fn submit_form(
		&self,
		form_id: Uuid,
		data: &Value,
		client_headers: &HeaderMap,
	) -> RemoteResult<()>;
}

/// [`FormSource`] backed by the form service HTTP API.
#[derive(Clone)]
pub struct FormServiceClient {
	base_url: String,
	api_key: String,
	client: Client,
}

impl std::fmt::Debug for FormServiceClient {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FormServiceClient")
			.field("base_url", &self.base_url)
			.field("api_key", &"[REDACTED]")
			.finish()
	}
}

impl FormServiceClient {
	/// Creates a client with its own connection pool.
	pub fn new(
		base_url: impl Into<String>,
		api_key: impl Into<String>,
		timeout: Duration,
	) -> RemoteResult<Self> {
		let client = Client::builder()
			.timeout(timeout)
			.build()
			.map_err(|err| {
				tracing::error!(error = %err, "failed to build form service client");
				RemoteError::Upstream("failed to create form service client".into())
			})?;
		Ok(Self::with_client(base_url, api_key, client))
	}

	pub fn from_settings(settings: &RemoteSettings) -> RemoteResult<Self> {
		Self::new(
			settings.form_service_url.as_str(),
			settings.api_key.as_str(),
			settings.timeout(),
		)
	}

	pub fn with_client(
		base_url: impl Into<String>,
		api_key: impl Into<String>,
		client: Client,
	) -> Self {
		Self {
			base_url: base_url.into().trim_end_matches('/').to_string(),
			api_key: api_key.into(),
			client,
		}
	}

	fn form_url(&self, form_id: Uuid) -> String {
		format!("{}/public/api/v1/forms/{}", self.base_url, form_id)
	}

	/// `base` with the service headers set, replacing any client values.
	fn service_headers(&self, mut base: HeaderMap) -> RemoteResult<HeaderMap> {
		let api_key = HeaderValue::from_str(&self.api_key)
			.map_err(|_| RemoteError::Upstream("invalid form service API key".into()))?;
		base.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
		base.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
		base.insert(API_KEY_HEADER, api_key);
		Ok(base)
	}
}

/// Copies client headers that are safe to forward.
pub fn forwardable_headers(client_headers: &HeaderMap) -> HeaderMap {
	let mut forwarded = HeaderMap::new();
	for name in client_headers.keys() {
		if SKIPPED_HEADERS.contains(name) {
			continue;
		}
		for value in client_headers.get_all(name) {
			forwarded.append(name.clone(), value.clone());
		}
	}
	forwarded
}

fn status_error(status: StatusCode) -> RemoteError {
	match status {
		StatusCode::NOT_FOUND => RemoteError::NotFound("form not found".into()),
		StatusCode::BAD_REQUEST => RemoteError::BadRequest("invalid form ID".into()),
		other => RemoteError::Upstream(format!(
			"upstream form service returned status {}",
			other.as_u16()
		)),
	}
}

fn transport_error(err: reqwest::Error) -> RemoteError {
	tracing::error!(error = %err, timeout = err.is_timeout(), "form service call failed");
	RemoteError::Upstream("failed to call form service".into())
}

#[async_trait]
impl FormSource for FormServiceClient {
	async fn get_form(&self, form_id: Uuid) -> RemoteResult<FormRecord> {
		let url = self.form_url(form_id);
		tracing::info!(url = %url, form_id = %form_id, "fetching form from form service");

		let response = self
			.client
			.get(&url)
			.headers(self.service_headers(HeaderMap::new())?)
			.send()
			.await
			.map_err(transport_error)?;

		match response.status() {
			StatusCode::OK => {
				let envelope: DataEnvelope<FormRecord> = response.json().await.map_err(|err| {
					tracing::error!(
						form_id = %form_id,
						error = %err,
						"undecodable form service response"
					);
					RemoteError::Upstream("failed to decode response".into())
				})?;
				Ok(envelope.data)
			}
			status => {
				tracing::warn!(
					form_id = %form_id,
					status = status.as_u16(),
					"form service rejected form lookup"
				);
				Err(status_error(status))
			}
		}
	}

	async fn submit_form(
		&self,
		form_id: Uuid,
		data: &Value,
		client_headers: &HeaderMap,
	) -> RemoteResult<()> {
		let url = format!("{}/submissions", self.form_url(form_id));
		let forwarded = forwardable_headers(client_headers);
		tracing::info!(
			url = %url,
			form_id = %form_id,
			forwarded_headers = forwarded.len(),
			"forwarding submission to form service"
		);

		let response = self
			.client
			.post(&url)
			.headers(self.service_headers(forwarded)?)
			.json(data)
			.send()
			.await
			.map_err(transport_error)?;

		match response.status() {
			StatusCode::OK => Ok(()),
			StatusCode::TOO_MANY_REQUESTS => {
				let envelope: ErrorEnvelope = response.json().await.map_err(|err| {
					tracing::error!(
						form_id = %form_id,
						error = %err,
						"undecodable rate limit response"
					);
					RemoteError::Upstream("failed to decode response".into())
				})?;
				tracing::warn!(form_id = %form_id, "form service rate limited submission");
				Err(RemoteError::TooManyRequests(envelope.error.message))
			}
			status => {
				tracing::warn!(
					form_id = %form_id,
					status = status.as_u16(),
					"form service rejected submission"
				);
				Err(status_error(status))
			}
		}
	}
}
