//! Fetching form markup and posting submissions.

use async_trait::async_trait;
use formpress_forms::FieldConstraints;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{WidgetError, WidgetResult};

/// Characters left alone by `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
	.remove(b'-')
	.remove(b'_')
	.remove(b'.')
	.remove(b'!')
	.remove(b'~')
	.remove(b'*')
	.remove(b'\'')
	.remove(b'(')
	.remove(b')');

pub const LANGUAGE_HEADER: &str = "x-form-language";
pub const FETCH_ACCEPT: &str = "text/json; charset=utf-8";

/// A form as delivered by the embed data endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedForm {
	/// Id of the underlying form. Empty when the server omitted it.
	pub form_id: String,
	pub html: String,
	pub css: String,
	/// Language the server rendered, from the `X-Form-Language` header.
	pub language: Option<String>,
	pub fields: Vec<FieldConstraints>,
}

/// How a submission ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
	/// 2xx. Carries `message` from the response body if present.
	Success { message: Option<String> },
	/// Non-success status. Carries the server's error message if present.
	Failure { message: Option<String> },
	/// The request never produced a response.
	Transport,
}

#[async_trait]
pub trait FormTransport: Send + Sync {
	async fn fetch_form(&self, embed_id: &str, lang: &str) -> WidgetResult<FetchedForm>;

	async fn submit(&self, submission_url: &str, payload: &[(String, String)]) -> SubmitOutcome;

	/// Where submissions for `embed_id` are posted.
	fn submission_url(&self, embed_id: &str) -> String;
}

#[derive(Deserialize)]
struct DataEnvelope {
	data: EmbedData,
}

#[derive(Deserialize)]
struct EmbedData {
	#[serde(default)]
	form_id: String,
	#[serde(default)]
	html: String,
	#[serde(default)]
	css: String,
	#[serde(default)]
	fields: Vec<FieldConstraints>,
}

/// [`FormTransport`] talking to a formpress server over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
	api_base_url: String,
	client: Client,
}

impl HttpTransport {
	pub fn new(api_base_url: impl Into<String>) -> Self {
		Self::with_client(api_base_url, Client::new())
	}

	pub fn with_client(api_base_url: impl Into<String>, client: Client) -> Self {
		Self {
			api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
			client,
		}
	}

	/// `GET` URL of the embed data for `embed_id`, with `lang` when set.
	pub fn data_url(&self, embed_id: &str, lang: &str) -> String {
		let mut url = format!(
			"{}/api/public/v1/embeds/{}/data",
			self.api_base_url,
			utf8_percent_encode(embed_id, COMPONENT)
		);
		if !lang.is_empty() {
			url.push_str("?lang=");
			url.extend(utf8_percent_encode(lang, COMPONENT));
		}
		url
	}
}

/// Message out of a response body: `error.message` first, then `message`.
fn body_message(body: &Value) -> Option<String> {
	body.pointer("/error/message")
		.or_else(|| body.get("message"))
		.and_then(Value::as_str)
		.filter(|m| !m.is_empty())
		.map(str::to_string)
}

#[async_trait]
impl FormTransport for HttpTransport {
	async fn fetch_form(&self, embed_id: &str, lang: &str) -> WidgetResult<FetchedForm> {
		let url = self.data_url(embed_id, lang);
		tracing::debug!(url = %url, embed_id, "fetching form");

		let response = self
			.client
			.get(&url)
			.header(reqwest::header::ACCEPT, FETCH_ACCEPT)
			.send()
			.await?;

		let status = response.status();
		if !status.is_success() {
			return Err(WidgetError::LoadStatus(status.as_u16()));
		}

		let language = response
			.headers()
			.get(LANGUAGE_HEADER)
			.and_then(|v| v.to_str().ok())
			.filter(|v| !v.is_empty())
			.map(str::to_string);
		let bytes = response.bytes().await?;
		let envelope: DataEnvelope =
			serde_json::from_slice(&bytes).map_err(|err| WidgetError::Decode(err.to_string()))?;

		Ok(FetchedForm {
			form_id: envelope.data.form_id,
			html: envelope.data.html,
			css: envelope.data.css,
			language,
			fields: envelope.data.fields,
		})
	}

	async fn submit(&self, submission_url: &str, payload: &[(String, String)]) -> SubmitOutcome {
		let result = self
			.client
			.post(submission_url)
			.header("X-Requested-With", "XMLHttpRequest")
			.form(payload)
			.send()
			.await;

		let response = match result {
			Ok(response) => response,
			Err(err) => {
				tracing::warn!(error = %err, "submission request failed");
				return SubmitOutcome::Transport;
			}
		};

		let success = response.status().is_success();
		let body = response
			.bytes()
			.await
			.ok()
			.and_then(|bytes| serde_json::from_slice::<Value>(&bytes).ok());
		let message = body.as_ref().and_then(body_message);

		if success {
			SubmitOutcome::Success { message }
		} else {
			SubmitOutcome::Failure { message }
		}
	}

	fn submission_url(&self, embed_id: &str) -> String {
		format!(
			"{}/api/public/v1/embeds/{}/submissions",
			self.api_base_url,
			utf8_percent_encode(embed_id, COMPONENT)
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case("", "https://api.example.com/api/public/v1/embeds/e1/data")]
	#[case("de", "https://api.example.com/api/public/v1/embeds/e1/data?lang=de")]
	#[case("zh Hant", "https://api.example.com/api/public/v1/embeds/e1/data?lang=zh%20Hant")]
	fn test_data_url(#[case] lang: &str, #[case] expected: &str) {
		// Arrange
		let transport = HttpTransport::new("https://api.example.com/");

		// Act & Assert
		assert_eq!(transport.data_url("e1", lang), expected);
	}

	#[rstest]
	fn test_submission_url() {
		// Act & Assert
		assert_eq!(
			HttpTransport::new("http://localhost:9200").submission_url("e1"),
			"http://localhost:9200/api/public/v1/embeds/e1/submissions"
		);
	}

	#[rstest]
	#[case(json!({"error": {"code": 422, "message": "Email is required"}}), Some("Email is required"))]
	#[case(json!({"message": "Thanks!"}), Some("Thanks!"))]
	#[case(json!({"error": {"code": 500}}), None)]
	#[case(json!({"message": ""}), None)]
	fn test_body_message(#[case] body: Value, #[case] expected: Option<&str>) {
		// Act & Assert
		assert_eq!(body_message(&body).as_deref(), expected);
	}
}
