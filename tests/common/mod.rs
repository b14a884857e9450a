//! Shared fixtures: an in-memory form source and a sample form.

#![allow(dead_code)]

use async_trait::async_trait;
use formpress::{AppState, app};
use formpress_conf::Settings;
use formpress_http::{Handler, MiddlewareChain, Request, Response};
use formpress_remote::{FormRecord, FormSource, RemoteError, RemoteResult};
use hyper::{HeaderMap, Method};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub const FORM_ID: &str = "6a0f5e2c-8d4b-4c1a-9e3f-2b7d1c0a9f88";
pub const BASE_URL: &str = "https://forms.example.com";

pub fn form_id() -> Uuid {
	Uuid::parse_str(FORM_ID).unwrap()
}

/// A submission received by [`MemorySource`].
#[derive(Debug, Clone)]
pub struct Received {
	pub form_id: Uuid,
	pub data: Value,
	pub headers: HeaderMap,
}

/// [`FormSource`] serving fixed records.
#[derive(Default)]
pub struct MemorySource {
	forms: HashMap<Uuid, FormRecord>,
	get_error: Option<RemoteError>,
	submit_error: Option<RemoteError>,
	received: Mutex<Vec<Received>>,
}

impl MemorySource {
	pub fn with_form(record: FormRecord) -> Self {
		let mut forms = HashMap::new();
		forms.insert(record.id, record);
		Self {
			forms,
			..Default::default()
		}
	}

	pub fn failing_get(mut self, err: RemoteError) -> Self {
		self.get_error = Some(err);
		self
	}

	pub fn failing_submit(mut self, err: RemoteError) -> Self {
		self.submit_error = Some(err);
		self
	}

	pub fn received(&self) -> Vec<Received> {
		self.received.lock().unwrap().clone()
	}
}

#[async_trait]
impl FormSource for MemorySource {
	async fn get_form(&self, form_id: Uuid) -> RemoteResult<FormRecord> {
		if let Some(err) = &self.get_error {
			return Err(err.clone());
		}
		self.forms
			.get(&form_id)
			.cloned()
			.ok_or_else(|| RemoteError::NotFound("form not found".into()))
	}

	async fn submit_form(
		&self,
		form_id: Uuid,
		data: &Value,
		client_headers: &HeaderMap,
	) -> RemoteResult<()> {
		if let Some(err) = &self.submit_error {
			return Err(err.clone());
		}
		self.received.lock().unwrap().push(Received {
			form_id,
			data: data.clone(),
			headers: client_headers.clone(),
		});
		Ok(())
	}
}

/// A two-language contact form laid out in one row.
pub fn contact_record() -> FormRecord {
	serde_json::from_value(json!({
		"id": FORM_ID,
		"name": "Contact us",
		"form_definition": {
			"languages": {"default": "en", "supported": ["en", "de"]},
			"fields": [
				{
					"id": "f-name", "name": "name", "type": "text", "required": true,
					"validation": {"minLength": 2},
					"translations": {
						"en": {"label": "Name", "required": "Please enter your name"},
						"de": {"label": "Name", "required": "Bitte Namen angeben"}
					}
				},
				{
					"id": "f-email", "name": "email", "type": "email", "required": true,
					"translations": {
						"en": {"label": "Email"},
						"de": {"label": "E-Mail"}
					}
				},
				{
					"id": "f-send", "name": "send", "type": "submit_button",
					"translations": {"en": {"label": "Send"}, "de": {"label": "Senden"}}
				}
			]
		},
		"form_styling": {
			"canvas_layout": {
				"rows": [{
					"id": "r1",
					"columns": [{
						"id": "c1",
						"responsive_spans": {"lg": 12},
						"fields": [{"field_id": "f-name"}, {"field_id": "f-email"}, {"field_id": "missing"}, {"field_id": "f-send"}]
					}]
				}]
			},
			"styling": {
				"field_styling": {"text": {"label": "font-bold"}}
			}
		}
	}))
	.unwrap()
}

pub fn settings() -> Settings {
	let mut settings = Settings::default();
	settings.base.url = format!("{BASE_URL}/");
	settings
}

pub fn state(source: Arc<MemorySource>) -> Arc<AppState> {
	Arc::new(AppState::from_settings(source, &settings()))
}

pub fn handler(source: Arc<MemorySource>) -> MiddlewareChain {
	app(&settings(), state(source))
}

pub async fn send(handler: &MiddlewareChain, request: Request) -> Response {
	handler.handle(request).await.unwrap()
}

pub fn get(uri: &str) -> Request {
	Request::builder().method(Method::GET).uri(uri).build().unwrap()
}

pub fn json_body(response: &Response) -> Value {
	serde_json::from_slice(&response.body).unwrap()
}
