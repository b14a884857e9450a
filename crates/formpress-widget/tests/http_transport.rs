use formpress_forms::InputKind;
use formpress_widget::{
	EmbedContainer, FormTransport, HttpTransport, LOAD_ERROR_MESSAGE, StatusKind, SubmissionState,
	SubmitOutcome,
	SubmitStart, WidgetController, WidgetError,
};
use rstest::rstest;
use serde_json::json;
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EMBED_ID: &str = "0b6e8f3a-1c2d-4e5f-9a7b-8c9d0e1f2a3b";

fn data_path() -> String {
	format!("/api/public/v1/embeds/{EMBED_ID}/data")
}

fn submissions_path() -> String {
	format!("/api/public/v1/embeds/{EMBED_ID}/submissions")
}

fn data_body() -> serde_json::Value {
	json!({
		"data": {
			"lang": "de",
			"form_id": "5d1f0c7e-2a3b-4c5d-8e9f-0a1b2c3d4e5f",
			"css": ".field-type-text .form-field label { font-weight: 700; }",
			"html": "<div class=\"form-container\"><form></form></div>",
			"fields": [
				{"name": "name", "kind": "text", "required": true, "min_length": 2},
				{"name": "email", "kind": "email", "required": true}
			]
		}
	})
}

async fn mount_data(server: &MockServer, lang: &str) {
	Mock::given(method("GET"))
		.and(path(data_path()))
		.and(query_param("lang", lang))
		.and(header("accept", "text/json; charset=utf-8"))
		.respond_with(
			ResponseTemplate::new(200)
				.insert_header("X-Form-Language", lang)
				.set_body_json(data_body()),
		)
		.mount(server)
		.await;
}

#[tokio::test]
async fn test_fetch_form_reads_body_and_language_header() {
	// Arrange
	let server = MockServer::start().await;
	mount_data(&server, "de").await;
	let transport = HttpTransport::new(server.uri());

	// Act
	let fetched = transport.fetch_form(EMBED_ID, "de").await.unwrap();

	// Assert
	assert_eq!(fetched.language.as_deref(), Some("de"));
	assert_eq!(fetched.form_id, "5d1f0c7e-2a3b-4c5d-8e9f-0a1b2c3d4e5f");
	assert!(fetched.html.starts_with("<div class=\"form-container\">"));
	assert!(fetched.css.contains("font-weight: 700"));
	assert_eq!(fetched.fields.len(), 2);
	assert_eq!(fetched.fields[1].kind, InputKind::Email);
	assert_eq!(fetched.fields[0].min_length, Some(2));
}

#[tokio::test]
async fn test_fetch_form_without_language_omits_query() {
	// Arrange
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path(data_path()))
		.respond_with(ResponseTemplate::new(200).set_body_json(data_body()))
		.expect(1)
		.mount(&server)
		.await;

	// Act
	let fetched = HttpTransport::new(server.uri()).fetch_form(EMBED_ID, "").await.unwrap();

	// Assert
	assert_eq!(fetched.language, None);
	let requests = server.received_requests().await.unwrap();
	assert_eq!(requests[0].url.query(), None);
}

#[rstest]
#[case(400)]
#[case(500)]
#[tokio::test]
async fn test_fetch_form_error_status(#[case] status: u16) {
	// Arrange
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.respond_with(ResponseTemplate::new(status).set_body_json(json!({"error": {"code": status, "message": "nope"}})))
		.mount(&server)
		.await;

	// Act
	let err = HttpTransport::new(server.uri()).fetch_form(EMBED_ID, "en").await.unwrap_err();

	// Assert
	assert_eq!(err.to_string(), format!("Failed to load form (status: {status})"));
}

#[tokio::test]
async fn test_fetch_form_bad_body() {
	// Arrange
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
		.mount(&server)
		.await;

	// Act
	let err = HttpTransport::new(server.uri()).fetch_form(EMBED_ID, "en").await.unwrap_err();

	// Assert
	assert!(matches!(err, WidgetError::Decode(_)));
}

#[tokio::test]
async fn test_submit_posts_urlencoded_payload() {
	// Arrange
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path(submissions_path()))
		.and(header("x-requested-with", "XMLHttpRequest"))
		.and(header("content-type", "application/x-www-form-urlencoded"))
		.and(body_string("name=Ada&email=ada%40example.com"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({
			"success": true,
			"message": "Form submitted successfully!",
			"embedId": EMBED_ID
		})))
		.expect(1)
		.mount(&server)
		.await;
	let transport = HttpTransport::new(server.uri());
	let payload = vec![
		("name".to_string(), "Ada".to_string()),
		("email".to_string(), "ada@example.com".to_string()),
	];

	// Act
	let outcome = transport.submit(&transport.submission_url(EMBED_ID), &payload).await;

	// Assert
	assert_eq!(
		outcome,
		SubmitOutcome::Success {
			message: Some("Form submitted successfully!".into())
		}
	);
}

#[rstest]
#[case(ResponseTemplate::new(422).set_body_json(json!({"error": {"code": 422, "message": "Name is required"}})), Some("Name is required"))]
#[case(ResponseTemplate::new(429).set_body_json(json!({"error": {"code": 429, "message": "monthly limit reached"}})), Some("monthly limit reached"))]
#[case(ResponseTemplate::new(500).set_body_string("oops"), None)]
#[tokio::test]
async fn test_submit_failure_messages(
	#[case] response: ResponseTemplate,
	#[case] expected: Option<&str>,
) {
	// Arrange
	let server = MockServer::start().await;
	Mock::given(method("POST")).respond_with(response).mount(&server).await;
	let transport = HttpTransport::new(server.uri());

	// Act
	let outcome = transport.submit(&transport.submission_url(EMBED_ID), &[]).await;

	// Assert
	assert_eq!(
		outcome,
		SubmitOutcome::Failure {
			message: expected.map(str::to_string)
		}
	);
}

#[tokio::test]
async fn test_submit_transport_error() {
	// Arrange
	let transport = HttpTransport::new("http://127.0.0.1:1");

	// Act
	let outcome = transport.submit(&transport.submission_url(EMBED_ID), &[]).await;

	// Assert
	assert_eq!(outcome, SubmitOutcome::Transport);
}

#[tokio::test]
async fn test_controller_end_to_end() {
	// Arrange
	let server = MockServer::start().await;
	mount_data(&server, "de").await;
	Mock::given(method("POST"))
		.and(path(submissions_path()))
		.respond_with(ResponseTemplate::new(422).set_body_json(json!({"error": {"code": 422, "message": "Email is taken"}})))
		.expect(1)
		.mount(&server)
		.await;
	let mut controller =
		WidgetController::new(HttpTransport::new(server.uri()), Some("de-AT".into()));

	// Act
	let ready = controller.init_all(vec![EmbedContainer::new(EMBED_ID)]).await;
	let form = controller.form_mut(EMBED_ID).unwrap();
	form.input("name", "Ada");
	form.input("email", "ada@example.com");
	let start = controller.submit(EMBED_ID).await.unwrap();

	// Assert
	assert_eq!(ready, 1);
	assert!(matches!(start, SubmitStart::Ready { .. }));
	let form = controller.form(EMBED_ID).unwrap();
	assert_eq!(form.state(), SubmissionState::Failed);
	let status = form.status().unwrap();
	assert_eq!(status.kind, StatusKind::Error);
	assert_eq!(status.text, "Email is taken");
	assert_eq!(form.field("email").unwrap().value, "ada@example.com");
}

#[tokio::test]
async fn test_controller_load_failure() {
	// Arrange
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.respond_with(ResponseTemplate::new(404))
		.mount(&server)
		.await;
	let mut controller = WidgetController::new(HttpTransport::new(server.uri()), None);

	// Act
	let ready = controller.init_all(vec![EmbedContainer::new(EMBED_ID)]).await;

	// Assert
	assert_eq!(ready, 0);
	assert_eq!(
		controller.slot(EMBED_ID).unwrap().presentation().message(),
		Some(LOAD_ERROR_MESSAGE)
	);
}
