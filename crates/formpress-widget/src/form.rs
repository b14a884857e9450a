//! Validation and submission state of one rendered form.

use std::time::{Duration, Instant};

use formpress_forms::{FieldConstraints, FieldValidationResult, InputKind};
use indexmap::IndexMap;

use crate::error::{WidgetError, WidgetResult};
use crate::transport::SubmitOutcome;

/// How long a success message stays before it starts to fade.
pub const SUCCESS_MESSAGE_TTL: Duration = Duration::from_secs(5);
/// Fade-out time of a success message.
pub const MESSAGE_FADE: Duration = Duration::from_millis(300);
/// Delay between a successful submission and removal of the loading state.
pub const LOADING_SETTLE: Duration = Duration::from_millis(500);

pub const DEFAULT_SUCCESS_MESSAGE: &str = "Form submitted successfully!";
pub const DEFAULT_FAILURE_MESSAGE: &str = "Submission failed";
pub const TRANSPORT_FAILURE_MESSAGE: &str = "An error occurred. Please try again.";

/// One input of the form.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldState {
	pub constraints: FieldConstraints,
	/// Current value. For checkbox groups this is the checked options
	/// joined with `,`, as submitted.
	pub value: String,
	/// Error currently displayed next to the field.
	pub error: Option<String>,
	checked: Vec<String>,
}

impl FieldState {
	fn new(constraints: FieldConstraints) -> Self {
		Self {
			constraints,
			value: String::new(),
			error: None,
			checked: Vec::new(),
		}
	}

	pub fn name(&self) -> &str {
		&self.constraints.name
	}

	pub fn validate(&self) -> FieldValidationResult {
		self.constraints.validate(&self.value)
	}

	/// Checked options of a checkbox group, in option order.
	pub fn checked(&self) -> &[String] {
		&self.checked
	}

	fn set_checked(&mut self, mut checked: Vec<String>) {
		// Keep option order, unknown values last
		let options = &self.constraints.options;
		checked.sort_by_key(|v| options.iter().position(|o| o == v).unwrap_or(usize::MAX));
		self.value = checked.join(",");
		self.checked = checked;
	}

	fn clear(&mut self) {
		self.value.clear();
		self.checked.clear();
		self.error = None;
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
	Idle,
	Submitting,
	Succeeded,
	Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
	Success,
	Error,
}

/// Feedback shown above the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
	pub kind: StatusKind,
	pub text: String,
	pub shown_at: Instant,
}

impl StatusMessage {
	/// Whether the message is still shown at `now`. Success messages hide
	/// after their TTL plus the fade.
	pub fn is_visible(&self, now: Instant) -> bool {
		match self.kind {
			StatusKind::Error => true,
			StatusKind::Success => {
				now.saturating_duration_since(self.shown_at) < SUCCESS_MESSAGE_TTL + MESSAGE_FADE
			}
		}
	}

	pub fn is_fading(&self, now: Instant) -> bool {
		self.kind == StatusKind::Success
			&& now.saturating_duration_since(self.shown_at) >= SUCCESS_MESSAGE_TTL
			&& self.is_visible(now)
	}
}

/// A value captured before a reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapturedValue {
	Text(String),
	/// Selected radio option.
	Selected(String),
	/// Checked flags of a checkbox group, keyed by option.
	Checked(IndexMap<String, bool>),
}

pub type FormValues = IndexMap<String, CapturedValue>;

/// Result of starting a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStart {
	/// Validation failed; the named field should receive focus.
	Invalid { focus: String },
	/// Validation passed. The payload is name to value in field order.
	Ready { payload: Vec<(String, String)> },
}

/// Validation and submission state machine for one rendered form.
///
/// # Examples
///
/// ```
/// use formpress_forms::{FieldConstraints, InputKind};
/// use formpress_widget::{SubmitStart, WidgetForm};
/// use std::time::Instant;
///
/// let mut form = WidgetForm::new(
///     "f1",
///     "https://api.example.com/api/public/v1/embeds/f1/submissions",
///     vec![FieldConstraints::new("email", InputKind::Email).required(true)],
/// );
/// assert!(!form.submit_enabled(Instant::now()));
///
/// form.input("email", "ada@example.com");
/// assert!(form.submit_enabled(Instant::now()));
/// assert!(matches!(form.begin_submit(), Ok(SubmitStart::Ready { .. })));
/// ```
#[derive(Debug, Clone)]
pub struct WidgetForm {
	form_id: String,
	submission_url: String,
	fields: Vec<FieldState>,
	state: SubmissionState,
	status: Option<StatusMessage>,
	settles_at: Option<Instant>,
}

impl WidgetForm {
	pub fn new(
		form_id: impl Into<String>,
		submission_url: impl Into<String>,
		fields: Vec<FieldConstraints>,
	) -> Self {
		Self {
			form_id: form_id.into(),
			submission_url: submission_url.into(),
			fields: fields.into_iter().map(FieldState::new).collect(),
			state: SubmissionState::Idle,
			status: None,
			settles_at: None,
		}
	}

	pub fn form_id(&self) -> &str {
		&self.form_id
	}

	pub fn submission_url(&self) -> &str {
		&self.submission_url
	}

	pub fn fields(&self) -> &[FieldState] {
		&self.fields
	}

	pub fn field(&self, name: &str) -> Option<&FieldState> {
		self.fields.iter().find(|f| f.name() == name)
	}

	fn field_mut(&mut self, name: &str) -> Option<&mut FieldState> {
		self.fields.iter_mut().find(|f| f.name() == name)
	}

	pub fn state(&self) -> SubmissionState {
		self.state
	}

	pub fn status(&self) -> Option<&StatusMessage> {
		self.status.as_ref()
	}

	/// Status message still shown at `now`.
	pub fn visible_status(&self, now: Instant) -> Option<&StatusMessage> {
		self.status.as_ref().filter(|s| s.is_visible(now))
	}

	/// Whether the form shows its loading state at `now`.
	pub fn is_loading(&self, now: Instant) -> bool {
		self.state == SubmissionState::Submitting || self.settles_at.is_some_and(|at| now < at)
	}

	/// Stores a new value and clears the field's error.
	///
	/// Returns `false` for unknown fields and for checkbox groups, which
	/// change through [`WidgetForm::toggle`].
	pub fn input(&mut self, name: &str, value: impl Into<String>) -> bool {
		match self.field_mut(name) {
			Some(field) if field.constraints.kind != InputKind::Checkbox => {
				field.value = value.into();
				field.error = None;
				true
			}
			_ => false,
		}
	}

	/// Checks or unchecks one option of a checkbox group.
	pub fn toggle(&mut self, name: &str, option: &str, checked: bool) -> bool {
		let Some(field) = self.field_mut(name) else {
			return false;
		};
		if field.constraints.kind != InputKind::Checkbox {
			return false;
		}

		let mut selected = field.checked.clone();
		selected.retain(|v| v != option);
		if checked {
			selected.push(option.to_string());
		}
		field.set_checked(selected);
		field.error = None;
		true
	}

	/// Validates a field that lost focus and shows its error if invalid.
	pub fn blur(&mut self, name: &str) -> Option<FieldValidationResult> {
		let field = self.field_mut(name)?;
		let result = field.validate();
		if !result.valid {
			field.error = result.message.clone();
		}
		Some(result)
	}

	/// The submit button is enabled while every field validates and the
	/// form is not loading at `now`.
	pub fn submit_enabled(&self, now: Instant) -> bool {
		!self.is_loading(now) && self.fields.iter().all(|f| f.validate().valid)
	}

	/// Starts a submission.
	///
	/// Clears the status message and shows every field error. When a field
	/// is invalid the form stays idle and the first invalid field is named
	/// for focus.
	///
	/// # Errors
	///
	/// [`WidgetError::SubmissionInProgress`] when already submitting.
	pub fn begin_submit(&mut self) -> WidgetResult<SubmitStart> {
		if self.state == SubmissionState::Submitting {
			return Err(WidgetError::SubmissionInProgress);
		}
		self.status = None;

		let mut focus = None;
		for field in &mut self.fields {
			let result = field.validate();
			field.error = result.message.filter(|_| !result.valid);
			if field.error.is_some() && focus.is_none() {
				focus = Some(field.name().to_string());
			}
		}

		if let Some(focus) = focus {
			self.state = SubmissionState::Idle;
			tracing::debug!(
				form_id = %self.form_id,
				field = %focus,
				"submission blocked by validation"
			);
			return Ok(SubmitStart::Invalid { focus });
		}

		self.state = SubmissionState::Submitting;
		let payload = self
			.fields
			.iter()
			.map(|f| (f.name().to_string(), f.value.clone()))
			.collect();
		Ok(SubmitStart::Ready { payload })
	}

	/// Applies the outcome of a submission finished at `now`.
	///
	/// Outcomes arriving while no submission is in flight are ignored.
	/// Returns whether the outcome was applied.
	pub fn complete_submit(&mut self, outcome: SubmitOutcome, now: Instant) -> bool {
		if self.state != SubmissionState::Submitting {
			tracing::warn!(
				form_id = %self.form_id,
				state = ?self.state,
				"ignoring stray submission outcome"
			);
			return false;
		}
		match outcome {
			SubmitOutcome::Success { message } => {
				for field in &mut self.fields {
					field.clear();
				}
				self.status = Some(StatusMessage {
					kind: StatusKind::Success,
					text: message.unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string()),
					shown_at: now,
				});
				self.state = SubmissionState::Succeeded;
				self.settles_at = Some(now + LOADING_SETTLE);
			}
			SubmitOutcome::Failure { message } => {
				self.fail(message.unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string()), now);
			}
			SubmitOutcome::Transport => {
				self.fail(TRANSPORT_FAILURE_MESSAGE.to_string(), now);
			}
		}
		tracing::debug!(form_id = %self.form_id, state = ?self.state, "submission completed");
		true
	}

	fn fail(&mut self, text: String, now: Instant) {
		self.status = Some(StatusMessage {
			kind: StatusKind::Error,
			text,
			shown_at: now,
		});
		self.state = SubmissionState::Failed;
		self.settles_at = None;
	}

	/// Captures current values for a reload.
	pub fn get_values(&self) -> FormValues {
		self.fields
			.iter()
			.map(|field| {
				let value = match field.constraints.kind {
					InputKind::Checkbox => CapturedValue::Checked(
						field
							.constraints
							.options
							.iter()
							.map(|o| (o.clone(), field.checked.contains(o)))
							.collect(),
					),
					InputKind::Radio => CapturedValue::Selected(field.value.clone()),
					_ => CapturedValue::Text(field.value.clone()),
				};
				(field.name().to_string(), value)
			})
			.collect()
	}

	/// Applies captured values. Names without a matching field are ignored,
	/// as are values that do not fit the field's kind.
	pub fn restore_values(&mut self, values: &FormValues) {
		for field in &mut self.fields {
			let Some(captured) = values.get(field.name()) else {
				continue;
			};
			match (field.constraints.kind, captured) {
				(InputKind::Checkbox, CapturedValue::Checked(flags)) => {
					let checked = field
						.constraints
						.options
						.iter()
						.filter(|o| flags.get(o.as_str()).copied().unwrap_or(false))
						.cloned()
						.collect();
					field.set_checked(checked);
				}
				(InputKind::Radio, CapturedValue::Selected(selected)) => {
					let known = field.constraints.options.is_empty()
						|| field.constraints.options.iter().any(|o| o == selected);
					if known {
						field.value = selected.clone();
					}
				}
				(InputKind::Checkbox | InputKind::Radio, _) => {}
				(_, CapturedValue::Text(text)) => field.value = text.clone(),
				_ => {}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use formpress_forms::ValidationMessages;
	use rstest::{fixture, rstest};

	fn sample_form() -> WidgetForm {
		WidgetForm::new(
			"f1",
			"/api/public/v1/embeds/f1/submissions",
			vec![
				FieldConstraints::new("name", InputKind::Text)
					.required(true)
					.with_min_length(2)
					.with_messages(ValidationMessages {
						required: Some("Name please".into()),
						..Default::default()
					}),
				FieldConstraints::new("email", InputKind::Email).required(true),
				FieldConstraints {
					options: vec!["news".into(), "offers".into(), "events".into()],
					..FieldConstraints::new("topics", InputKind::Checkbox)
				},
				FieldConstraints {
					options: vec!["s".into(), "m".into()],
					..FieldConstraints::new("size", InputKind::Radio)
				},
			],
		)
	}

	#[fixture]
	fn form() -> WidgetForm {
		sample_form()
	}

	fn fill(form: &mut WidgetForm) {
		form.input("name", "Ada");
		form.input("email", "ada@example.com");
	}

	#[rstest]
	fn test_blur_shows_error_and_input_clears_it(mut form: WidgetForm) {
		// Act
		let result = form.blur("name").unwrap();

		// Assert
		assert!(!result.valid);
		assert_eq!(form.field("name").unwrap().error.as_deref(), Some("Name please"));

		// Act
		form.input("name", "A");

		// Assert
		assert_eq!(form.field("name").unwrap().error, None);
		assert_eq!(form.blur("name").unwrap().message.as_deref(), Some("Too short"));
	}

	#[rstest]
	fn test_blur_unknown_field(mut form: WidgetForm) {
		// Act & Assert
		assert!(form.blur("missing").is_none());
		assert!(!form.input("missing", "x"));
	}

	#[rstest]
	fn test_submit_enabled_tracks_validity(mut form: WidgetForm) {
		// Assert
		assert!(!form.submit_enabled(Instant::now()));

		// Act
		fill(&mut form);

		// Assert
		assert!(form.submit_enabled(Instant::now()));
	}

	#[rstest]
	fn test_begin_submit_reports_first_invalid_field(mut form: WidgetForm) {
		// Arrange
		form.input("name", "Ada");
		form.input("email", "not-an-email");

		// Act
		let start = form.begin_submit().unwrap();

		// Assert
		assert_eq!(start, SubmitStart::Invalid { focus: "email".into() });
		assert_eq!(form.state(), SubmissionState::Idle);
		assert_eq!(
			form.field("email").unwrap().error.as_deref(),
			Some("Invalid email address")
		);
		assert_eq!(form.field("name").unwrap().error, None);
	}

	#[rstest]
	fn test_begin_submit_builds_payload_and_blocks_reentry(mut form: WidgetForm) {
		// Arrange
		fill(&mut form);
		form.toggle("topics", "events", true);
		form.toggle("topics", "news", true);
		form.input("size", "m");

		// Act
		let start = form.begin_submit().unwrap();

		// Assert
		assert_eq!(
			start,
			SubmitStart::Ready {
				payload: vec![
					("name".into(), "Ada".into()),
					("email".into(), "ada@example.com".into()),
					("topics".into(), "news,events".into()),
					("size".into(), "m".into()),
				]
			}
		);
		assert_eq!(form.state(), SubmissionState::Submitting);
		assert!(!form.submit_enabled(Instant::now()));
		assert!(matches!(form.begin_submit(), Err(WidgetError::SubmissionInProgress)));
	}

	#[rstest]
	fn test_success_resets_values_and_schedules_timers(mut form: WidgetForm) {
		// Arrange
		fill(&mut form);
		form.begin_submit().unwrap();
		let now = Instant::now();

		// Act
		form.complete_submit(SubmitOutcome::Success { message: None }, now);

		// Assert
		assert_eq!(form.state(), SubmissionState::Succeeded);
		assert!(form.fields().iter().all(|f| f.value.is_empty() && f.error.is_none()));
		let status = form.status().unwrap();
		assert_eq!(status.kind, StatusKind::Success);
		assert_eq!(status.text, DEFAULT_SUCCESS_MESSAGE);
		assert!(form.is_loading(now + Duration::from_millis(499)));
		assert!(!form.is_loading(now + LOADING_SETTLE));
		assert!(!status.is_fading(now + Duration::from_millis(4999)));
		assert!(status.is_fading(now + SUCCESS_MESSAGE_TTL));
		assert!(form.visible_status(now + Duration::from_millis(5299)).is_some());
		assert!(form.visible_status(now + Duration::from_millis(5300)).is_none());
	}

	#[rstest]
	fn test_submit_stays_disabled_until_loading_settles(mut form: WidgetForm) {
		// Arrange
		fill(&mut form);
		form.begin_submit().unwrap();
		let now = Instant::now();
		form.complete_submit(SubmitOutcome::Success { message: None }, now);
		fill(&mut form);

		// Act & Assert
		assert!(!form.submit_enabled(now + Duration::from_millis(499)));
		assert!(form.submit_enabled(now + LOADING_SETTLE));
	}

	#[rstest]
	fn test_outcome_without_submission_is_ignored(mut form: WidgetForm) {
		// Arrange
		fill(&mut form);
		let now = Instant::now();

		// Act
		let applied = form.complete_submit(SubmitOutcome::Success { message: None }, now);

		// Assert
		assert!(!applied);
		assert_eq!(form.state(), SubmissionState::Idle);
		assert!(form.status().is_none());
		assert_eq!(form.field("name").unwrap().value, "Ada");
		assert!(form.submit_enabled(now));
	}

	#[rstest]
	fn test_late_outcome_after_completion_is_ignored(mut form: WidgetForm) {
		// Arrange
		fill(&mut form);
		form.begin_submit().unwrap();
		let now = Instant::now();
		form.complete_submit(SubmitOutcome::Failure { message: None }, now);

		// Act
		let applied = form.complete_submit(SubmitOutcome::Success { message: None }, now);

		// Assert
		assert!(!applied);
		assert_eq!(form.state(), SubmissionState::Failed);
		assert_eq!(form.status().unwrap().text, DEFAULT_FAILURE_MESSAGE);
	}

	#[rstest]
	#[case(SubmitOutcome::Failure { message: Some("monthly limit reached".into()) }, "monthly limit reached")]
	#[case(SubmitOutcome::Failure { message: None }, DEFAULT_FAILURE_MESSAGE)]
	#[case(SubmitOutcome::Transport, TRANSPORT_FAILURE_MESSAGE)]
	fn test_failure_keeps_values(
		mut form: WidgetForm,
		#[case] outcome: SubmitOutcome,
		#[case] expected: &str,
	) {
		// Arrange
		fill(&mut form);
		form.begin_submit().unwrap();
		let now = Instant::now();

		// Act
		form.complete_submit(outcome, now);

		// Assert
		assert_eq!(form.state(), SubmissionState::Failed);
		assert_eq!(form.field("name").unwrap().value, "Ada");
		let status = form.visible_status(now + Duration::from_secs(60)).unwrap();
		assert_eq!(status.kind, StatusKind::Error);
		assert_eq!(status.text, expected);
		assert!(!form.is_loading(now));
		assert!(form.submit_enabled(now));
	}

	#[rstest]
	fn test_values_survive_restore(mut form: WidgetForm) {
		// Arrange
		fill(&mut form);
		form.toggle("topics", "offers", true);
		form.input("size", "s");
		let mut values = form.get_values();
		values.insert("ghost".into(), CapturedValue::Text("boo".into()));
		let mut fresh = sample_form();

		// Act
		fresh.restore_values(&values);

		// Assert
		assert_eq!(fresh.field("name").unwrap().value, "Ada");
		assert_eq!(fresh.field("topics").unwrap().value, "offers");
		assert_eq!(fresh.field("size").unwrap().value, "s");
		assert!(fresh.field("ghost").is_none());
	}

	#[rstest]
	fn test_restore_ignores_unknown_radio_option(mut form: WidgetForm) {
		// Arrange
		let values = FormValues::from([("size".to_string(), CapturedValue::Selected("xl".into()))]);

		// Act
		form.restore_values(&values);

		// Assert
		assert_eq!(form.field("size").unwrap().value, "");
	}

	#[rstest]
	fn test_toggle_rejects_non_checkbox(mut form: WidgetForm) {
		// Act & Assert
		assert!(!form.toggle("name", "x", true));
		assert!(!form.input("topics", "news"));
		assert!(form.toggle("topics", "news", true));
		assert!(form.toggle("topics", "news", false));
		assert_eq!(form.field("topics").unwrap().value, "");
	}

	#[rstest]
	fn test_checkbox_options_containing_commas_survive_reload() {
		// Arrange
		let group = || {
			WidgetForm::new(
				"f1",
				"/submissions",
				vec![FieldConstraints {
					options: vec!["Yes, please".into(), "c".into()],
					..FieldConstraints::new("contact", InputKind::Checkbox)
				}],
			)
		};
		let mut form = group();
		form.toggle("contact", "c", true);
		form.toggle("contact", "Yes, please", true);
		let mut fresh = group();

		// Act
		let values = form.get_values();
		fresh.restore_values(&values);

		// Assert
		assert_eq!(
			values["contact"],
			CapturedValue::Checked(IndexMap::from([
				("Yes, please".to_string(), true),
				("c".to_string(), true),
			]))
		);
		let field = fresh.field("contact").unwrap();
		assert_eq!(field.checked(), ["Yes, please".to_string(), "c".to_string()]);
		assert_eq!(field.value, "Yes, please,c");

		// Act
		fresh.toggle("contact", "c", false);

		// Assert
		assert_eq!(fresh.field("contact").unwrap().checked(), ["Yes, please".to_string()]);
	}
}
