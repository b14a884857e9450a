//! Drives every form container on a page.

use std::time::Instant;

use formpress_forms::detect_language;

use crate::container::EmbedContainer;
use crate::error::{WidgetError, WidgetResult};
use crate::form::{SubmitStart, WidgetForm};
use crate::transport::{FetchedForm, FormTransport};

pub const LOADING_MESSAGE: &str = "Loading form...";
pub const LOAD_ERROR_MESSAGE: &str = "Unable to load form. Please try refreshing the page.";

/// A fetched form placed in its container.
#[derive(Debug, Clone)]
pub struct MountedForm {
	pub html: String,
	pub css: String,
	pub form: WidgetForm,
}

/// What a container currently shows.
#[derive(Debug, Clone)]
pub enum Presentation {
	Loading,
	Ready(Box<MountedForm>),
	Error,
}

impl Presentation {
	/// Placeholder text shown instead of a form.
	pub fn message(&self) -> Option<&'static str> {
		match self {
			Presentation::Loading => Some(LOADING_MESSAGE),
			Presentation::Ready(_) => None,
			Presentation::Error => Some(LOAD_ERROR_MESSAGE),
		}
	}

	pub fn mounted(&self) -> Option<&MountedForm> {
		match self {
			Presentation::Ready(mounted) => Some(mounted),
			_ => None,
		}
	}
}

/// One container and what it shows.
#[derive(Debug, Clone)]
pub struct WidgetSlot {
	container: EmbedContainer,
	presentation: Presentation,
	updating: bool,
}

impl WidgetSlot {
	pub fn container(&self) -> &EmbedContainer {
		&self.container
	}

	pub fn presentation(&self) -> &Presentation {
		&self.presentation
	}

	/// Whether the "Updating..." overlay covers the form.
	pub fn is_updating(&self) -> bool {
		self.updating
	}
}

/// Loads, reloads and submits the forms of all attached containers.
///
/// Slots are kept in attach order, one per container. Lookups by embed id
/// resolve to the first container carrying that id.
pub struct WidgetController<T> {
	transport: T,
	browser_language: Option<String>,
	slots: Vec<WidgetSlot>,
}

impl<T: FormTransport> WidgetController<T> {
	pub fn new(transport: T, browser_language: Option<String>) -> Self {
		Self {
			transport,
			browser_language,
			slots: Vec::new(),
		}
	}

	pub fn transport(&self) -> &T {
		&self.transport
	}

	pub fn slot(&self, embed_id: &str) -> Option<&WidgetSlot> {
		self.slots.get(self.position(embed_id)?)
	}

	pub fn slot_at(&self, index: usize) -> Option<&WidgetSlot> {
		self.slots.get(index)
	}

	pub fn slots(&self) -> impl Iterator<Item = &WidgetSlot> {
		self.slots.iter()
	}

	pub fn form(&self, embed_id: &str) -> Option<&WidgetForm> {
		self.slot(embed_id)?.presentation.mounted().map(|m| &m.form)
	}

	pub fn form_mut(&mut self, embed_id: &str) -> Option<&mut WidgetForm> {
		self.form_at_mut(self.position(embed_id)?)
	}

	pub fn form_at_mut(&mut self, index: usize) -> Option<&mut WidgetForm> {
		match &mut self.slots.get_mut(index)?.presentation {
			Presentation::Ready(mounted) => Some(&mut mounted.form),
			_ => None,
		}
	}

	/// Attaches and loads every container. Returns how many became ready.
	pub async fn init_all(&mut self, containers: Vec<EmbedContainer>) -> usize {
		tracing::info!(count = containers.len(), "initializing forms");
		let mut ready = 0;
		for container in containers {
			if self.attach(container).await.is_ok() {
				ready += 1;
			}
		}
		ready
	}

	/// Shows the loading state, fetches the form and mounts it.
	///
	/// Every call adds a slot, even for an embed id that is already attached.
	/// On failure the container shows the load error. A language reported
	/// by the server is written back to the container.
	pub async fn attach(&mut self, container: EmbedContainer) -> WidgetResult<()> {
		let embed_id = container.embed_id.clone();
		let lang = self.language_for(&container);
		let index = self.slots.len();
		self.slots.push(WidgetSlot {
			container,
			presentation: Presentation::Loading,
			updating: false,
		});

		let result = self.transport.fetch_form(&embed_id, &lang).await;
		let submission_url = self.transport.submission_url(&embed_id);
		let slot = &mut self.slots[index];

		match result {
			Ok(fetched) => {
				if let Some(language) = &fetched.language {
					slot.container.lang = Some(language.clone());
				}
				tracing::info!(
					embed_id = %embed_id,
					language = %fetched.language.as_deref().unwrap_or(&lang),
					"form initialized"
				);
				let mounted = mount(&embed_id, submission_url, fetched);
				slot.presentation = Presentation::Ready(Box::new(mounted));
				Ok(())
			}
			Err(err) => {
				tracing::error!(embed_id = %embed_id, error = %err, "error loading form");
				slot.presentation = Presentation::Error;
				Err(err)
			}
		}
	}

	/// Reloads one container, or all of them when `embed_id` is `None`.
	///
	/// Values entered so far survive the reload. A failed reload keeps the
	/// previous form.
	///
	/// # Errors
	///
	/// [`WidgetError::UnknownEmbed`] for an id with no container, or the
	/// fetch error of a single-container reload.
	pub async fn reload(&mut self, embed_id: Option<&str>) -> WidgetResult<()> {
		match embed_id {
			Some(id) => {
				let Some(index) = self.position(id) else {
					tracing::warn!(embed_id = %id, "form not found");
					return Err(WidgetError::UnknownEmbed(id.to_string()));
				};
				self.reload_at(index).await
			}
			None => {
				for index in 0..self.slots.len() {
					// Failures are logged and leave the old form in place
					let _ = self.reload_at(index).await;
				}
				Ok(())
			}
		}
	}

	/// Reloads the container at `index` in the container's current language.
	pub async fn reload_at(&mut self, index: usize) -> WidgetResult<()> {
		let Some(slot) = self.slots.get_mut(index) else {
			return Err(WidgetError::UnknownEmbed(format!("#{index}")));
		};
		let embed_id = slot.container.embed_id.clone();
		let lang = slot.container.lang.clone().unwrap_or_default();
		let values = slot.presentation.mounted().map(|m| m.form.get_values());
		slot.updating = values.is_some();

		let result = self.transport.fetch_form(&embed_id, &lang).await;
		let submission_url = self.transport.submission_url(&embed_id);
		let slot = &mut self.slots[index];
		slot.updating = false;

		match result {
			Ok(fetched) => {
				let language = fetched.language.clone().unwrap_or_else(|| lang.clone());
				let mut mounted = mount(&embed_id, submission_url, fetched);
				if let Some(values) = &values {
					mounted.form.restore_values(values);
				}
				slot.presentation = Presentation::Ready(Box::new(mounted));
				tracing::info!(embed_id = %embed_id, language = %language, "form reloaded");
				Ok(())
			}
			Err(err) => {
				tracing::error!(embed_id = %embed_id, error = %err, "error reloading form");
				Err(err)
			}
		}
	}

	/// Changes a container's language attribute.
	///
	/// Returns `true` when the change triggered a reload, which happens only
	/// for containers with `reload_on_change` set.
	pub async fn set_language(
		&mut self,
		embed_id: &str,
		lang: Option<&str>,
	) -> WidgetResult<bool> {
		let Some(index) = self.position(embed_id) else {
			tracing::warn!(embed_id = %embed_id, "form not found");
			return Err(WidgetError::UnknownEmbed(embed_id.to_string()));
		};
		let slot = &mut self.slots[index];
		if slot.container.lang.as_deref() == lang {
			return Ok(false);
		}
		slot.container.lang = lang.map(str::to_string);
		if !slot.container.reload_on_change {
			return Ok(false);
		}

		tracing::debug!(embed_id = %embed_id, lang = ?lang, "language changed");
		self.reload_at(index).await?;
		Ok(true)
	}

	/// Validates and submits the form of `embed_id`.
	///
	/// Returns [`SubmitStart::Invalid`] without a request when validation
	/// fails. Otherwise the outcome is applied to the form before returning.
	pub async fn submit(&mut self, embed_id: &str) -> WidgetResult<SubmitStart> {
		let index = self
			.position(embed_id)
			.ok_or_else(|| WidgetError::NotReady(embed_id.to_string()))?;
		self.submit_at(index).await
	}

	/// Validates and submits the form of the container at `index`.
	pub async fn submit_at(&mut self, index: usize) -> WidgetResult<SubmitStart> {
		let form = self
			.form_at_mut(index)
			.ok_or_else(|| WidgetError::NotReady(format!("#{index}")))?;
		let start = form.begin_submit()?;
		let SubmitStart::Ready { payload } = &start else {
			return Ok(start);
		};
		let url = form.submission_url().to_string();

		let outcome = self.transport.submit(&url, payload).await;
		if let Some(form) = self.form_at_mut(index) {
			form.complete_submit(outcome, Instant::now());
		}
		Ok(start)
	}

	fn position(&self, embed_id: &str) -> Option<usize> {
		self.slots
			.iter()
			.position(|slot| slot.container.embed_id == embed_id)
	}

	fn language_for(&self, container: &EmbedContainer) -> String {
		detect_language(container.lang.as_deref(), self.browser_language.as_deref())
	}
}

fn mount(embed_id: &str, submission_url: String, fetched: FetchedForm) -> MountedForm {
	let form_id = if fetched.form_id.is_empty() {
		embed_id.to_string()
	} else {
		fetched.form_id
	};
	MountedForm {
		html: fetched.html,
		css: fetched.css,
		form: WidgetForm::new(form_id, submission_url, fetched.fields),
	}
}
