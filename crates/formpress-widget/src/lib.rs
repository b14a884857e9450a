//! Embeddable form widget.
//!
//! A page marks host elements with `data-formpress-form="<embed id>"`. The
//! [`WidgetController`] finds them, fetches each form in the best language,
//! validates input as the user interacts and posts submissions. Reloads keep
//! the values entered so far.
//!
//! The browser script served at `/embedv1.js` implements the same behavior
//! on top of the DOM.

pub mod container;
pub mod controller;
pub mod error;
pub mod form;
pub mod transport;

pub use container::{
	EmbedContainer, FORM_ATTR, HostElement, LANG_ATTR, RELOAD_ATTR, locate_containers,
};
pub use controller::{
	LOAD_ERROR_MESSAGE, LOADING_MESSAGE, MountedForm, Presentation, WidgetController, WidgetSlot,
};
pub use error::{WidgetError, WidgetResult};
pub use form::{
	CapturedValue, FieldState, FormValues, StatusKind, StatusMessage, SubmissionState, SubmitStart,
	WidgetForm,
};
pub use formpress_forms::detect_language;
pub use transport::{FetchedForm, FormTransport, HttpTransport, SubmitOutcome};
