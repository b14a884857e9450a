//! Form model and validation for formpress
//!
//! This crate holds everything that is about a form rather than about HTTP:
//! - the definition and styling documents delivered by the form service
//! - language negotiation
//! - the field validation engine shared by the server and the widget
//! - parsing and validation of submitted payloads

pub mod definition;
pub mod error;
pub mod language;
pub mod styling;
pub mod submission;
pub mod validation;

pub use definition::{
	FieldTranslation, FieldType, FieldValidation, FormDefinition, FormField, LanguageSettings,
	SelectOption, TranslatedOption,
};
pub use error::{FormError, FormResult};
pub use language::{detect_language, select_best_language};
pub use styling::{
	CanvasLayout, Column, FieldReference, FieldTypeStyle, FormContainerStyle, FormStyling,
	InlineSettings, LayoutSettings, ResponsiveBehaviors, Row, Styling,
};
pub use submission::{SubmissionPayload, validate_submission};
pub use validation::{
	FieldConstraints, FieldValidationResult, InputKind, ValidationMessages, parse_float_prefix,
	validate_field,
};
