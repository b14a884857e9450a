//! Server-side rendering for formpress
//!
//! Turns a form definition and its styling document into the markup, CSS
//! and scripts served to browsers:
//!
//! - [`FormDocument`] renders the form container, grid and fields
//! - [`generate_field_css`] builds the per-form stylesheet
//! - [`EmbedScript`] and [`render_standalone_page`] produce the embed
//!   script and the standalone page around a rendered form
//!
//! Styling documents use utility classes; [`transform_classes`] and
//! [`classes_to_css`] translate them into the `fp-` namespace served in
//! [`STATIC_CSS`].

pub mod assets;
pub mod classes;
pub mod css;
pub mod error;
pub mod escape;
pub mod fields;
pub mod form;
pub mod grid;
pub mod layout;
mod templates;

pub use assets::{
	EmbedScript, STATIC_CSS, StandalonePage, render_embed_script, render_standalone_page,
};
pub use classes::{alignment_classes, classes_to_css, format_classes, transform_classes};
pub use css::{generate_field_css, generate_layout_css, input_width, sanitize_css};
pub use error::{RenderError, RenderResult};
pub use escape::escape_html;
pub use fields::{FieldRenderer, validation_attributes};
pub use form::FormDocument;
pub use grid::{ROW_CLASSES, column_classes};
pub use layout::{FieldLayout, resolve_base_layout, resolve_field_layout};
