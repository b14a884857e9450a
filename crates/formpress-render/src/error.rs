//! Rendering errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
	/// A bundled template failed to render.
	#[error("template error: {0}")]
	Template(#[from] tera::Error),
}

pub type RenderResult<T> = Result<T, RenderError>;
