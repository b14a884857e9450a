//! Route handlers.

mod assets;
mod embeds;
mod health;
mod page;

pub use assets::EmbedScriptHandler;
pub use embeds::{EmbedDataHandler, SubmissionHandler};
pub use health::HealthHandler;
pub use page::StandalonePageHandler;

use formpress_http::{Error, Request, Result};
use uuid::Uuid;

/// Parses the path parameter `name` as a UUID, failing with `message`.
fn uuid_param(request: &Request, name: &str, message: &str) -> Result<Uuid> {
	request
		.path_param(name)
		.and_then(|raw| Uuid::parse_str(raw).ok())
		.ok_or_else(|| Error::BadRequest(message.to_string()))
}

/// The `lang` query parameter, empty when absent.
fn requested_language(request: &Request) -> String {
	request.query("lang").unwrap_or_default()
}
