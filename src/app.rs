//! Wiring of routes, middleware and server limits.

use std::sync::Arc;

use formpress_conf::Settings;
use formpress_http::MiddlewareChain;
use formpress_server::{HttpServer, ServerLimits};

use crate::handlers::{
	EmbedDataHandler, EmbedScriptHandler, HealthHandler, StandalonePageHandler, SubmissionHandler,
};
use crate::middleware::{AuditMiddleware, CorsConfig, CorsMiddleware, LoggingMiddleware};
use crate::router::Router;
use crate::state::AppState;

/// All routes of the service.
pub fn router(state: Arc<AppState>) -> Router {
	Router::new()
		.get("/embedv1.js", Arc::new(EmbedScriptHandler::new(state.clone())))
		.get(
			"/api/public/v1/embeds/{embedId}/data",
			Arc::new(EmbedDataHandler::new(state.clone())),
		)
		.post(
			"/api/public/v1/embeds/{embedId}/submissions",
			Arc::new(SubmissionHandler::new(state.clone())),
		)
		.get("/f/{formId}", Arc::new(StandalonePageHandler::new(state)))
		.get("/healthz", Arc::new(HealthHandler))
}

/// Limits derived from the server settings.
pub fn server_limits(settings: &Settings) -> ServerLimits {
	ServerLimits {
		max_body_bytes: settings.server.max_body_bytes,
		header_read_timeout: settings.server.read_timeout(),
		request_timeout: Some(settings.server.write_timeout()),
	}
}

/// Routes wrapped in middleware, outermost first: audit, logging, CORS.
pub fn app(settings: &Settings, state: Arc<AppState>) -> MiddlewareChain {
	MiddlewareChain::new(Arc::new(router(state)))
		.with_middleware(Arc::new(AuditMiddleware))
		.with_middleware(Arc::new(LoggingMiddleware))
		.with_middleware(Arc::new(CorsMiddleware::new(CorsConfig::from(&settings.cors))))
}

/// The HTTP server for [`app`] with limits from `settings`.
pub fn build_server(settings: &Settings, state: Arc<AppState>) -> HttpServer {
	HttpServer::new(Arc::new(app(settings, state))).with_limits(server_limits(settings))
}
