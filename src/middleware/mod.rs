//! Request middleware, registered outermost first: audit, logging, CORS.

mod audit;
mod cors;
mod logging;

pub use audit::{AuditMiddleware, RequestContext, client_ip, generate_request_id};
pub use cors::{CorsConfig, CorsMiddleware};
pub use logging::LoggingMiddleware;
