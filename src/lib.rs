//! formpress: an embeddable form service.
//!
//! The server renders localized forms fetched from an upstream form
//! service, serves the browser embed script, and validates submissions
//! before forwarding them.
//!
//! | route | purpose |
//! |---|---|
//! | `GET /embedv1.js` | embed script |
//! | `GET /api/public/v1/embeds/{embedId}/data` | form markup, CSS and constraints |
//! | `POST /api/public/v1/embeds/{embedId}/submissions` | validate and forward a submission |
//! | `GET /f/{formId}` | standalone form page |
//! | `GET /healthz` | liveness |

pub mod app;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;
pub mod telemetry;

pub use app::{app, build_server, router, server_limits};
pub use state::{AppState, RenderedForm};
