//! Upstream form service access for formpress.
//!
//! [`FormSource`] is the seam the application depends on;
//! [`FormServiceClient`] implements it over HTTP with `reqwest`.

pub mod client;
pub mod error;
pub mod model;

pub use client::{FormServiceClient, FormSource, forwardable_headers};
pub use error::{RemoteError, RemoteResult};
pub use model::FormRecord;
