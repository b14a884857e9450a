//! HTTP primitives shared by every formpress crate.
//!
//! This crate provides the request and response types that flow through the
//! server, the [`Handler`] and [`Middleware`] traits used to compose request
//! processing, and the [`Error`] type that converts failures into JSON error
//! responses.
//!
//! ## Quick start
//!
//! ```rust
//! use formpress_http::{Handler, Request, Response, Result};
//! use async_trait::async_trait;
//!
//! struct Hello;
//!
//! #[async_trait]
//! impl Handler for Hello {
//!     async fn handle(&self, _request: Request) -> Result<Response> {
//!         Ok(Response::ok().with_body("Hello!"))
//!     }
//! }
//! ```

pub mod error;
pub mod extensions;
pub mod middleware;
pub mod request;
pub mod response;

pub use error::{Error, Result};
pub use extensions::Extensions;
pub use middleware::{Handler, Middleware, MiddlewareChain};
pub use request::{Request, RequestBuilder};
pub use response::Response;
