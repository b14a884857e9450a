use async_trait::async_trait;
use formpress_http::{Error, Handler, Request, Response, Result};
use std::sync::Arc;
use std::time::Duration;

/// Bounds the time a wrapped handler may spend on one request.
///
/// An expired request yields [`Error::Timeout`], which renders as a 503.
///
/// # Examples
///
/// ```
/// use formpress_server::TimeoutHandler;
/// use formpress_http::{Handler, Request, Response, Result};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// struct Fast;
///
/// #[async_trait::async_trait]
/// impl Handler for Fast {
///     async fn handle(&self, _request: Request) -> Result<Response> {
///         Ok(Response::ok())
///     }
/// }
///
/// let handler = TimeoutHandler::new(Arc::new(Fast), Duration::from_secs(60));
/// assert_eq!(handler.timeout(), Duration::from_secs(60));
/// ```
pub struct TimeoutHandler {
	inner: Arc<dyn Handler>,
	timeout: Duration,
}

impl TimeoutHandler {
	pub fn new(inner: Arc<dyn Handler>, timeout: Duration) -> Self {
		Self { inner, timeout }
	}

	pub fn timeout(&self) -> Duration {
		self.timeout
	}
}

#[async_trait]
impl Handler for TimeoutHandler {
	async fn handle(&self, request: Request) -> Result<Response> {
		let path = request.path().to_string();
		match tokio::time::timeout(self.timeout, self.inner.handle(request)).await {
			Ok(result) => result,
			Err(_) => {
				tracing::warn!(
					path = %path,
					timeout_ms = self.timeout.as_millis() as u64,
					"request timed out"
				);
				Err(Error::Timeout("request timed out".into()))
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	struct Sleepy(Duration);

	#[async_trait]
	impl Handler for Sleepy {
		async fn handle(&self, _request: Request) -> Result<Response> {
			tokio::time::sleep(self.0).await;
			Ok(Response::ok().with_body("done"))
		}
	}

	#[rstest]
	#[case(Duration::from_millis(5), Duration::from_secs(1), true)]
	#[case(Duration::from_millis(500), Duration::from_millis(20), false)]
	#[tokio::test]
	async fn test_timeout_handler(
		#[case] work: Duration,
		#[case] limit: Duration,
		#[case] completes: bool,
	) {
		// Arrange
		let handler = TimeoutHandler::new(Arc::new(Sleepy(work)), limit);
		let request = Request::builder().uri("/slow").build().unwrap();

		// Act
		let result = handler.handle(request).await;

		// Assert
		if completes {
			assert_eq!(result.unwrap().body_text(), "done");
		} else {
			assert_eq!(result.unwrap_err(), Error::Timeout("request timed out".into()));
		}
	}
}
