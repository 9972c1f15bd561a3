//! Fluent builders for single blocking HTTP exchanges.
//!
//! # Overview
//! Two builders share one job: collect a method, URL, headers, and body, run
//! exactly one exchange over a [`Transport`], and wrap the outcome with a
//! classified [`ResponseStatus`].
//!
//! - [`Request`] / [`Response`]: mutable method and URL, whole-body
//!   replacement, optional streamed responses, and builder-driven redirect
//!   following capped at [`MAX_REDIRECTS`]. Failures propagate unless an
//!   error handler is registered.
//! - [`HttpRequest`] / [`HttpResponse`]: method and URL fixed at construction,
//!   appendable body, timeouts, and transport-driven redirects. Failures always
//!   go to the error handlers and `send` returns `None`.
//!
//! # Design
//! - Builders are consumed by `submit`/`send`, so a request cannot run twice.
//! - The network primitive sits behind the [`Transport`] trait;
//!   [`UreqTransport`] is the default.
//! - Logging goes through `tracing` and costs nothing without a subscriber.

pub mod error;
pub mod headers;
pub mod http;
pub mod into_url;
pub mod request;
pub mod response;
pub mod status;
pub mod transport;

pub use error::{Error, Result};
pub use headers::HeaderMap;
pub use http::{HttpErrorHandler, HttpMethod, HttpRequest, HttpResponse};
pub use into_url::IntoUrl;
pub use request::{ErrorHandler, Method, Request, RequestState, MAX_REDIRECTS};
pub use response::{Body, Response};
pub use status::ResponseStatus;
pub use transport::{Incoming, Outgoing, Transport, UreqTransport};
pub use url::Url;
