//! The original request builder: mutable method, optional URL, whole-body
//! replacement, and builder-driven redirect following.
//!
//! # Design
//! `Request` is configured through by-value chainable setters and executed
//! with [`Request::submit`], which consumes it. The request rides along
//! inside the [`Response`] (or is lent to error handlers) so callers can still
//! inspect what was sent, including the URL a redirect chain ended on.
//!
//! Failures while the exchange is in flight propagate to the caller unless
//! at least one error handler is registered, in which case every handler sees
//! the error body and `submit` returns `Ok(None)`.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::headers::HeaderMap;
use crate::into_url::{resolve_location, IntoUrl};
use crate::response::{Body, Response};
use crate::status::ResponseStatus;
use crate::transport::{Incoming, Outgoing, Transport, UreqTransport};

/// Most redirect hops `submit` follows before failing.
pub const MAX_REDIRECTS: usize = 10;

/// Methods the original builder understands. `Info` is not a registered
/// HTTP method and is sent verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Head,
    Info,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Info => "INFO",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a builder has been executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Unsent,
    Sent,
}

/// Callback receiving the captured error body and the failed request.
pub trait ErrorHandler {
    fn handle(&self, body: &str, request: &Request);
}

impl<F> ErrorHandler for F
where
    F: Fn(&str, &Request),
{
    fn handle(&self, body: &str, request: &Request) {
        self(body, request)
    }
}

/// Chainable request builder.
///
/// ```no_run
/// use request_core::Request;
///
/// let response = Request::new()
///     .url("http://localhost:3000/ok")?
///     .post()
///     .set_header("X", "a")
///     .add_header("X", "b")
///     .request_body("payload")
///     .submit()?;
/// # Ok::<(), request_core::Error>(())
/// ```
///
/// A request can be submitted once:
///
/// ```compile_fail
/// use request_core::Request;
///
/// let request = Request::new().url("http://localhost:3000/ok").unwrap();
/// let _first = request.submit();
/// let _second = request.submit();
/// ```
pub struct Request {
    method: Method,
    url: Option<Url>,
    headers: HeaderMap,
    body: String,
    error_handlers: Vec<Box<dyn ErrorHandler>>,
    state: RequestState,
    stream_response: bool,
    follow_redirects: bool,
    transport: Arc<dyn Transport>,
}

impl Default for Request {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("url", &self.url.as_ref().map(Url::as_str))
            .field("headers", &self.headers)
            .field("body", &self.body)
            .field("error_handlers", &self.error_handlers.len())
            .field("state", &self.state)
            .field("stream_response", &self.stream_response)
            .field("follow_redirects", &self.follow_redirects)
            .finish()
    }
}

impl Request {
    pub fn new() -> Self {
        Self {
            method: Method::Get,
            url: None,
            headers: HeaderMap::new(),
            body: String::new(),
            error_handlers: Vec::new(),
            state: RequestState::Unsent,
            stream_response: false,
            follow_redirects: false,
            transport: Arc::new(UreqTransport),
        }
    }

    /// Replace any value stored under `key`.
    pub fn set_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(key, value);
        self
    }

    /// Append `value` to `key`; the wire line becomes `old; value`.
    pub fn add_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.add(key, value);
        self
    }

    /// Replace the whole request body.
    pub fn request_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn get(self) -> Self {
        self.method(Method::Get)
    }

    pub fn post(self) -> Self {
        self.method(Method::Post)
    }

    pub fn put(self) -> Self {
        self.method(Method::Put)
    }

    pub fn delete(self) -> Self {
        self.method(Method::Delete)
    }

    pub fn head(self) -> Self {
        self.method(Method::Head)
    }

    pub fn info(self) -> Self {
        self.method(Method::Info)
    }

    /// Set the target URL. Fails immediately on a malformed URL.
    pub fn url(mut self, url: impl IntoUrl) -> Result<Self> {
        self.url = Some(url.into_url()?);
        Ok(self)
    }

    /// Hand the response body back unread instead of buffering it.
    pub fn stream_response(mut self) -> Self {
        self.stream_response = true;
        self
    }

    pub fn allow_redirects(mut self) -> Self {
        self.follow_redirects = true;
        self
    }

    pub fn disallow_redirects(mut self) -> Self {
        self.follow_redirects = false;
        self
    }

    /// Register a failure callback. Handlers run in registration order.
    pub fn add_error_handler(mut self, handler: impl ErrorHandler + 'static) -> Self {
        self.error_handlers.push(Box::new(handler));
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn current_method(&self) -> Method {
        self.method
    }

    pub fn current_url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// The header line `key` would produce.
    pub fn header(&self, key: &str) -> Option<String> {
        self.headers.joined(key)
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn follows_redirects(&self) -> bool {
        self.follow_redirects
    }

    pub fn streams_response(&self) -> bool {
        self.stream_response
    }

    /// Execute the request.
    ///
    /// A request with no URL fails with [`Error::MissingUrl`] without
    /// reaching the handlers. Returns `Ok(None)` when a failure was handed to
    /// the registered error handlers. Without handlers the failure is returned as `Err`. A
    /// `Some` response may still carry a 1xx-3xx status; check
    /// [`Response::status`].
    pub fn submit(mut self) -> Result<Option<Response>> {
        if self.url.is_none() {
            return Err(Error::MissingUrl);
        }
        self.state = RequestState::Sent;

        match self.exchange() {
            Ok((status, headers, body)) => Ok(Some(Response::new(status, headers, body, self))),
            Err(err) if self.error_handlers.is_empty() => Err(err),
            Err(err) => {
                let body = match &err {
                    Error::Status { body, .. } => body.clone(),
                    other => other.to_string(),
                };
                warn!(error = %err, handlers = self.error_handlers.len(), "request failed");
                for handler in &self.error_handlers {
                    handler.handle(&body, &self);
                }
                Ok(None)
            }
        }
    }

    fn exchange(&mut self) -> Result<(ResponseStatus, HeaderMap, Body)> {
        let mut hops = 0;

        let incoming = loop {
            let url = self.url.as_ref().ok_or(Error::MissingUrl)?;
            debug!(method = %self.method, url = %url, "submitting request");

            let incoming = self.transport.execute(Outgoing {
                method: self.method.as_str(),
                url,
                headers: self.headers.lines(),
                body: (!self.body.is_empty()).then(|| self.body.as_bytes()),
                follow_redirects: false,
                connect_timeout: None,
                read_timeout: None,
            })?;

            if !(self.follow_redirects && (300..400).contains(&incoming.status)) {
                break incoming;
            }
            if hops == MAX_REDIRECTS {
                return Err(Error::TooManyRedirects {
                    limit: MAX_REDIRECTS,
                });
            }

            let location = incoming
                .headers
                .get_ignore_case("Location")
                .and_then(|values| values.first())
                .ok_or(Error::MissingLocation {
                    code: incoming.status,
                })?;
            let next = resolve_location(url, location)?;
            debug!(status = incoming.status, from = %url, to = %next, "following redirect");

            self.url = Some(next);
            self.method = Method::Get;
            self.body.clear();
            hops += 1;
        };

        let status = ResponseStatus::from_code(incoming.status);
        if status.is_error() {
            let code = incoming.status;
            let body = incoming.read_body()?;
            return Err(Error::Status { code, body });
        }

        let Incoming { headers, body, .. } = incoming;
        let body = if self.stream_response {
            Body::Stream(body)
        } else {
            Body::Text(Body::Stream(body).into_text()?)
        };
        Ok((status, headers, body))
    }
}
