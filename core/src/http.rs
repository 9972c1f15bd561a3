//! The typed request builder.
//!
//! # Design
//! `HttpRequest` fixes its method and URL at construction and accumulates
//! multi-valued headers and an appendable body. Redirects and timeouts are
//! delegated to the transport rather than handled here.
//!
//! [`HttpRequest::send`] never returns an error: every failure is logged,
//! handed to the registered [`HttpErrorHandler`]s in registration order, and
//! turned into `None`, even when no handler is registered. Callers that want
//! the failure itself use [`HttpRequest::try_send`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, error, trace};
use url::Url;

use crate::error::{Error, Result};
use crate::headers::HeaderMap;
use crate::into_url::IntoUrl;
use crate::request::RequestState;
use crate::status::ResponseStatus;
use crate::transport::{Outgoing, Transport, UreqTransport};

/// HTTP method for a typed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Connect,
    Delete,
    Get,
    Head,
    Options,
    Post,
    Put,
    Trace,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Connect => "CONNECT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Callback invoked with the failed request and the failure.
pub trait HttpErrorHandler {
    fn handle(&self, request: &HttpRequest, error: &Error);
}

impl<F> HttpErrorHandler for F
where
    F: Fn(&HttpRequest, &Error),
{
    fn handle(&self, request: &HttpRequest, error: &Error) {
        self(request, error)
    }
}

/// A typed, single-use HTTP request.
///
/// ```no_run
/// use request_core::HttpRequest;
///
/// let response = HttpRequest::post("http://localhost:3000/echo")?
///     .add_header("Accept", "text/plain")
///     .append_to_body("count=")
///     .append_to_body(3)
///     .send();
/// # Ok::<(), request_core::Error>(())
/// ```
///
/// Sending consumes the request:
///
/// ```compile_fail
/// use request_core::HttpRequest;
///
/// let request = HttpRequest::get("http://localhost:3000/ok").unwrap();
/// let _first = request.send();
/// let _second = request.send();
/// ```
pub struct HttpRequest {
    method: HttpMethod,
    url: Url,
    headers: HeaderMap,
    body: String,
    error_handlers: Vec<Box<dyn HttpErrorHandler>>,
    state: RequestState,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    follow_redirects: bool,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("headers", &self.headers)
            .field("body", &self.body)
            .field("error_handlers", &self.error_handlers.len())
            .field("state", &self.state)
            .field("connect_timeout", &self.connect_timeout)
            .field("read_timeout", &self.read_timeout)
            .field("follow_redirects", &self.follow_redirects)
            .finish()
    }
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl IntoUrl) -> Result<Self> {
        let url = url.into_url()?;
        trace!(%method, %url, "created request");
        Ok(Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: String::new(),
            error_handlers: Vec::new(),
            state: RequestState::Unsent,
            connect_timeout: None,
            read_timeout: None,
            follow_redirects: false,
            transport: Arc::new(UreqTransport),
        })
    }

    pub fn get(url: impl IntoUrl) -> Result<Self> {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: impl IntoUrl) -> Result<Self> {
        Self::new(HttpMethod::Post, url)
    }

    pub fn put(url: impl IntoUrl) -> Result<Self> {
        Self::new(HttpMethod::Put, url)
    }

    pub fn delete(url: impl IntoUrl) -> Result<Self> {
        Self::new(HttpMethod::Delete, url)
    }

    pub fn add_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        trace!(%key, %value, "add header");
        self.headers.add(key, value);
        self
    }

    pub fn add_headers<I, V>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let key = key.into();
        trace!(%key, "add headers");
        self.headers.add_all(key, values);
        self
    }

    pub fn set_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        trace!(%key, %value, "set header");
        self.headers.set(key, value);
        self
    }

    pub fn set_headers<I, V>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let key = key.into();
        trace!(%key, "set headers");
        self.headers.set_all(key, values);
        self
    }

    /// Append the display form of `value` to the body.
    pub fn append_to_body(mut self, value: impl fmt::Display) -> Self {
        self.body.push_str(&value.to_string());
        self
    }

    pub fn add_error_handler(mut self, handler: impl HttpErrorHandler + 'static) -> Self {
        self.error_handlers.push(Box::new(handler));
        self
    }

    /// Let the transport follow redirects.
    pub fn follow_redirects(mut self) -> Self {
        trace!("follow redirects");
        self.follow_redirects = true;
        self
    }

    /// A zero duration leaves the transport default in place.
    pub fn set_connect_timeout(mut self, timeout: Duration) -> Self {
        trace!(?timeout, "connect timeout");
        self.connect_timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    /// A zero duration leaves the transport default in place.
    pub fn set_read_timeout(mut self, timeout: Duration) -> Self {
        trace!(?timeout, "read timeout");
        self.read_timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
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

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout
    }

    pub fn follows_redirects(&self) -> bool {
        self.follow_redirects
    }

    /// Execute the request, routing any failure to the error handlers.
    ///
    /// `None` means the exchange failed and the handlers (if any) have
    /// already run. `Some` does not imply a 2xx status.
    pub fn send(mut self) -> Option<HttpResponse> {
        match self.exchange() {
            Ok((status, headers, body)) => Some(HttpResponse {
                status,
                headers,
                body,
                request: self,
            }),
            Err(err) => {
                error!(method = %self.method, url = %self.url, error = %err, "request failed");
                for handler in &self.error_handlers {
                    trace!("running error handler");
                    handler.handle(&self, &err);
                }
                None
            }
        }
    }

    /// Execute the request and return the failure instead of routing it to
    /// the error handlers.
    pub fn try_send(mut self) -> Result<HttpResponse> {
        let (status, headers, body) = self.exchange()?;
        Ok(HttpResponse {
            status,
            headers,
            body,
            request: self,
        })
    }

    fn exchange(&mut self) -> Result<(ResponseStatus, HeaderMap, String)> {
        self.state = RequestState::Sent;
        debug!(method = %self.method, url = %self.url, "sending request");

        let incoming = self.transport.execute(Outgoing {
            method: self.method.as_str(),
            url: &self.url,
            headers: self.headers.lines(),
            body: (!self.body.is_empty()).then(|| self.body.as_bytes()),
            follow_redirects: self.follow_redirects,
            connect_timeout: self.connect_timeout,
            read_timeout: self.read_timeout,
        })?;

        let code = incoming.status;
        let headers = incoming.headers.clone();
        let body = incoming.read_body()?;
        let status = ResponseStatus::from_code(code);
        if status.is_error() {
            return Err(Error::Status { code, body });
        }

        debug!(%status, "received response");
        Ok((status, headers, body))
    }
}

/// Result of a sent [`HttpRequest`].
#[derive(Debug)]
pub struct HttpResponse {
    status: ResponseStatus,
    headers: HeaderMap,
    body: String,
    request: HttpRequest,
}

impl HttpResponse {
    pub fn status(&self) -> ResponseStatus {
        self.status
    }

    pub fn code(&self) -> u16 {
        self.status.code()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Values of a response header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&[String]> {
        self.headers.get_ignore_case(name)
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    pub fn into_body(self) -> String {
        self.body
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}
