//! Result of a submitted [`Request`].

use std::fmt;
use std::io::{Cursor, Read};

use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::headers::HeaderMap;
use crate::request::Request;
use crate::status::ResponseStatus;
use crate::transport::read_lossy;

/// Response body: buffered text, or the live stream when the request asked
/// for a streamed response. A stream is closed when dropped.
pub enum Body {
    Text(String),
    Stream(Box<dyn Read>),
}

impl Body {
    /// Buffer the body, draining the stream if there is one. Invalid UTF-8
    /// is replaced with U+FFFD.
    pub fn into_text(self) -> Result<String> {
        match self {
            Body::Text(text) => Ok(text),
            Body::Stream(reader) => read_lossy(reader),
        }
    }

    pub fn into_reader(self) -> Box<dyn Read> {
        match self {
            Body::Text(text) => Box::new(Cursor::new(text.into_bytes())),
            Body::Stream(reader) => reader,
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Body::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

#[derive(Debug)]
pub struct Response {
    status: ResponseStatus,
    headers: HeaderMap,
    body: Body,
    request: Request,
}

impl Response {
    pub(crate) fn new(status: ResponseStatus, headers: HeaderMap, body: Body, request: Request) -> Self {
        Self {
            status,
            headers,
            body,
            request,
        }
    }

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

    /// The request that produced this response, after any redirects.
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Buffered body text; `None` for streamed responses.
    pub fn body(&self) -> Option<&str> {
        match &self.body {
            Body::Text(text) => Some(text),
            Body::Stream(_) => None,
        }
    }

    pub fn is_streaming(&self) -> bool {
        matches!(self.body, Body::Stream(_))
    }

    /// Take ownership of the body as a reader. The caller closes it by
    /// dropping it.
    pub fn into_reader(self) -> Box<dyn Read> {
        self.body.into_reader()
    }

    pub fn into_body(self) -> Body {
        self.body
    }

    pub fn text(self) -> Result<String> {
        self.body.into_text()
    }

    pub fn json<T: DeserializeOwned>(self) -> Result<T> {
        let text = self.text()?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    fn response(body: Body) -> Response {
        let mut headers = HeaderMap::new();
        headers.add("content-type", "application/json");
        Response::new(ResponseStatus::Ok, headers, body, Request::new())
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Greeting {
        hello: String,
    }

    #[test]
    fn text_body_is_visible() {
        let response = response(Body::Text("plain".to_string()));
        assert_eq!(response.body(), Some("plain"));
        assert!(!response.is_streaming());
        assert_eq!(response.code(), 200);
    }

    #[test]
    fn header_lookup_ignores_case() {
        let response = response(Body::Text(String::new()));
        assert_eq!(
            response.header("Content-Type"),
            Some(&["application/json".to_string()][..])
        );
    }

    #[test]
    fn stream_drains_into_text() {
        let stream = Box::new(Cursor::new(b"drained".to_vec()));
        let response = response(Body::Stream(stream));
        assert!(response.is_streaming());
        assert_eq!(response.text().unwrap(), "drained");
    }

    #[test]
    fn stream_with_invalid_utf8_is_decoded_lossily() {
        let stream = Box::new(Cursor::new(b"caf\xE9".to_vec()));
        let response = response(Body::Stream(stream));
        assert_eq!(response.text().unwrap(), "caf\u{FFFD}");
    }

    #[test]
    fn json_decodes_body() {
        let response = response(Body::Text(r#"{"hello":"world"}"#.to_string()));
        let greeting: Greeting = response.json().unwrap();
        assert_eq!(greeting.hello, "world");
    }

    #[test]
    fn bad_json_is_an_error() {
        let response = response(Body::Text("not json".to_string()));
        let err = response.json::<Greeting>().unwrap_err();
        assert!(matches!(err, crate::Error::Json(_)));
    }
}
