//! The blocking HTTP primitive both builders orchestrate.
//!
//! # Design
//! Builders never touch sockets. They describe one exchange as an
//! [`Outgoing`] value and hand it to a [`Transport`], which performs the
//! round-trip and returns an [`Incoming`] with the body still unread. Error
//! statuses come back as data; deciding what a 4xx/5xx means is the
//! builder's job. [`UreqTransport`] is the default implementation; tests swap
//! in scripted transports through the same trait.

use std::fmt;
use std::io::Read;
use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};
use crate::headers::HeaderMap;

/// Redirect limit handed to the platform client when it follows redirects.
pub const PLATFORM_REDIRECT_LIMIT: u32 = 10;

/// One request as it goes on the wire.
#[derive(Debug, Clone)]
pub struct Outgoing<'a> {
    pub method: &'a str,
    pub url: &'a Url,
    /// Header lines, values already joined.
    pub headers: Vec<(String, String)>,
    /// `None` when the request has no body.
    pub body: Option<&'a [u8]>,
    pub follow_redirects: bool,
    pub connect_timeout: Option<Duration>,
    pub read_timeout: Option<Duration>,
}

/// Response head plus an unread body.
pub struct Incoming {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Box<dyn Read>,
}

impl Incoming {
    /// Drain the body into a string. Invalid UTF-8 is replaced, not rejected.
    pub fn read_body(self) -> Result<String> {
        read_lossy(self.body)
    }
}

impl fmt::Debug for Incoming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Incoming")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

pub(crate) fn read_lossy(mut reader: impl Read) -> Result<String> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    })
}

/// A blocking HTTP client capability.
///
/// Implementations must return error statuses as `Ok(Incoming)` and reserve
/// `Err` for failures where no response head was received.
pub trait Transport: Send + Sync {
    fn execute(&self, request: Outgoing<'_>) -> Result<Incoming>;
}

/// [`Transport`] backed by a fresh `ureq` agent per exchange, configured
/// from the exchange's redirect and timeout settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct UreqTransport;

impl UreqTransport {
    fn agent(request: &Outgoing<'_>) -> ureq::Agent {
        let max_redirects = if request.follow_redirects {
            PLATFORM_REDIRECT_LIMIT
        } else {
            0
        };
        ureq::Agent::config_builder()
            .http_status_as_error(false)
            .allow_non_standard_methods(true)
            .max_redirects(max_redirects)
            .max_redirects_will_error(false)
            .timeout_connect(request.connect_timeout)
            .timeout_recv_response(request.read_timeout)
            .timeout_recv_body(request.read_timeout)
            .build()
            .new_agent()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: Outgoing<'_>) -> Result<Incoming> {
        let agent = Self::agent(&request);

        let mut builder = ureq::http::Request::builder()
            .method(request.method)
            .uri(request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let result = match request.body {
            Some(body) => builder
                .body(body)
                .map_err(|e| invalid_request(&request, e))
                .and_then(|req| agent.run(req).map_err(|e| Error::transport(request.url, e))),
            None => builder
                .body(())
                .map_err(|e| invalid_request(&request, e))
                .and_then(|req| agent.run(req).map_err(|e| Error::transport(request.url, e))),
        };
        let response = result?;

        let status = response.status().as_u16();
        let mut headers = HeaderMap::new();
        for (name, value) in response.headers() {
            headers.add(
                name.as_str(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            );
        }
        let body = Box::new(response.into_body().into_reader());

        Ok(Incoming {
            status,
            headers,
            body,
        })
    }
}

/// `http::Error` from the request builder means a method, URI, or header did
/// not validate. Header problems are reported by name when one can be found.
fn invalid_request(request: &Outgoing<'_>, err: ureq::http::Error) -> Error {
    let bad_header = request.headers.iter().find(|(name, value)| {
        ureq::http::HeaderName::from_bytes(name.as_bytes()).is_err()
            || ureq::http::HeaderValue::from_str(value).is_err()
    });
    match bad_header {
        Some((name, _)) => Error::InvalidHeader {
            name: name.clone(),
            reason: err.to_string(),
        },
        None => Error::transport(request.url, err),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted transport for unit tests.

    use std::collections::VecDeque;
    use std::io::Cursor;
    use std::sync::Mutex;

    use super::*;

    /// What the scripted transport saw for one exchange.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Seen {
        pub method: String,
        pub url: String,
        pub headers: Vec<(String, String)>,
        pub body: Option<String>,
        pub follow_redirects: bool,
        pub connect_timeout: Option<Duration>,
        pub read_timeout: Option<Duration>,
    }

    #[derive(Clone)]
    pub enum Reply {
        Respond {
            status: u16,
            headers: Vec<(&'static str, String)>,
            body: Vec<u8>,
        },
        Fail(&'static str),
    }

    impl Reply {
        pub fn status(status: u16, body: &str) -> Self {
            Reply::Respond {
                status,
                headers: Vec::new(),
                body: body.as_bytes().to_vec(),
            }
        }

        pub fn bytes(status: u16, body: &[u8]) -> Self {
            Reply::Respond {
                status,
                headers: Vec::new(),
                body: body.to_vec(),
            }
        }

        pub fn redirect(status: u16, location: &str) -> Self {
            Reply::Respond {
                status,
                headers: vec![("Location", location.to_string())],
                body: Vec::new(),
            }
        }
    }

    /// Replays queued replies in order; once the queue runs dry the last
    /// reply is repeated, so a single redirect reply models a loop.
    #[derive(Default)]
    pub struct Scripted {
        replies: Mutex<VecDeque<Reply>>,
        seen: Mutex<Vec<Seen>>,
    }

    impl Scripted {
        pub fn new(replies: Vec<Reply>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                seen: Mutex::new(Vec::new()),
            }
        }

        pub fn seen(&self) -> Vec<Seen> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl Transport for Scripted {
        fn execute(&self, request: Outgoing<'_>) -> Result<Incoming> {
            self.seen.lock().unwrap().push(Seen {
                method: request.method.to_string(),
                url: request.url.to_string(),
                headers: request.headers.clone(),
                body: request
                    .body
                    .map(|b| String::from_utf8_lossy(b).into_owned()),
                follow_redirects: request.follow_redirects,
                connect_timeout: request.connect_timeout,
                read_timeout: request.read_timeout,
            });

            let mut replies = self.replies.lock().unwrap();
            let reply = if replies.len() > 1 {
                replies.pop_front()
            } else {
                replies.front().cloned()
            };
            drop(replies);

            match reply {
                Some(Reply::Respond {
                    status,
                    headers,
                    body,
                }) => {
                    let mut map = HeaderMap::new();
                    for (name, value) in headers {
                        map.add(name, value);
                    }
                    Ok(Incoming {
                        status,
                        headers: map,
                        body: Box::new(Cursor::new(body)),
                    })
                }
                Some(Reply::Fail(msg)) => Err(Error::transport(request.url, msg)),
                None => Err(Error::transport(request.url, "no scripted reply")),
            }
        }
    }
}
