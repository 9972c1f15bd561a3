//! Conversion of caller-supplied URLs.

use url::Url;

use crate::error::{Error, Result};

/// Something that can become an HTTP(S) [`Url`].
///
/// Implemented for already-parsed URLs and for strings; strings are parsed
/// eagerly so a malformed URL is reported where the builder is created.
pub trait IntoUrl {
    fn into_url(self) -> Result<Url>;
}

impl IntoUrl for Url {
    fn into_url(self) -> Result<Url> {
        check_scheme(self)
    }
}

impl IntoUrl for &Url {
    fn into_url(self) -> Result<Url> {
        check_scheme(self.clone())
    }
}

impl IntoUrl for &str {
    fn into_url(self) -> Result<Url> {
        let url = Url::parse(self).map_err(|source| Error::MalformedUrl {
            url: self.to_string(),
            source,
        })?;
        check_scheme(url)
    }
}

impl IntoUrl for String {
    fn into_url(self) -> Result<Url> {
        self.as_str().into_url()
    }
}

impl IntoUrl for &String {
    fn into_url(self) -> Result<Url> {
        self.as_str().into_url()
    }
}

fn check_scheme(url: Url) -> Result<Url> {
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(Error::UnsupportedScheme(other.to_string())),
    }
}

/// Resolve a `Location` header value against the URL that produced it.
pub(crate) fn resolve_location(base: &Url, location: &str) -> Result<Url> {
    let url = base.join(location).map_err(|source| Error::MalformedUrl {
        url: location.to_string(),
        source,
    })?;
    check_scheme(url)
}
