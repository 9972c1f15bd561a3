//! Classification of numeric HTTP status codes.

use std::fmt;

macro_rules! statuses {
    ($($variant:ident = $code:literal, $reason:literal;)+) => {
        /// Named HTTP status. Codes outside the registry classify as
        /// [`ResponseStatus::Unknown`] and keep their numeric value.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ResponseStatus {
            $($variant,)+
            Unknown(u16),
        }

        impl ResponseStatus {
            pub fn from_code(code: u16) -> Self {
                match code {
                    $($code => ResponseStatus::$variant,)+
                    other => ResponseStatus::Unknown(other),
                }
            }

            pub fn code(self) -> u16 {
                match self {
                    $(ResponseStatus::$variant => $code,)+
                    ResponseStatus::Unknown(code) => code,
                }
            }

            /// Canonical reason phrase, `None` for unknown codes.
            pub fn reason(self) -> Option<&'static str> {
                match self {
                    $(ResponseStatus::$variant => Some($reason),)+
                    ResponseStatus::Unknown(_) => None,
                }
            }
        }
    };
}

statuses! {
    Continue = 100, "Continue";
    SwitchingProtocols = 101, "Switching Protocols";
    Processing = 102, "Processing";
    EarlyHints = 103, "Early Hints";
    Ok = 200, "OK";
    Created = 201, "Created";
    Accepted = 202, "Accepted";
    NonAuthoritativeInformation = 203, "Non-Authoritative Information";
    NoContent = 204, "No Content";
    ResetContent = 205, "Reset Content";
    PartialContent = 206, "Partial Content";
    MultiStatus = 207, "Multi-Status";
    AlreadyReported = 208, "Already Reported";
    ImUsed = 226, "IM Used";
    MultipleChoices = 300, "Multiple Choices";
    MovedPermanently = 301, "Moved Permanently";
    Found = 302, "Found";
    SeeOther = 303, "See Other";
    NotModified = 304, "Not Modified";
    UseProxy = 305, "Use Proxy";
    TemporaryRedirect = 307, "Temporary Redirect";
    PermanentRedirect = 308, "Permanent Redirect";
    BadRequest = 400, "Bad Request";
    Unauthorized = 401, "Unauthorized";
    PaymentRequired = 402, "Payment Required";
    Forbidden = 403, "Forbidden";
    NotFound = 404, "Not Found";
    MethodNotAllowed = 405, "Method Not Allowed";
    NotAcceptable = 406, "Not Acceptable";
    ProxyAuthenticationRequired = 407, "Proxy Authentication Required";
    RequestTimeout = 408, "Request Timeout";
    Conflict = 409, "Conflict";
    Gone = 410, "Gone";
    LengthRequired = 411, "Length Required";
    PreconditionFailed = 412, "Precondition Failed";
    ContentTooLarge = 413, "Content Too Large";
    UriTooLong = 414, "URI Too Long";
    UnsupportedMediaType = 415, "Unsupported Media Type";
    RangeNotSatisfiable = 416, "Range Not Satisfiable";
    ExpectationFailed = 417, "Expectation Failed";
    ImATeapot = 418, "I'm a teapot";
    MisdirectedRequest = 421, "Misdirected Request";
    UnprocessableContent = 422, "Unprocessable Content";
    Locked = 423, "Locked";
    FailedDependency = 424, "Failed Dependency";
    TooEarly = 425, "Too Early";
    UpgradeRequired = 426, "Upgrade Required";
    PreconditionRequired = 428, "Precondition Required";
    TooManyRequests = 429, "Too Many Requests";
    RequestHeaderFieldsTooLarge = 431, "Request Header Fields Too Large";
    UnavailableForLegalReasons = 451, "Unavailable For Legal Reasons";
    InternalServerError = 500, "Internal Server Error";
    NotImplemented = 501, "Not Implemented";
    BadGateway = 502, "Bad Gateway";
    ServiceUnavailable = 503, "Service Unavailable";
    GatewayTimeout = 504, "Gateway Timeout";
    HttpVersionNotSupported = 505, "HTTP Version Not Supported";
    VariantAlsoNegotiates = 506, "Variant Also Negotiates";
    InsufficientStorage = 507, "Insufficient Storage";
    LoopDetected = 508, "Loop Detected";
    NotExtended = 510, "Not Extended";
    NetworkAuthenticationRequired = 511, "Network Authentication Required";
}

impl ResponseStatus {
    pub fn is_informational(self) -> bool {
        (100..200).contains(&self.code())
    }

    pub fn is_success(self) -> bool {
        (200..300).contains(&self.code())
    }

    pub fn is_redirect(self) -> bool {
        (300..400).contains(&self.code())
    }

    pub fn is_client_error(self) -> bool {
        (400..500).contains(&self.code())
    }

    pub fn is_server_error(self) -> bool {
        (500..600).contains(&self.code())
    }

    /// Statuses for which no success body is available.
    pub fn is_error(self) -> bool {
        self.code() >= 400
    }
}

impl From<u16> for ResponseStatus {
    fn from(code: u16) -> Self {
        ResponseStatus::from_code(code)
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason() {
            Some(reason) => write!(f, "{} {reason}", self.code()),
            None => write!(f, "{}", self.code()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_classify_by_name() {
        assert_eq!(ResponseStatus::from_code(200), ResponseStatus::Ok);
        assert_eq!(ResponseStatus::from_code(404), ResponseStatus::NotFound);
        assert_eq!(
            ResponseStatus::from_code(500),
            ResponseStatus::InternalServerError
        );
    }

    #[test]
    fn unknown_codes_fall_back() {
        for code in [0, 199, 299, 306, 499, 599, 999, u16::MAX] {
            let status = ResponseStatus::from_code(code);
            assert_eq!(status, ResponseStatus::Unknown(code));
            assert_eq!(status.code(), code);
            assert!(status.reason().is_none());
        }
    }

    #[test]
    fn every_named_code_maps_back_to_itself() {
        for code in 100..600 {
            let status = ResponseStatus::from_code(code);
            assert_eq!(status.code(), code);
        }
    }

    #[test]
    fn class_predicates() {
        assert!(ResponseStatus::Found.is_redirect());
        assert!(ResponseStatus::NoContent.is_success());
        assert!(ResponseStatus::Gone.is_client_error());
        assert!(ResponseStatus::BadGateway.is_server_error());
        assert!(ResponseStatus::Unknown(599).is_error());
        assert!(!ResponseStatus::Unknown(299).is_error());
    }

    #[test]
    fn display_includes_reason() {
        assert_eq!(ResponseStatus::NotFound.to_string(), "404 Not Found");
        assert_eq!(ResponseStatus::Unknown(299).to_string(), "299");
    }
}
