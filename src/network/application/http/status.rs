//! HTTP status codes.

/// An HTTP status code with an optional reason phrase.
///
/// Classification is purely numeric: five non-overlapping bands of one
/// hundred codes each, from informational (1xx) to server error (5xx).
///
/// # Examples
///
/// ```rust
/// use libiot_http::network::application::http::StatusCode;
///
/// let status = StatusCode::new(404);
/// assert!(status.client_error());
/// assert!(!status.success());
/// assert_eq!(status.reason(), "Not Found");
///
/// let custom = StatusCode::with_reason(299, "Fine");
/// assert!(custom.success());
/// assert_eq!(custom.reason(), "Fine");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCode<'a> {
    code: u16,
    phrase: &'a str,
    digits: [u8; 3],
}

impl StatusCode<'static> {
    /// 100 Continue.
    pub const CONTINUE: Self = Self::new(100);
    /// 101 Switching Protocols.
    pub const SWITCHING_PROTOCOLS: Self = Self::new(101);
    /// 200 OK.
    pub const OK: Self = Self::new(200);
    /// 201 Created.
    pub const CREATED: Self = Self::new(201);
    /// 202 Accepted.
    pub const ACCEPTED: Self = Self::new(202);
    /// 204 No Content.
    pub const NO_CONTENT: Self = Self::new(204);
    /// 301 Moved Permanently.
    pub const MOVED_PERMANENTLY: Self = Self::new(301);
    /// 302 Found.
    pub const FOUND: Self = Self::new(302);
    /// 304 Not Modified.
    pub const NOT_MODIFIED: Self = Self::new(304);
    /// 307 Temporary Redirect.
    pub const TEMPORARY_REDIRECT: Self = Self::new(307);
    /// 400 Bad Request.
    pub const BAD_REQUEST: Self = Self::new(400);
    /// 401 Unauthorized.
    pub const UNAUTHORIZED: Self = Self::new(401);
    /// 403 Forbidden.
    pub const FORBIDDEN: Self = Self::new(403);
    /// 404 Not Found.
    pub const NOT_FOUND: Self = Self::new(404);
    /// 408 Request Timeout.
    pub const REQUEST_TIMEOUT: Self = Self::new(408);
    /// 500 Internal Server Error.
    pub const INTERNAL_SERVER_ERROR: Self = Self::new(500);
    /// 501 Not Implemented.
    pub const NOT_IMPLEMENTED: Self = Self::new(501);
    /// 502 Bad Gateway.
    pub const BAD_GATEWAY: Self = Self::new(502);
    /// 503 Service Unavailable.
    pub const SERVICE_UNAVAILABLE: Self = Self::new(503);
    /// 504 Gateway Timeout.
    pub const GATEWAY_TIMEOUT: Self = Self::new(504);
}

impl<'a> StatusCode<'a> {
    /// A status code without a reason phrase of its own.
    pub const fn new(code: u16) -> Self {
        Self::with_reason(code, "")
    }

    /// A status code carrying the given reason phrase.
    ///
    /// The phrase is only reported for codes without a canonical phrase.
    pub const fn with_reason(code: u16, phrase: &'a str) -> Self {
        // Four-digit codes would lose their leading digit and pass for a
        // different code on the wire.
        let wire = if code > 999 { 0 } else { code };
        Self {
            code,
            phrase,
            digits: [
                b'0' + (wire / 100) as u8,
                b'0' + (wire / 10 % 10) as u8,
                b'0' + (wire % 10) as u8,
            ],
        }
    }

    /// The numeric code.
    pub fn code(&self) -> u16 {
        self.code
    }

    /// The code as three ASCII digits, as sent on the status line.
    ///
    /// Codes above 999 have no three-digit form and render as `000`. Only
    /// codes passing [`is_valid`](Self::is_valid) belong on the wire.
    pub fn digits(&self) -> &[u8; 3] {
        &self.digits
    }

    /// The phrase supplied at construction, possibly empty.
    pub fn phrase(&self) -> &'a str {
        self.phrase
    }

    /// 1xx.
    pub fn informational(&self) -> bool {
        (100..200).contains(&self.code)
    }

    /// 2xx.
    pub fn success(&self) -> bool {
        (200..300).contains(&self.code)
    }

    /// 3xx.
    pub fn redirection(&self) -> bool {
        (300..400).contains(&self.code)
    }

    /// 4xx.
    pub fn client_error(&self) -> bool {
        (400..500).contains(&self.code)
    }

    /// 5xx.
    pub fn server_error(&self) -> bool {
        (500..600).contains(&self.code)
    }

    /// Whether the code falls in one of the five standard bands.
    pub fn standard(&self) -> bool {
        (100..600).contains(&self.code)
    }

    /// Same as [`standard`](Self::standard).
    pub fn is_valid(&self) -> bool {
        self.standard()
    }

    /// The reason phrase to report for this code.
    ///
    /// Known codes use their canonical phrase. Otherwise the phrase given at
    /// construction is returned, or `"Unknown"` if there is none.
    pub fn reason(&self) -> &'a str {
        match canonical_reason(self.code) {
            Some(reason) => reason,
            None if !self.phrase.is_empty() => self.phrase,
            None => "Unknown",
        }
    }
}

impl Default for StatusCode<'_> {
    /// Code 0, which belongs to no band.
    fn default() -> Self {
        StatusCode::new(0)
    }
}

impl From<u16> for StatusCode<'_> {
    fn from(code: u16) -> Self {
        StatusCode::new(code)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StatusCode<'_> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=u16} {=str}", self.code, self.reason())
    }
}

fn canonical_reason(code: u16) -> Option<&'static str> {
    let reason = match code {
        0 => "Invalid Status Code",
        100 => "Continue",
        101 => "Switching Protocols",
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        203 => "Non-Authoritative Information",
        204 => "No Content",
        205 => "Reset Content",
        206 => "Partial Content",
        300 => "Multiple Choices",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        304 => "Not Modified",
        305 => "Use Proxy",
        307 => "Temporary Redirect",
        400 => "Bad Request",
        401 => "Unauthorized",
        402 => "Payment Required",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        406 => "Not Acceptable",
        407 => "Proxy Authentication Required",
        408 => "Request Timeout",
        409 => "Conflict",
        410 => "Gone",
        411 => "Length Required",
        412 => "Precondition Failed",
        413 => "Request Entity Too Large",
        414 => "Request URI Too Large",
        415 => "Unsupported Media Type",
        416 => "Requested Range Not Satisfiable",
        417 => "Expectation Failed",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        505 => "HTTP Version Not Supported",
        _ => return None,
    };
    Some(reason)
}
