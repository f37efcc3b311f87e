//! HTTP request methods.

/// An HTTP request method.
///
/// The eight methods defined by HTTP/1.1 have their own variants. Any other
/// non-empty token is carried verbatim as [`Extension`](Method::Extension),
/// and an empty token yields [`Invalid`](Method::Invalid).
///
/// # Examples
///
/// ```rust
/// use libiot_http::network::application::http::Method;
///
/// assert_eq!(Method::parse("get"), Method::Get);
/// assert_eq!(Method::parse("pUt").as_str(), "PUT");
/// assert_eq!(Method::parse("FROB"), Method::Extension("FROB"));
/// assert!(!Method::parse("").is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method<'a> {
    /// No method; the request cannot be sent.
    #[default]
    Invalid,
    /// `CONNECT`.
    Connect,
    /// `DELETE`.
    Delete,
    /// `GET`.
    Get,
    /// `HEAD`.
    Head,
    /// `OPTIONS`.
    Options,
    /// `POST`.
    Post,
    /// `PUT`.
    Put,
    /// `TRACE`.
    Trace,
    /// A method outside the standard set, holding the caller's token.
    Extension(&'a str),
}

const STANDARD: [(&str, Method<'static>); 8] = [
    ("CONNECT", Method::Connect),
    ("DELETE", Method::Delete),
    ("GET", Method::Get),
    ("HEAD", Method::Head),
    ("OPTIONS", Method::Options),
    ("POST", Method::Post),
    ("PUT", Method::Put),
    ("TRACE", Method::Trace),
];

impl<'a> Method<'a> {
    /// Classify a method token.
    ///
    /// Surrounding whitespace is ignored and the standard methods match
    /// case-insensitively.
    pub fn parse(token: &'a str) -> Self {
        let token = token.trim();
        if token.is_empty() {
            return Method::Invalid;
        }
        STANDARD
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(token))
            .map(|&(_, method)| method)
            .unwrap_or(Method::Extension(token))
    }

    /// The wire text of the method.
    ///
    /// Standard methods are always upper case. Returns `""` for
    /// [`Invalid`](Method::Invalid).
    pub fn as_str(&self) -> &'a str {
        match *self {
            Method::Invalid => "",
            Method::Connect => "CONNECT",
            Method::Delete => "DELETE",
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Trace => "TRACE",
            Method::Extension(token) => token,
        }
    }

    /// Whether the method has a non-empty token.
    pub fn is_valid(&self) -> bool {
        !self.as_str().is_empty()
    }

    /// Whether this is one of the eight HTTP/1.1 methods.
    pub fn is_standard(&self) -> bool {
        !matches!(self, Method::Invalid | Method::Extension(_))
    }
}

impl<'a> From<&'a str> for Method<'a> {
    fn from(token: &'a str) -> Self {
        Method::parse(token)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Method<'_> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Method::Invalid => defmt::write!(f, "Invalid"),
            other => defmt::write!(f, "{=str}", other.as_str()),
        }
    }
}
