//! HTTP request and response messages.
//!
//! Messages borrow every piece of text and body they carry. The lifetime
//! parameter ties a message to the storage backing it, so a `Request` cannot
//! outlive the strings it was built from, and anything that must survive
//! longer has to be copied into caller-owned storage first.

use core::fmt::Write as _;

use heapless::{String, Vec};

use super::header::{EntityHeaders, GeneralHeaders, RequestHeaders, ResponseHeaders};
use super::method::Method;
use super::serialize::{self, Cursor, Layout, SerializeError};
use super::status::StatusCode;

const CRLF: &[u8] = b"\r\n";

/// An HTTP/1.1 request.
///
/// Serializes as
/// `Method SP URI SP "HTTP/1.1" CRLF General Request Entity CRLF Body`.
///
/// # Examples
///
/// ```rust
/// use libiot_http::network::application::http::{content_length, Method, Request};
///
/// let body = br#"{"temp":21}"#;
/// let len = content_length(body.len());
///
/// let mut request = Request::new(Method::Post, "/api/data");
/// request.headers.host = "api.example.com";
/// request.entity.content_type = "application/json";
/// request.entity.content_length = len.as_str();
/// request.body = body;
///
/// assert!(request.is_valid());
/// let bytes = request.to_vec::<256>().unwrap();
/// assert!(bytes.starts_with(b"POST /api/data HTTP/1.1\r\nHost: api.example.com\r\n"));
/// assert!(bytes.ends_with(b"Content-Length: 11\r\nContent-Type: application/json\r\n\r\n{\"temp\":21}"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Request<'a> {
    /// Request method.
    pub method: Method<'a>,
    /// Request target, sent as given.
    pub uri: &'a str,
    /// General headers.
    pub general: GeneralHeaders<'a>,
    /// Request headers.
    pub headers: RequestHeaders<'a>,
    /// Entity headers.
    pub entity: EntityHeaders<'a>,
    /// Body bytes, sent after the blank line.
    pub body: &'a [u8],
}

impl<'a> Request<'a> {
    /// A request with no headers and an empty body.
    pub fn new(method: Method<'a>, uri: &'a str) -> Self {
        Self {
            method,
            uri,
            ..Self::default()
        }
    }

    /// Whether the request can be sent: a valid method and a non-empty URI.
    pub fn is_valid(&self) -> bool {
        self.method.is_valid() && !self.uri.is_empty()
    }

    /// Start a resumable serialization pass over the request.
    pub fn cursor(&self) -> Cursor<'_, Self> {
        Cursor::new(self)
    }

    /// Serialize the whole request into a fixed-capacity vector.
    ///
    /// # Errors
    ///
    /// [`SerializeError::Overflow`] if the request is longer than `N` bytes.
    pub fn to_vec<const N: usize>(&self) -> Result<Vec<u8, N>, SerializeError> {
        serialize::to_vec(self)
    }
}

impl Layout for Request<'_> {
    fn part_count(&self) -> usize {
        4 + self.general.part_count() + self.headers.part_count() + self.entity.part_count() + 2
    }

    fn part(&self, index: usize) -> Option<&[u8]> {
        let line: [&[u8]; 4] = [
            self.method.as_str().as_bytes(),
            b" ",
            self.uri.as_bytes(),
            b" HTTP/1.1\r\n",
        ];
        let bags: [&dyn Layout; 3] = [&self.general, &self.headers, &self.entity];
        message_part(&line, &bags, self.body, index)
    }
}

/// An HTTP/1.1 response.
///
/// Serializes as
/// `"HTTP/1.1" SP 3DIGIT SP Reason CRLF General Response Entity CRLF Body`.
/// The status line is only well formed when [`is_valid`](Self::is_valid)
/// holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Response<'a> {
    /// Status code and reason phrase.
    pub status: StatusCode<'a>,
    /// General headers.
    pub general: GeneralHeaders<'a>,
    /// Response headers.
    pub headers: ResponseHeaders<'a>,
    /// Entity headers.
    pub entity: EntityHeaders<'a>,
    /// Body bytes following the header block.
    pub body: &'a [u8],
}

impl<'a> Response<'a> {
    /// A response with no headers and an empty body.
    pub fn new(status: StatusCode<'a>) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    /// Whether the status code is in a standard band.
    pub fn is_valid(&self) -> bool {
        self.status.is_valid()
    }

    /// Start a resumable serialization pass over the response.
    pub fn cursor(&self) -> Cursor<'_, Self> {
        Cursor::new(self)
    }

    /// Serialize the whole response into a fixed-capacity vector.
    ///
    /// # Errors
    ///
    /// [`SerializeError::Overflow`] if the response is longer than `N` bytes.
    pub fn to_vec<const N: usize>(&self) -> Result<Vec<u8, N>, SerializeError> {
        serialize::to_vec(self)
    }
}

impl Layout for Response<'_> {
    fn part_count(&self) -> usize {
        5 + self.general.part_count() + self.headers.part_count() + self.entity.part_count() + 2
    }

    fn part(&self, index: usize) -> Option<&[u8]> {
        let line: [&[u8]; 5] = [
            b"HTTP/1.1 ",
            self.status.digits(),
            b" ",
            self.status.reason().as_bytes(),
            CRLF,
        ];
        let bags: [&dyn Layout; 3] = [&self.general, &self.headers, &self.entity];
        message_part(&line, &bags, self.body, index)
    }
}

/// Resolve a part index across a start line, header bags, the blank line and
/// the body.
fn message_part<'s>(
    line: &[&'s [u8]],
    bags: &[&'s dyn Layout],
    body: &'s [u8],
    index: usize,
) -> Option<&'s [u8]> {
    if let Some(part) = line.get(index) {
        return Some(*part);
    }

    let mut index = index - line.len();
    for bag in bags {
        let count = bag.part_count();
        if index < count {
            return bag.part(index);
        }
        index -= count;
    }

    match index {
        0 => Some(CRLF),
        1 => Some(body),
        _ => None,
    }
}

/// Format a body length for the `Content-Length` header.
///
/// The returned string must outlive the request that borrows it.
pub fn content_length(len: usize) -> String<20> {
    let mut out = String::new();
    // 20 digits hold any 64-bit length.
    let _ = write!(out, "{len}");
    out
}
