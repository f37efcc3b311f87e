//! Minimal parser for response heads.
//!
//! The client hands response bytes to the caller as an opaque stream. This
//! parser is a convenience for callers that have buffered a complete head:
//! it fills a [`Response`] that borrows from the buffer. It does not handle
//! folded header lines or merge repeated headers.

use super::header::{EntityHeaders, GeneralHeaders, HeaderBag, ResponseHeaders};
use super::message::Response;
use super::status::StatusCode;

/// Errors produced by [`Response::parse_head`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// The blank line ending the head has not been received yet.
    Incomplete,
    /// The head is not valid UTF-8.
    NotUtf8,
    /// The status line is not `HTTP/1.x SP 3DIGIT [SP reason]`, or the code
    /// is outside 100-599.
    InvalidStatusLine,
    /// A header line has no `:` or an empty name.
    InvalidHeader,
}

impl<'a> Response<'a> {
    /// Parse a response head from `bytes`.
    ///
    /// Known headers, matched ignoring case, fill their field in the
    /// general, response or entity bag. The first unknown header line is kept
    /// verbatim in `entity.extension` and later ones are dropped. Everything
    /// after the blank line becomes the body.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use libiot_http::network::application::http::Response;
    ///
    /// let raw = b"HTTP/1.1 200 OK\r\ncontent-type: text/plain\r\nX-Id: 7\r\n\r\nhi";
    /// let response = Response::parse_head(raw).unwrap();
    /// assert_eq!(response.status.code(), 200);
    /// assert_eq!(response.entity.content_type, "text/plain");
    /// assert_eq!(response.entity.extension, "X-Id: 7");
    /// assert_eq!(response.body, b"hi");
    /// ```
    ///
    /// # Errors
    ///
    /// See [`ParseError`].
    pub fn parse_head(bytes: &'a [u8]) -> Result<Self, ParseError> {
        let end = find_slice(bytes, b"\r\n\r\n").ok_or(ParseError::Incomplete)?;
        let head = core::str::from_utf8(&bytes[..end]).map_err(|_| ParseError::NotUtf8)?;

        let mut lines = head.split("\r\n");
        let status_line = lines.next().ok_or(ParseError::InvalidStatusLine)?;

        let mut response = Response::new(parse_status_line(status_line)?);
        response.body = &bytes[end + 4..];

        for line in lines {
            let (name, value) = line.split_once(':').ok_or(ParseError::InvalidHeader)?;
            let name = name.trim();
            if name.is_empty() {
                return Err(ParseError::InvalidHeader);
            }
            let value = value.trim();

            if !response.set_header(name, value) && response.entity.extension.is_empty() {
                response.entity.extension = line;
            }
        }

        Ok(response)
    }

    /// The `Content-Length` header as a number, if present and well formed.
    pub fn content_length(&self) -> Option<usize> {
        self.entity.content_length.parse().ok()
    }

    fn set_header(&mut self, name: &str, value: &'a str) -> bool {
        let field = if let Some(i) = GeneralHeaders::index_of_ignore_case(name) {
            self.general.value_mut(i)
        } else if let Some(i) = ResponseHeaders::index_of_ignore_case(name) {
            self.headers.value_mut(i)
        } else if let Some(i) = EntityHeaders::index_of_ignore_case(name) {
            self.entity.value_mut(i)
        } else {
            None
        };

        match field {
            Some(field) => {
                *field = value;
                true
            }
            None => false,
        }
    }
}

fn parse_status_line(line: &str) -> Result<StatusCode<'_>, ParseError> {
    let (version, rest) = line.split_once(' ').ok_or(ParseError::InvalidStatusLine)?;
    let minor = version
        .strip_prefix("HTTP/1.")
        .ok_or(ParseError::InvalidStatusLine)?;
    if minor.len() != 1 || !minor.as_bytes()[0].is_ascii_digit() {
        return Err(ParseError::InvalidStatusLine);
    }

    let (digits, reason) = rest.split_once(' ').unwrap_or((rest, ""));
    if digits.len() != 3 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidStatusLine);
    }
    let code: u16 = digits.parse().map_err(|_| ParseError::InvalidStatusLine)?;

    let status = StatusCode::with_reason(code, reason.trim());
    if !status.is_valid() {
        return Err(ParseError::InvalidStatusLine);
    }
    Ok(status)
}

/// Finds the first occurrence of a slice in another slice and returns its starting position.
fn find_slice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
