//! Fixed, named HTTP header field sets.
//!
//! HTTP/1.1 groups its headers into general, request, response and entity
//! headers. Each group is modelled as a plain struct of borrowed `&str`
//! fields, one per header, where an empty string means "not present". The
//! [`HeaderBag`] trait adds a static descriptor table over those fields so
//! that they can be serialized generically and looked up by name.
//!
//! Fields are serialized in declaration order, each as
//! `"<Name>: <value>\r\n"`. Empty fields are skipped entirely.
//!
//! # Examples
//!
//! ```rust
//! use libiot_http::network::application::http::{HeaderBag, RequestHeaders};
//!
//! let mut headers = RequestHeaders::default();
//! headers.host = "example.com";
//!
//! if let Some(field) = headers.get_field("User-Agent") {
//!     *field = "libiot";
//! }
//! assert_eq!(headers.user_agent, "libiot");
//!
//! // Names are canonical and matched exactly.
//! assert!(headers.get_field("user-agent").is_none());
//! ```

use super::serialize::Layout;

const CRLF: &[u8] = b"\r\n";

/// A fixed set of named header fields.
///
/// Field `i` has canonical name `NAMES[i]` and wire label `LABELS[i]`
/// (the name followed by `": "`).
pub trait HeaderBag<'a>: Layout {
    /// Canonical header names, in serialization order.
    const NAMES: &'static [&'static str];

    /// Wire labels, `"<Name>: "`, parallel to [`NAMES`](Self::NAMES).
    const LABELS: &'static [&'static str];

    /// The value of field `index`.
    fn value(&self, index: usize) -> Option<&'a str>;

    /// Mutable access to field `index`.
    fn value_mut(&mut self, index: usize) -> Option<&mut &'a str>;

    /// The raw extension header line, for bags that carry one.
    fn extension(&self) -> Option<&'a str> {
        None
    }

    /// Mutable access to the extension slot, for bags that carry one.
    fn extension_mut(&mut self) -> Option<&mut &'a str> {
        None
    }

    /// Index of the field with the given canonical name.
    fn index_of(name: &str) -> Option<usize> {
        Self::NAMES.iter().position(|n| *n == name)
    }

    /// Index of the field whose name matches ignoring ASCII case.
    fn index_of_ignore_case(name: &str) -> Option<usize> {
        Self::NAMES.iter().position(|n| n.eq_ignore_ascii_case(name))
    }

    /// Resolve a case-sensitive canonical header name to its field.
    ///
    /// Returns `None` if the bag has no such field.
    fn get_field(&mut self, name: &str) -> Option<&mut &'a str> {
        let index = Self::index_of(name)?;
        self.value_mut(index)
    }

    /// The value of the field with the given canonical name.
    fn field(&self, name: &str) -> Option<&'a str> {
        self.value(Self::index_of(name)?)
    }

    /// Whether every field and the extension slot are empty.
    fn is_empty(&self) -> bool {
        (0..Self::NAMES.len()).all(|i| self.value(i).is_none_or(str::is_empty))
            && self.extension().is_none_or(str::is_empty)
    }
}

/// Part `index` of a header bag's layout.
///
/// Each field contributes the triplet label, value, CRLF, all empty when the
/// value is empty. The extension line and its CRLF follow.
fn bag_part<'a, B>(bag: &B, index: usize) -> Option<&'a [u8]>
where
    B: HeaderBag<'a> + ?Sized,
{
    let fields = B::NAMES.len() * 3;
    if index < fields {
        let field = index / 3;
        let value = bag.value(field)?;
        if value.is_empty() {
            return Some(&[]);
        }
        return Some(match index % 3 {
            0 => B::LABELS[field].as_bytes(),
            1 => value.as_bytes(),
            _ => CRLF,
        });
    }

    let extension = bag.extension().unwrap_or("");
    match index - fields {
        0 => Some(extension.as_bytes()),
        1 if extension.is_empty() => Some(&[]),
        1 => Some(CRLF),
        _ => None,
    }
}

macro_rules! header_bag {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $( $index:literal => $field:ident : $header:literal, )*
        }
        $( extension: $ext:ident, )?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $name<'a> {
            $(
                #[doc = concat!("The `", $header, "` header.")]
                pub $field: &'a str,
            )*
            $(
                /// A complete extension header line, without its CRLF.
                pub $ext: &'a str,
            )?
        }

        impl<'a> HeaderBag<'a> for $name<'a> {
            const NAMES: &'static [&'static str] = &[$($header),*];
            const LABELS: &'static [&'static str] = &[$(concat!($header, ": ")),*];

            fn value(&self, index: usize) -> Option<&'a str> {
                match index {
                    $( $index => Some(self.$field), )*
                    _ => None,
                }
            }

            fn value_mut(&mut self, index: usize) -> Option<&mut &'a str> {
                match index {
                    $( $index => Some(&mut self.$field), )*
                    _ => None,
                }
            }

            $(
                fn extension(&self) -> Option<&'a str> {
                    Some(self.$ext)
                }

                fn extension_mut(&mut self) -> Option<&mut &'a str> {
                    Some(&mut self.$ext)
                }
            )?
        }

        impl Layout for $name<'_> {
            fn part_count(&self) -> usize {
                <Self as HeaderBag<'_>>::NAMES.len() * 3 + 2
            }

            fn part(&self, index: usize) -> Option<&[u8]> {
                bag_part(self, index)
            }
        }
    };
}

header_bag! {
    /// Headers that apply to both requests and responses.
    pub struct GeneralHeaders {
        0 => cache_control: "Cache-Control",
        1 => connection: "Connection",
        2 => date: "Date",
        3 => pragma: "Pragma",
        4 => trailer: "Trailer",
        5 => transfer_encoding: "Transfer-Encoding",
        6 => upgrade: "Upgrade",
        7 => via: "Via",
        8 => warning: "Warning",
    }
}

header_bag! {
    /// Headers that only appear in requests.
    pub struct RequestHeaders {
        0 => accept: "Accept",
        1 => accept_charset: "Accept-Charset",
        2 => accept_encoding: "Accept-Encoding",
        3 => accept_language: "Accept-Language",
        4 => authorization: "Authorization",
        5 => expect: "Expect",
        6 => from: "From",
        7 => host: "Host",
        8 => if_match: "If-Match",
        9 => if_modified_since: "If-Modified-Since",
        10 => if_none_match: "If-None-Match",
        11 => if_range: "If-Range",
        12 => if_unmodified_since: "If-Unmodified-Since",
        13 => max_forwards: "Max-Forwards",
        14 => proxy_authorization: "Proxy-Authorization",
        15 => range: "Range",
        16 => referer: "Referer",
        17 => te: "TE",
        18 => user_agent: "User-Agent",
    }
}

header_bag! {
    /// Headers that only appear in responses.
    pub struct ResponseHeaders {
        0 => accept_ranges: "Accept-Ranges",
        1 => age: "Age",
        2 => etag: "ETag",
        3 => location: "Location",
        4 => proxy_authenticate: "Proxy-Authenticate",
        5 => retry_after: "Retry-After",
        6 => server: "Server",
        7 => vary: "Vary",
        8 => www_authenticate: "WWW-Authenticate",
    }
}

header_bag! {
    /// Headers describing the message body.
    ///
    /// The `extension` slot carries one additional header line verbatim,
    /// e.g. `"X-Device: sensor-7"`.
    pub struct EntityHeaders {
        0 => allow: "Allow",
        1 => content_encoding: "Content-Encoding",
        2 => content_language: "Content-Language",
        3 => content_length: "Content-Length",
        4 => content_location: "Content-Location",
        5 => content_md5: "Content-MD5",
        6 => content_range: "Content-Range",
        7 => content_type: "Content-Type",
        8 => expires: "Expires",
        9 => last_modified: "Last-Modified",
    }
    extension: extension,
}
