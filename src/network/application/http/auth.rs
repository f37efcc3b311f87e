//! HTTP Basic authentication.

use base64ct::{Base64, Encoding};
use heapless::Vec;

use super::serialize::SerializeError;

/// Longest `user:password` pair accepted by [`basic_credentials`].
pub const MAX_CREDENTIALS: usize = 96;

const SCHEME: &[u8] = b"Basic ";

/// Build an `Authorization` header value for HTTP Basic authentication.
///
/// The value, `Basic <base64(user:password)>`, is written into `out` and
/// returned as a string borrowing it, ready to be stored in
/// `RequestHeaders::authorization`.
///
/// # Examples
///
/// ```rust
/// use libiot_http::network::application::http::auth::basic_credentials;
///
/// let mut buf = [0u8; 64];
/// let value = basic_credentials("Aladdin", "open sesame", &mut buf).unwrap();
/// assert_eq!(value, "Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ==");
/// ```
///
/// # Errors
///
/// [`SerializeError::Overflow`] if the pair is longer than
/// [`MAX_CREDENTIALS`] or the encoded value does not fit in `out`.
pub fn basic_credentials<'o>(
    user: &str,
    password: &str,
    out: &'o mut [u8],
) -> Result<&'o str, SerializeError> {
    let mut pair: Vec<u8, MAX_CREDENTIALS> = Vec::new();
    for part in [user.as_bytes(), b":".as_slice(), password.as_bytes()] {
        pair.extend_from_slice(part)
            .map_err(|_| SerializeError::Overflow)?;
    }

    if out.len() < SCHEME.len() {
        return Err(SerializeError::Overflow);
    }
    out[..SCHEME.len()].copy_from_slice(SCHEME);
    let encoded = Base64::encode(&pair, &mut out[SCHEME.len()..])
        .map_err(|_| SerializeError::Overflow)?
        .len();

    core::str::from_utf8(&out[..SCHEME.len() + encoded]).map_err(|_| SerializeError::Overflow)
}
