//! Resumable serialization of HTTP messages.
//!
//! Every serializable value describes itself as a flat, ordered sequence of
//! byte *parts* through the [`Layout`] trait: literal text such as
//! `"Host: "`, borrowed field values, and `"\r\n"` separators. A single
//! generic [`Cursor`] walks that sequence and copies it into caller buffers
//! of any size, remembering its position between calls. Because the position
//! is a `(part, offset)` pair, a call may stop anywhere, including in the
//! middle of a literal or a value, and the next call resumes at exactly the
//! following byte.
//!
//! Optional header fields contribute three parts (label, value, separator)
//! that are all empty when the value is empty, so unset headers produce no
//! output at all.
//!
//! # Examples
//!
//! ```rust
//! use libiot_http::network::application::http::{Method, Progress, Request};
//!
//! let mut request = Request::new(Method::Get, "/x");
//! request.headers.host = "h";
//!
//! let mut cursor = request.cursor();
//! let mut out = heapless::Vec::<u8, 64>::new();
//! let mut chunk = [0u8; 5];
//! loop {
//!     let progress = cursor.serialize(&mut chunk).unwrap();
//!     out.extend_from_slice(&chunk[..progress.written()]).unwrap();
//!     if progress.is_done() {
//!         break;
//!     }
//! }
//! assert_eq!(&out[..], b"GET /x HTTP/1.1\r\nHost: h\r\n\r\n");
//! ```

use heapless::Vec;


/// Errors produced by a [`Cursor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerializeError {
    /// `serialize` was called after every byte had been emitted.
    AlreadyComplete,
    /// `serialize` was called with a zero-length buffer.
    InvalidBuffer,
    /// The value does not fit in a fixed-capacity output.
    Overflow,
}

/// The outcome of one successful [`Cursor::serialize`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Progress {
    /// The buffer was filled and more bytes remain.
    More(usize),
    /// The last byte was written in this call.
    Done(usize),
}

impl Progress {
    /// Bytes written by the call.
    pub fn written(&self) -> usize {
        match *self {
            Progress::More(n) | Progress::Done(n) => n,
        }
    }

    /// Whether the value has been fully emitted.
    pub fn is_done(&self) -> bool {
        matches!(self, Progress::Done(_))
    }
}

/// A value that serializes as an ordered sequence of byte parts.
///
/// Parts may be empty; empty parts contribute nothing to the output.
pub trait Layout {
    /// Number of parts, including empty ones.
    fn part_count(&self) -> usize;

    /// The bytes of part `index`, or `None` past the end.
    fn part(&self, index: usize) -> Option<&[u8]>;

    /// Total serialized size in bytes.
    fn encoded_len(&self) -> usize {
        (0..self.part_count())
            .filter_map(|i| self.part(i))
            .map(<[u8]>::len)
            .sum()
    }
}

impl Layout for [&[u8]] {
    fn part_count(&self) -> usize {
        self.len()
    }

    fn part(&self, index: usize) -> Option<&[u8]> {
        self.get(index).copied()
    }
}

impl<const N: usize> Layout for [&[u8]; N] {
    fn part_count(&self) -> usize {
        N
    }

    fn part(&self, index: usize) -> Option<&[u8]> {
        self.get(index).copied()
    }
}

/// Incremental serialization state for one [`Layout`].
///
/// A cursor borrows the value it serializes, so the value cannot change
/// while a serialization pass is in progress.
#[derive(Debug)]
pub struct Cursor<'v, L: Layout + ?Sized> {
    layout: &'v L,
    part: usize,
    offset: usize,
    error: Option<SerializeError>,
    last: usize,
    done: bool,
}

impl<'v, L: Layout + ?Sized> Cursor<'v, L> {
    /// Start a serialization pass over `layout`.
    pub fn new(layout: &'v L) -> Self {
        let mut cursor = Self {
            layout,
            part: 0,
            offset: 0,
            error: None,
            last: 0,
            done: false,
        };
        cursor.skip_empty();
        cursor
    }

    /// Copy the next bytes of the value into `buf`.
    ///
    /// The buffer is filled completely unless the value ends first. A
    /// recorded failure is returned again by every call until
    /// [`reset`](Self::reset).
    ///
    /// # Errors
    ///
    /// - [`SerializeError::InvalidBuffer`] if `buf` is empty.
    /// - [`SerializeError::AlreadyComplete`] if the value was already fully
    ///   emitted.
    pub fn serialize(&mut self, buf: &mut [u8]) -> Result<Progress, SerializeError> {
        self.last = 0;
        if let Some(error) = self.error {
            return Err(error);
        }
        if self.done {
            return Err(self.record(SerializeError::AlreadyComplete));
        }
        if buf.is_empty() {
            return Err(self.record(SerializeError::InvalidBuffer));
        }

        let mut written = 0;
        while written < buf.len() && !self.done {
            let part = self.layout.part(self.part).unwrap_or(&[]);
            let rest = part.get(self.offset..).unwrap_or(&[]);
            let n = rest.len().min(buf.len() - written);
            buf[written..written + n].copy_from_slice(&rest[..n]);
            written += n;
            self.offset += n;

            if self.offset >= part.len() {
                self.part += 1;
                self.offset = 0;
                self.skip_empty();
            }
        }

        self.last = written;
        Ok(if self.done {
            Progress::Done(written)
        } else {
            Progress::More(written)
        })
    }

    /// Whether every byte of the value has been emitted.
    pub fn eof(&self) -> bool {
        self.done
    }

    /// The recorded failure, if any.
    pub fn fail(&self) -> Option<SerializeError> {
        self.error
    }

    /// Bytes written by the most recent [`serialize`](Self::serialize) call.
    pub fn last_written(&self) -> usize {
        self.last
    }

    /// Restart from the first byte, clearing any failure.
    pub fn reset(&mut self) {
        self.part = 0;
        self.offset = 0;
        self.error = None;
        self.last = 0;
        self.done = false;
        self.skip_empty();
    }

    fn record(&mut self, error: SerializeError) -> SerializeError {
        self.error = Some(error);
        error
    }

    // Only ever called at a part boundary.
    fn skip_empty(&mut self) {
        let count = self.layout.part_count();
        while self.part < count
            && self
                .layout
                .part(self.part)
                .is_none_or(<[u8]>::is_empty)
        {
            self.part += 1;
        }
        self.done = self.part >= count;
    }
}

/// Serialize `layout` in one pass into a fixed-capacity vector.
///
/// # Errors
///
/// [`SerializeError::Overflow`] if the value is longer than `N` bytes.
pub fn to_vec<const N: usize, L>(layout: &L) -> Result<Vec<u8, N>, SerializeError>
where
    L: Layout + ?Sized,
{
    let len = layout.encoded_len();
    let mut out = Vec::new();
    if len > N {
        return Err(SerializeError::Overflow);
    }
    if len == 0 {
        return Ok(out);
    }

    out.resize_default(len).map_err(|_| SerializeError::Overflow)?;
    Cursor::new(layout).serialize(&mut out)?;
    Ok(out)
}
