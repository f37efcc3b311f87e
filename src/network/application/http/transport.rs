//! The contract between the HTTP client and a byte-oriented link.
//!
//! The client never touches a socket or UART directly. It hands serialized
//! request bytes to a [`Transport`], asks it to report incoming data through
//! a [`Notifier`], and pulls response bytes back out with
//! [`Transport::read`]. A transport may serve several requests at once (for
//! example a Wi-Fi co-processor with multiple connection ids), so every call
//! names the [`RequestId`] it concerns.
//!
//! [`StreamTransport`] adapts any blocking [`Connection`] to this contract.

use core::fmt;
use core::num::NonZeroU32;

use heapless::Vec;

use super::client::ActiveRequest;
use crate::network::Connection;
use crate::network::error::Error;

/// A data-ready hook supplied by the caller of a request.
///
/// It runs inside [`Notifier::notify`], which may be an interrupt handler,
/// so it must not block, allocate or panic.
pub type FastCallback = fn();

/// Identifies one in-flight request. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(NonZeroU32);

impl RequestId {
    /// Wrap a raw id, returning `None` for zero.
    pub const fn new(raw: u32) -> Option<Self> {
        match NonZeroU32::new(raw) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    /// The raw, non-zero value.
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for RequestId {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "#{=u32}", self.get())
    }
}

/// The data-ready signal for one request.
///
/// A transport receives a `Notifier` when the client registers for
/// notification and calls [`notify`](Self::notify) whenever response bytes
/// become readable. Notifying touches only atomics, plus a short critical
/// section when an async waker is parked, so it is safe from interrupt
/// context. A notifier that outlives its
/// request is harmless: once the request is released, notifying does
/// nothing.
#[derive(Clone, Copy)]
pub struct Notifier<'a> {
    record: &'a ActiveRequest,
    id: RequestId,
    callback: Option<FastCallback>,
}

impl<'a> Notifier<'a> {
    pub(crate) fn new(
        record: &'a ActiveRequest,
        id: RequestId,
        callback: Option<FastCallback>,
    ) -> Self {
        Self {
            record,
            id,
            callback,
        }
    }

    /// Signal that data is available for the request.
    ///
    /// Runs the request's [`FastCallback`], if any, then wakes the waiter.
    pub fn notify(&self) {
        if !self.record.owned_by(self.id) {
            return;
        }
        if let Some(callback) = self.callback {
            callback();
        }
        self.record.signal(self.id);
    }

    /// The request this notifier belongs to.
    pub fn request_id(&self) -> RequestId {
        self.id
    }
}

impl fmt::Debug for Notifier<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("id", &self.id)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

/// A byte-oriented link that can carry HTTP requests.
///
/// The lifetime `'a` is that of the client's request table; notifiers
/// handed to the transport borrow from it.
pub trait Transport<'a> {
    /// Send a chunk of the serialized request.
    ///
    /// May block until the link accepts the bytes. Called once per filled
    /// scratch buffer, in order.
    fn send(&mut self, request: RequestId, bytes: &[u8]) -> Result<(), Error>;

    /// Copy available response bytes into `buf` without blocking.
    ///
    /// Returns the number of bytes copied, which may be zero.
    fn read(&mut self, request: RequestId, buf: &mut [u8]) -> Result<usize, Error>;

    /// Install the data-ready notifier for a request.
    ///
    /// Called after the whole request has been sent.
    fn register_notify(&mut self, request: RequestId, notifier: Notifier<'a>) -> Result<(), Error>;

    /// Remove the notifier for a request and forget the request.
    ///
    /// Called when the request is released, possibly before it completed;
    /// the link should abort whatever it still has in flight for it.
    fn unregister_notify(&mut self, request: RequestId) -> Result<(), Error>;

    /// Advisory count of response bytes ready to read.
    fn available(&mut self, request: RequestId) -> usize {
        let _ = request;
        0
    }
}

/// Adapts a blocking [`Connection`] into a [`Transport`].
///
/// Outgoing chunks are written straight to the connection. Incoming bytes
/// are moved into a fixed receive buffer of `RX` bytes by
/// [`poll`](Self::poll), which the application calls from its receive
/// interrupt or main loop, and the active request is notified.
///
/// The connection carries one request at a time. Calls naming another
/// request fail with [`Error::UnknownRequest`]. Bytes that arrive while no
/// request holds the connection, such as the late answer to a released
/// request, are read and discarded.
pub struct StreamTransport<'a, C: Connection, const RX: usize = 512> {
    connection: C,
    rx: Vec<u8, RX>,
    active: Option<RequestId>,
    notifier: Option<Notifier<'a>>,
}

impl<'a, C: Connection, const RX: usize> StreamTransport<'a, C, RX> {
    /// Wrap a connection.
    pub fn new(connection: C) -> Self {
        Self {
            connection,
            rx: Vec::new(),
            active: None,
            notifier: None,
        }
    }

    /// The wrapped connection.
    pub fn connection(&self) -> &C {
        &self.connection
    }

    /// Mutable access to the wrapped connection.
    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.connection
    }

    /// Unwrap the connection, discarding buffered data.
    pub fn into_inner(self) -> C {
        self.connection
    }

    /// Bytes received but not yet read.
    pub fn buffered(&self) -> usize {
        self.rx.len()
    }

    /// The request currently using the connection.
    pub fn active(&self) -> Option<RequestId> {
        self.active
    }

    /// Move readable bytes from the connection into the receive buffer.
    ///
    /// Notifies the active request when new bytes arrived. Returns the number
    /// of bytes moved; zero when nothing was readable, the buffer is full or
    /// no request holds the connection.
    pub fn poll(&mut self) -> Result<usize, Error> {
        if self.active.is_none() {
            return self.discard().map(|_| 0);
        }

        let start = self.rx.len();
        if start == RX {
            return Ok(0);
        }

        // The capacity check above makes this infallible.
        let _ = self.rx.resize_default(RX);
        let read = self.connection.read(&mut self.rx[start..]);
        let n = match read {
            Ok(n) => n.min(RX - start),
            Err(_) => 0,
        };
        self.rx.truncate(start + n);
        if read.is_err() {
            warn!("stream transport: read failed");
            return Err(Error::ReadError);
        }

        if n > 0 {
            trace!("stream transport: received {=usize} bytes", n);
            if let Some(notifier) = &self.notifier {
                notifier.notify();
            }
        }
        Ok(n)
    }

    // Drain the link until a short read; returns the bytes thrown away.
    fn discard(&mut self) -> Result<usize, Error> {
        let mut sink = [0u8; 32];
        let mut dropped = 0;
        loop {
            match self.connection.read(&mut sink) {
                Ok(n) => {
                    dropped += n;
                    if n < sink.len() {
                        break;
                    }
                }
                Err(_) => {
                    warn!("stream transport: read failed");
                    return Err(Error::ReadError);
                }
            }
        }
        if dropped > 0 {
            debug!("stream transport: discarded {=usize} stray bytes", dropped);
        }
        Ok(dropped)
    }

    fn bind(&mut self, request: RequestId) -> Result<(), Error> {
        match self.active {
            None => {
                self.active = Some(request);
                Ok(())
            }
            Some(active) if active == request => Ok(()),
            Some(_) => Err(Error::UnknownRequest),
        }
    }

    fn check(&self, request: RequestId) -> Result<(), Error> {
        if self.active == Some(request) {
            Ok(())
        } else {
            Err(Error::UnknownRequest)
        }
    }
}

impl<'a, C: Connection, const RX: usize> Transport<'a> for StreamTransport<'a, C, RX> {
    fn send(&mut self, request: RequestId, bytes: &[u8]) -> Result<(), Error> {
        self.bind(request)?;

        let mut remaining = bytes;
        while !remaining.is_empty() {
            match self.connection.write(remaining) {
                Ok(0) | Err(_) => return Err(Error::WriteError),
                Ok(n) => remaining = &remaining[n.min(remaining.len())..],
            }
        }
        self.connection.flush().map_err(|_| Error::WriteError)
    }

    fn read(&mut self, request: RequestId, buf: &mut [u8]) -> Result<usize, Error> {
        self.check(request)?;

        let n = buf.len().min(self.rx.len());
        buf[..n].copy_from_slice(&self.rx[..n]);
        self.rx.copy_within(n.., 0);
        self.rx.truncate(self.rx.len() - n);
        Ok(n)
    }

    fn register_notify(&mut self, request: RequestId, notifier: Notifier<'a>) -> Result<(), Error> {
        self.bind(request)?;
        if !self.rx.is_empty() {
            notifier.notify();
        }
        self.notifier = Some(notifier);
        Ok(())
    }

    fn unregister_notify(&mut self, request: RequestId) -> Result<(), Error> {
        self.check(request)?;
        self.notifier = None;
        self.active = None;
        self.rx.clear();
        Ok(())
    }

    fn available(&mut self, request: RequestId) -> usize {
        if self.active == Some(request) {
            self.rx.len()
        } else {
            0
        }
    }
}

impl<C: Connection + fmt::Debug, const RX: usize> fmt::Debug for StreamTransport<'_, C, RX> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamTransport")
            .field("connection", &self.connection)
            .field("buffered", &self.rx.len())
            .field("active", &self.active)
            .finish()
    }
}
