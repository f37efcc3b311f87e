//! The caller's handle to an in-flight request.

use core::fmt;
use core::time::Duration;

use heapless::Vec;

use super::client::{Handle, Protocol, State};
use super::error::Error;
use super::message::Response;
use super::transport::RequestId;

/// A response that will arrive later.
///
/// Returned by [`Client::request`](super::Client::request). While attached,
/// a promise holds one of the client's admission slots; the slot is freed
/// by [`release`](Self::release) or when the promise is dropped, whichever
/// comes first. A promise cannot be cloned, so a slot is never released
/// twice.
///
/// A promise whose request failed is *unattached*: it holds no slot,
/// [`fail`](Self::fail) reports why, and [`wait`](Self::wait) and
/// [`read`](Self::read) return [`Error::Validation`].
///
/// The promise also carries exclusive access to the caller's response
/// slot, available through [`response_mut`](Self::response_mut), for
/// filling in the parsed response.
pub struct Promise<'p, 'b> {
    protocol: &'p dyn Protocol,
    response: &'p mut Response<'b>,
    handle: Option<Handle>,
    error: Option<Error>,
}

impl<'p, 'b> Promise<'p, 'b> {
    pub(crate) fn attached(
        protocol: &'p dyn Protocol,
        response: &'p mut Response<'b>,
        handle: Handle,
    ) -> Self {
        Self {
            protocol,
            response,
            handle: Some(handle),
            error: None,
        }
    }

    pub(crate) fn failed(
        protocol: &'p dyn Protocol,
        response: &'p mut Response<'b>,
        error: Error,
    ) -> Self {
        Self {
            protocol,
            response,
            handle: None,
            error: Some(error),
        }
    }

    /// The request id, or `None` if the promise is not attached.
    pub fn id(&self) -> Option<RequestId> {
        self.handle.map(|h| h.id())
    }

    /// The low-level handle, for use with [`Protocol`] directly.
    pub fn handle(&self) -> Option<Handle> {
        self.handle
    }

    /// Whether the promise still holds an admission slot.
    pub fn is_attached(&self) -> bool {
        self.handle.is_some()
    }

    /// The last error recorded on the promise.
    pub fn fail(&self) -> Option<Error> {
        self.error
    }

    /// The lifecycle state of the request; [`State::Idle`] once released.
    pub fn state(&self) -> State {
        self.handle
            .and_then(|h| self.protocol.state(h).ok())
            .unwrap_or(State::Idle)
    }

    /// Block until the transport signals response data or `timeout`
    /// elapses.
    ///
    /// A zero `timeout` waits indefinitely. Each signal satisfies one wait.
    /// On timeout the promise stays attached, so the caller may wait again
    /// or release it. A successful wait clears an earlier timeout.
    ///
    /// # Errors
    ///
    /// - [`Error::Timeout`] if no signal arrived in time.
    /// - [`Error::Validation`] if the promise is not attached.
    pub fn wait(&mut self, timeout: Duration) -> Result<(), Error> {
        let handle = self.handle.ok_or(Error::Validation)?;
        match self.protocol.wait(handle, timeout) {
            Ok(()) => {
                self.clear_timeout();
                Ok(())
            }
            Err(e) => Err(self.record(e)),
        }
    }

    /// Wait for response data without blocking the executor.
    ///
    /// Resolves when the transport's notifier fires.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] if the promise is not attached.
    #[cfg(feature = "async")]
    pub async fn wait_async(&mut self) -> Result<(), Error> {
        let handle = self.handle.ok_or(Error::Validation)?;
        let protocol = self.protocol;
        match core::future::poll_fn(|cx| protocol.poll_ready(handle, cx)).await {
            Ok(()) => {
                self.clear_timeout();
                Ok(())
            }
            Err(e) => Err(self.record(e)),
        }
    }

    /// Copy readable response bytes into `buf`, without blocking.
    ///
    /// Returns the number of bytes copied, which is zero when nothing is
    /// buffered yet.
    ///
    /// # Errors
    ///
    /// - [`Error::Transport`] if the transport fails.
    /// - [`Error::Validation`] if the promise is not attached.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let handle = self.handle.ok_or(Error::Validation)?;
        self.protocol
            .read(handle, buf)
            .map_err(|e| self.record(e))
    }

    /// Append readable response bytes to `out`, up to its capacity.
    ///
    /// Returns the number of bytes appended.
    ///
    /// # Errors
    ///
    /// As [`read`](Self::read).
    pub fn read_into<const N: usize>(&mut self, out: &mut Vec<u8, N>) -> Result<usize, Error> {
        let start = out.len();
        // Growing to the full capacity cannot fail.
        let _ = out.resize_default(N);
        let result = self.read(&mut out[start..]);
        out.truncate(start + *result.as_ref().unwrap_or(&0));
        result
    }

    /// Advisory number of readable response bytes; zero if unknown.
    pub fn available(&self) -> usize {
        self.handle
            .and_then(|h| self.protocol.available(h).ok())
            .unwrap_or(0)
    }

    /// Give the admission slot back to the client.
    ///
    /// Stops notification for the request and frees its slot for the next
    /// request. Does nothing if the promise is not attached, so calling it
    /// repeatedly is harmless. Also run when the promise is dropped.
    ///
    /// # Errors
    ///
    /// [`Error::Transport`] if the transport failed to unregister the
    /// request. The slot is freed regardless.
    pub fn release(&mut self) -> Result<(), Error> {
        match self.handle.take() {
            Some(handle) => self.protocol.release(handle).map_err(|e| self.record(e)),
            None => Ok(()),
        }
    }

    /// The caller's response slot.
    pub fn response(&self) -> &Response<'b> {
        &*self.response
    }

    /// Mutable access to the caller's response slot.
    pub fn response_mut(&mut self) -> &mut Response<'b> {
        &mut *self.response
    }

    fn record(&mut self, error: Error) -> Error {
        self.error = Some(error);
        error
    }

    fn clear_timeout(&mut self) {
        if self.error == Some(Error::Timeout) {
            self.error = None;
        }
    }
}

impl Drop for Promise<'_, '_> {
    fn drop(&mut self) {
        let _ = self.release();
    }
}

impl fmt::Debug for Promise<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise")
            .field("handle", &self.handle)
            .field("error", &self.error)
            .field("response", &self.response)
            .finish()
    }
}
