//! Admission-controlled HTTP client.
//!
//! A [`Client`] owns a [`Transport`] and a fixed table of
//! [`ActiveRequest`] records, one per admission slot. Issuing a request
//! takes a permit from a counting semaphore, claims a free record, streams
//! the serialized request to the transport through a small stack buffer and
//! returns a [`Promise`] bound to that record. The transport later reports
//! incoming data through a [`Notifier`], which may run in interrupt context
//! and only touches the record's atomics.
//!
//! The transport is lent to one caller at a time through
//! [`Exclusive`](crate::sync::Exclusive). No critical section is held while
//! the transport works, so a notifier can fire while another request is
//! blocked in [`Transport::send`].
//!
//! Only [`Client::request`] (admission) and [`Promise::wait`] block.

#[cfg(feature = "async")]
use core::cell::RefCell;
use core::fmt;
use core::ops::Deref;
#[cfg(feature = "async")]
use core::sync::atomic::AtomicBool;
use core::sync::atomic::{AtomicU8, AtomicU32, Ordering};
use core::time::Duration;

#[cfg(feature = "async")]
use core::task::{Context, Poll, Waker};

#[cfg(feature = "async")]
use critical_section::Mutex;

use super::config::Config;
use super::error::Error;
use super::message::{Request, Response};
use super::promise::Promise;
use super::transport::{FastCallback, Notifier, RequestId, Transport};
use crate::sync::{Clock, EventFlag, Exclusive, Semaphore};

/// Lifecycle of one admission slot.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// The slot is free.
    Idle = 0,
    /// A request holds the slot but has not started sending.
    Admitted = 1,
    /// The request is being handed to the transport.
    Sending = 2,
    /// The request was sent; no data has been signalled yet.
    AwaitingResponse = 3,
    /// The transport signalled that response data is readable.
    Readable = 4,
    /// The caller has started reading the response.
    Draining = 5,
}

impl State {
    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => State::Admitted,
            2 => State::Sending,
            3 => State::AwaitingResponse,
            4 => State::Readable,
            5 => State::Draining,
            _ => State::Idle,
        }
    }
}

/// Bookkeeping for one in-flight request.
///
/// Records are shared between the client, the promise holder and the
/// transport's notification context. Every field is atomic, apart from the
/// async waker which sits behind a critical section, so a record can live
/// in a `static` [`RequestTable`]. A notification only enters that critical
/// section when an async waiter is registered.
pub struct ActiveRequest {
    id: AtomicU32,
    state: AtomicU8,
    flag: EventFlag,
    #[cfg(feature = "async")]
    waker: Mutex<RefCell<Option<Waker>>>,
    #[cfg(feature = "async")]
    parked: AtomicBool,
}

impl ActiveRequest {
    /// A free record.
    pub const fn new() -> Self {
        Self {
            id: AtomicU32::new(0),
            state: AtomicU8::new(State::Idle as u8),
            flag: EventFlag::new(),
            #[cfg(feature = "async")]
            waker: Mutex::new(RefCell::new(None)),
            #[cfg(feature = "async")]
            parked: AtomicBool::new(false),
        }
    }

    /// The request currently holding the record.
    pub fn id(&self) -> Option<RequestId> {
        RequestId::new(self.id.load(Ordering::Acquire))
    }

    /// The current lifecycle state.
    pub fn state(&self) -> State {
        State::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Whether data was signalled and not yet consumed by a wait.
    pub fn is_signalled(&self) -> bool {
        self.flag.is_set()
    }

    pub(crate) fn owned_by(&self, id: RequestId) -> bool {
        self.id.load(Ordering::Acquire) == id.get()
    }

    fn claim(&self, id: RequestId) -> bool {
        self.id
            .compare_exchange(0, id.get(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn arm(&self) {
        self.flag.clear();
        self.set_state(State::Admitted);
    }

    fn set_state(&self, state: State) {
        self.state.store(state as u8, Ordering::Release);
    }

    /// Deliver a data-ready signal for request `id`.
    ///
    /// Signals for a request that no longer holds the record are dropped.
    pub(crate) fn signal(&self, id: RequestId) {
        if !self.owned_by(id) {
            return;
        }

        self.set_state(State::Readable);
        self.flag.set();

        #[cfg(feature = "async")]
        {
            // Pairs with the fence in `register_waker`.
            core::sync::atomic::fence(Ordering::SeqCst);
            let waker = if self.parked.swap(false, Ordering::SeqCst) {
                critical_section::with(|cs| self.waker.borrow_ref_mut(cs).take())
            } else {
                None
            };
            if let Some(waker) = waker {
                waker.wake();
            }
        }
    }

    #[cfg(feature = "async")]
    fn register_waker(&self, waker: &Waker) {
        critical_section::with(|cs| {
            let mut slot = self.waker.borrow_ref_mut(cs);
            match slot.as_ref() {
                Some(current) if current.will_wake(waker) => {}
                _ => *slot = Some(waker.clone()),
            }
        });
        self.parked.store(true, Ordering::SeqCst);
        core::sync::atomic::fence(Ordering::SeqCst);
    }

    // The id is zeroed last so the record is not reclaimed half cleared.
    fn clear(&self) {
        #[cfg(feature = "async")]
        {
            self.parked.store(false, Ordering::SeqCst);
            critical_section::with(|cs| self.waker.borrow_ref_mut(cs).take());
        }
        self.flag.clear();
        self.set_state(State::Idle);
        self.id.store(0, Ordering::Release);
    }
}

impl Default for ActiveRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ActiveRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveRequest")
            .field("id", &self.id())
            .field("state", &self.state())
            .field("signalled", &self.is_signalled())
            .finish()
    }
}

/// A fixed table of request records.
///
/// Construct it in a `static` so that notifiers handed to an interrupt
/// driven transport can borrow from it for `'static`.
///
/// ```rust
/// use libiot_http::network::application::http::RequestTable;
///
/// static TABLE: RequestTable<2> = RequestTable::new();
/// assert_eq!(TABLE.len(), 2);
/// ```
#[derive(Debug)]
pub struct RequestTable<const N: usize> {
    records: [ActiveRequest; N],
}

impl<const N: usize> RequestTable<N> {
    /// A table of `N` free records.
    pub const fn new() -> Self {
        Self {
            records: [const { ActiveRequest::new() }; N],
        }
    }
}

impl<const N: usize> Default for RequestTable<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Deref for RequestTable<N> {
    type Target = [ActiveRequest];

    fn deref(&self) -> &[ActiveRequest] {
        &self.records
    }
}

/// Names one admitted request: its record slot and its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Handle {
    slot: usize,
    id: RequestId,
}

impl Handle {
    /// Index of the record in the client's table.
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// The request id.
    pub fn id(&self) -> RequestId {
        self.id
    }
}

/// Operations on an admitted request.
///
/// [`Promise`] talks to its client through this object-safe trait, so a
/// promise type does not carry the client's transport and clock types.
/// A handle whose request was already released is a programmer error: it
/// panics in debug builds and returns [`Error::ProgrammerError`] otherwise.
pub trait Protocol {
    /// Block until data is signalled for the request or `timeout` elapses.
    ///
    /// A zero `timeout` waits indefinitely. The signal is consumed.
    fn wait(&self, handle: Handle, timeout: Duration) -> Result<(), Error>;

    /// Copy readable response bytes into `buf` without blocking.
    fn read(&self, handle: Handle, buf: &mut [u8]) -> Result<usize, Error>;

    /// Advisory count of readable response bytes.
    fn available(&self, handle: Handle) -> Result<usize, Error>;

    /// Unregister notification, clear the record and free the admission
    /// slot.
    ///
    /// The slot is freed even if the transport fails to unregister; that
    /// failure is still returned.
    fn release(&self, handle: Handle) -> Result<(), Error>;

    /// The lifecycle state of the request.
    fn state(&self, handle: Handle) -> Result<State, Error>;

    /// Poll for the data-ready signal, registering `cx`'s waker.
    #[cfg(feature = "async")]
    fn poll_ready(&self, handle: Handle, cx: &mut Context<'_>) -> Poll<Result<(), Error>>;
}

/// An HTTP/1.1 client bound to one transport.
///
/// `SCRATCH` is the size of the stack buffer used to stream each request
/// into the transport.
pub struct Client<'a, T, C, const SCRATCH: usize = 64>
where
    T: Transport<'a>,
    C: Clock,
{
    transport: Exclusive<T>,
    clock: C,
    slots: &'a [ActiveRequest],
    admission: Semaphore,
    next_id: AtomicU32,
    config: Config,
}

impl<'a, T, C, const SCRATCH: usize> Client<'a, T, C, SCRATCH>
where
    T: Transport<'a>,
    C: Clock,
{
    /// Create a client.
    ///
    /// Up to `config.admission_capacity` requests may be in flight at once,
    /// each using one record of `slots`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`] if the capacity is zero or larger than the
    /// table, or if `SCRATCH` is zero.
    pub fn new(
        transport: T,
        clock: C,
        slots: &'a [ActiveRequest],
        config: Config,
    ) -> Result<Self, Error> {
        let capacity = config.admission_capacity;
        if capacity == 0 || capacity > slots.len() || SCRATCH == 0 {
            error!(
                "http client: invalid config (capacity {=usize}, slots {=usize})",
                capacity,
                slots.len()
            );
            return Err(Error::InvalidConfig);
        }

        Ok(Self {
            transport: Exclusive::new(transport),
            clock,
            slots,
            admission: Semaphore::new(capacity),
            next_id: AtomicU32::new(1),
            config,
        })
    }

    /// The configuration the client was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The client's clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Run `f` with exclusive access to the transport.
    ///
    /// Waits, relaxing on the client's clock, while another request is using
    /// the transport. Interrupts stay enabled during `f`. Calling
    /// `with_transport` again from within `f`, or from a [`FastCallback`],
    /// never returns.
    pub fn with_transport<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        self.transport.with(&self.clock, f)
    }

    /// Tear the client down and return its transport.
    ///
    /// `None` only if a transport access was leaked with `mem::forget`.
    pub fn into_transport(self) -> Option<T> {
        self.transport.into_inner()
    }

    /// Number of admitted requests not yet released.
    pub fn in_flight(&self) -> usize {
        self.admission.capacity() - self.admission.available()
    }

    /// Issue a request with the configured send timeout and no callback.
    pub fn submit<'p, 'b>(
        &'p self,
        request: &Request<'_>,
        response: &'p mut Response<'b>,
    ) -> Promise<'p, 'b> {
        self.request(request, response, self.config.send_timeout(), None)
    }

    /// Issue a request.
    ///
    /// Waits up to `send_timeout` (zero waits forever) for an admission
    /// slot, then sends the whole request before returning. `notify`, if
    /// given, runs in the transport's notification context each time
    /// response data is signalled.
    ///
    /// Failures are reported on the returned promise, which is then not
    /// attached to any request:
    ///
    /// - [`Error::Validation`] for an invalid request; nothing is admitted.
    /// - [`Error::Admission`] if no slot frees up in time.
    /// - [`Error::Serialization`] or [`Error::Transport`] if sending fails;
    ///   the slot is released again.
    pub fn request<'p, 'b>(
        &'p self,
        request: &Request<'_>,
        response: &'p mut Response<'b>,
        send_timeout: Duration,
        notify: Option<FastCallback>,
    ) -> Promise<'p, 'b> {
        if !request.is_valid() {
            warn!("http client: rejecting invalid request");
            return Promise::failed(self, response, Error::Validation);
        }

        let handle = match self.admit(send_timeout) {
            Ok(handle) => handle,
            Err(e) => return Promise::failed(self, response, e),
        };

        if let Err(e) = self.transmit(request, handle, notify) {
            warn!("http client: request {} abandoned: {}", handle.id, e);
            self.abandon(handle);
            return Promise::failed(self, response, e);
        }

        debug!("http client: request {} sent", handle.id);
        Promise::attached(self, response, handle)
    }

    fn admit(&self, timeout: Duration) -> Result<Handle, Error> {
        if !self.admission.acquire(&self.clock, timeout) {
            debug!("http client: admission timed out");
            return Err(Error::Admission);
        }

        let id = self.fresh_id();
        let capacity = self.admission.capacity();
        let Some(slot) = self.slots[..capacity].iter().position(|r| r.claim(id)) else {
            // Another client shares the table and holds every record.
            self.admission.release();
            warn!("http client: no free request record");
            return Err(Error::Admission);
        };

        self.slots[slot].arm();
        trace!("http client: request {} admitted to slot {=usize}", id, slot);
        Ok(Handle { slot, id })
    }

    fn fresh_id(&self) -> RequestId {
        loop {
            let raw = self.next_id.fetch_add(1, Ordering::Relaxed);
            if let Some(id) = RequestId::new(raw) {
                return id;
            }
        }
    }

    fn transmit(
        &self,
        request: &Request<'_>,
        handle: Handle,
        notify: Option<FastCallback>,
    ) -> Result<(), Error> {
        let slots: &'a [ActiveRequest] = self.slots;
        let record = &slots[handle.slot];
        record.set_state(State::Sending);

        let mut scratch = [0u8; SCRATCH];
        let mut cursor = request.cursor();
        while !cursor.eof() {
            let progress = cursor.serialize(&mut scratch)?;
            let chunk = &scratch[..progress.written()];
            self.with_transport(|t| t.send(handle.id, chunk))?;
        }

        // Set before registering so an immediate notification is not lost.
        record.set_state(State::AwaitingResponse);
        let notifier = Notifier::new(record, handle.id, notify);
        self.with_transport(|t| t.register_notify(handle.id, notifier))?;
        Ok(())
    }

    fn abandon(&self, handle: Handle) {
        if let Err(e) = self.with_transport(|t| t.unregister_notify(handle.id)) {
            warn!("http client: request {} not aborted on the link: {}", handle.id, e);
        }
        self.slots[handle.slot].clear();
        self.admission.release();
    }

    fn record(&self, handle: Handle) -> Result<&ActiveRequest, Error> {
        match self.slots.get(handle.slot) {
            Some(record) if record.owned_by(handle.id) => Ok(record),
            _ => {
                error!("http client: stale handle for request {}", handle.id);
                if cfg!(debug_assertions) {
                    panic!("stale request handle");
                }
                Err(Error::ProgrammerError)
            }
        }
    }
}

impl<'a, T, C, const SCRATCH: usize> Protocol for Client<'a, T, C, SCRATCH>
where
    T: Transport<'a>,
    C: Clock,
{
    fn wait(&self, handle: Handle, timeout: Duration) -> Result<(), Error> {
        let record = self.record(handle)?;
        if record.flag.wait(&self.clock, timeout) {
            Ok(())
        } else {
            debug!("http client: wait for request {} timed out", handle.id);
            Err(Error::Timeout)
        }
    }

    fn read(&self, handle: Handle, buf: &mut [u8]) -> Result<usize, Error> {
        let record = self.record(handle)?;
        let n = self.with_transport(|t| t.read(handle.id, buf))?;
        if n > 0 {
            record.set_state(State::Draining);
        }
        Ok(n)
    }

    fn available(&self, handle: Handle) -> Result<usize, Error> {
        self.record(handle)?;
        Ok(self.with_transport(|t| t.available(handle.id)))
    }

    fn release(&self, handle: Handle) -> Result<(), Error> {
        let record = self.record(handle)?;
        let unregistered = self.with_transport(|t| t.unregister_notify(handle.id));
        record.clear();
        self.admission.release();
        trace!("http client: request {} released", handle.id);
        unregistered.map_err(Error::from)
    }

    fn state(&self, handle: Handle) -> Result<State, Error> {
        Ok(self.record(handle)?.state())
    }

    #[cfg(feature = "async")]
    fn poll_ready(&self, handle: Handle, cx: &mut Context<'_>) -> Poll<Result<(), Error>> {
        let record = match self.record(handle) {
            Ok(record) => record,
            Err(e) => return Poll::Ready(Err(e)),
        };
        if record.flag.take() {
            return Poll::Ready(Ok(()));
        }

        record.register_waker(cx.waker());
        // A signal may have landed before the waker was stored.
        if record.flag.take() {
            Poll::Ready(Ok(()))
        } else {
            Poll::Pending
        }
    }
}

impl<'a, T, C, const SCRATCH: usize> fmt::Debug for Client<'a, T, C, SCRATCH>
where
    T: Transport<'a>,
    C: Clock,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("capacity", &self.admission.capacity())
            .field("in_flight", &self.in_flight())
            .field("scratch", &SCRATCH)
            .field("config", &self.config)
            .finish()
    }
}
