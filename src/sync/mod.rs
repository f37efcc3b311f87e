//! # Blocking primitives for embedded request/response protocols
//!
//! The HTTP client coordinates three parties: the thread issuing a request,
//! the thread (often the same one) waiting for its response, and a restricted
//! notification context (an interrupt handler or a short callback executor)
//! that reports incoming data. This module provides the small set of
//! lock-free primitives they share.
//!
//! - [`Semaphore`]: bounded counting semaphore used for admission control
//! - [`EventFlag`]: binary signal that may be set from interrupt context
//! - [`Clock`]: monotonic time source that bounds every wait
//! - [`Exclusive`]: single-owner access to a value without holding a
//!   critical section across the access
//! - [`block_until`]: the single blocking loop built on the three above
//!
//! All primitives are `const`-constructible so they can live in `static`
//! items, and none of them allocate.
//!
//! # Examples
//!
//! ```rust
//! use core::time::Duration;
//! use libiot_http::sync::{Clock, EventFlag, block_until};
//!
//! struct Ticks(core::cell::Cell<u64>);
//!
//! impl Clock for Ticks {
//!     fn now(&self) -> Duration {
//!         // Every poll advances the fake clock by one millisecond.
//!         let t = self.0.get() + 1;
//!         self.0.set(t);
//!         Duration::from_millis(t)
//!     }
//! }
//!
//! let flag = EventFlag::new();
//! let clock = Ticks(core::cell::Cell::new(0));
//!
//! // Nobody sets the flag, so the wait expires.
//! assert!(!flag.wait(&clock, Duration::from_millis(5)));
//!
//! flag.set();
//! assert!(flag.wait(&clock, Duration::from_millis(5)));
//! ```

#![deny(unsafe_code)]

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use core::time::Duration;

use critical_section::Mutex;


/// A monotonic time source.
///
/// Implementations typically wrap a hardware timer or an RTOS tick counter.
/// The epoch is arbitrary; only differences between readings are used.
pub trait Clock {
    /// Time elapsed since an arbitrary, fixed epoch.
    fn now(&self) -> Duration;

    /// Called between polls of a blocking wait.
    ///
    /// The default issues a spin-loop hint. Platforms with a scheduler should
    /// yield or sleep here.
    fn relax(&self) {
        core::hint::spin_loop();
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }

    fn relax(&self) {
        (**self).relax()
    }
}

/// Poll `ready` until it returns `true` or `timeout` elapses.
///
/// A zero `timeout` waits indefinitely. `ready` is always evaluated at least
/// once, so an already-satisfied condition never blocks.
///
/// Returns `true` if the condition was met.
pub fn block_until<C, F>(clock: &C, timeout: Duration, mut ready: F) -> bool
where
    C: Clock + ?Sized,
    F: FnMut() -> bool,
{
    if ready() {
        return true;
    }

    let start = clock.now();
    loop {
        clock.relax();
        if ready() {
            return true;
        }
        if !timeout.is_zero() && clock.now().saturating_sub(start) >= timeout {
            return false;
        }
    }
}

/// A bounded counting semaphore.
///
/// Permits are tracked with a single atomic counter. [`release`](Self::release)
/// never raises the count above the capacity the semaphore was built with, so
/// a double release cannot silently widen admission.
#[derive(Debug)]
pub struct Semaphore {
    permits: AtomicUsize,
    capacity: usize,
}

impl Semaphore {
    /// Create a semaphore with `capacity` permits, all available.
    pub const fn new(capacity: usize) -> Self {
        Self {
            permits: AtomicUsize::new(capacity),
            capacity,
        }
    }

    /// Total number of permits.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits currently available.
    pub fn available(&self) -> usize {
        self.permits.load(Ordering::Acquire)
    }

    /// Take a permit if one is available, without blocking.
    pub fn try_acquire(&self) -> bool {
        self.permits
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_ok()
    }

    /// Take a permit, blocking for at most `timeout` (zero waits forever).
    pub fn acquire<C: Clock + ?Sized>(&self, clock: &C, timeout: Duration) -> bool {
        block_until(clock, timeout, || self.try_acquire())
    }

    /// Return a permit.
    ///
    /// Returns `false` if every permit was already available, in which case
    /// the count is left unchanged.
    pub fn release(&self) -> bool {
        let capacity = self.capacity;
        self.permits
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < capacity).then_some(n + 1)
            })
            .is_ok()
    }
}

/// A binary signal between execution contexts.
///
/// [`set`](Self::set) is a single atomic store and may be called from an
/// interrupt handler. Waiters consume the signal with [`take`](Self::take) or
/// [`wait`](Self::wait).
#[derive(Debug, Default)]
pub struct EventFlag {
    raised: AtomicBool,
}

impl EventFlag {
    /// Create a cleared flag.
    pub const fn new() -> Self {
        Self {
            raised: AtomicBool::new(false),
        }
    }

    /// Raise the flag.
    pub fn set(&self) {
        self.raised.store(true, Ordering::Release);
    }

    /// Lower the flag.
    pub fn clear(&self) {
        self.raised.store(false, Ordering::Release);
    }

    /// Whether the flag is raised, without consuming it.
    pub fn is_set(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }

    /// Consume the flag, returning whether it was raised.
    pub fn take(&self) -> bool {
        self.raised.swap(false, Ordering::AcqRel)
    }

    /// Block until the flag is raised, then consume it.
    ///
    /// Waits at most `timeout` (zero waits forever). Returns `false` on
    /// timeout.
    pub fn wait<C: Clock + ?Sized>(&self, clock: &C, timeout: Duration) -> bool {
        block_until(clock, timeout, || self.take())
    }
}

/// A value lent to one user at a time.
///
/// The value is moved out of its slot for the duration of an access and put
/// back afterwards. The critical section is only held while moving it, so a
/// long access (a blocking write, say) never masks interrupts or stalls
/// other contexts that briefly enter a critical section.
///
/// Contenders spin on [`Clock::relax`] until the value is back. Accessing
/// the value again from inside [`with`](Self::with) never succeeds.
pub struct Exclusive<T> {
    slot: Mutex<RefCell<Option<T>>>,
}

impl<T> Exclusive<T> {
    /// Wrap `value`.
    pub const fn new(value: T) -> Self {
        Self {
            slot: Mutex::new(RefCell::new(Some(value))),
        }
    }

    /// Whether the value is currently lent out.
    pub fn is_lent(&self) -> bool {
        critical_section::with(|cs| self.slot.borrow_ref(cs).is_none())
    }

    /// Run `f` on the value if nobody else holds it.
    pub fn try_with<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.take().map(|value| self.lend(value, f))
    }

    /// Run `f` on the value, waiting for it to be returned first.
    pub fn with<C, R>(&self, clock: &C, f: impl FnOnce(&mut T) -> R) -> R
    where
        C: Clock + ?Sized,
    {
        let value = loop {
            if let Some(value) = self.take() {
                break value;
            }
            clock.relax();
        };
        self.lend(value, f)
    }

    fn take(&self) -> Option<T> {
        critical_section::with(|cs| self.slot.borrow_ref_mut(cs).take())
    }

    fn lend<R>(&self, value: T, f: impl FnOnce(&mut T) -> R) -> R {
        let mut loan = Loan {
            owner: self,
            value: None,
        };
        f(loan.value.insert(value))
    }

    /// Unwrap the value; `None` only if a loan was leaked.
    pub fn into_inner(self) -> Option<T> {
        self.slot.into_inner().into_inner()
    }
}

impl<T> core::fmt::Debug for Exclusive<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Exclusive")
            .field("lent", &self.is_lent())
            .finish()
    }
}

// Puts the value back even if the access panics.
struct Loan<'e, T> {
    owner: &'e Exclusive<T>,
    value: Option<T>,
}

impl<T> Drop for Loan<'_, T> {
    fn drop(&mut self) {
        if let Some(value) = self.value.take() {
            critical_section::with(|cs| *self.owner.slot.borrow_ref_mut(cs) = Some(value));
        }
    }
}

/// A [`Clock`] backed by [`std::time::Instant`].
///
/// Yields the current thread between polls.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    epoch: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    /// Create a clock whose epoch is now.
    pub fn new() -> Self {
        Self {
            epoch: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for StdClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    fn relax(&self) {
        std::thread::yield_now();
    }
}
