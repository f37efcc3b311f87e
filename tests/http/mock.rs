//! Mock transport, connection and clock for HTTP client testing

use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;
use heapless::Vec;
use libiot_http::network::application::http::{Notifier, RequestId, Transport};
use libiot_http::network::error::Error;
use libiot_http::network::{Close, Connection, Read, Write};
use libiot_http::sync::Clock;

/// Wall clock that yields the thread between polls
pub struct TestClock(std::time::Instant);

impl TestClock {
    pub fn new() -> Self {
        Self(std::time::Instant::now())
    }
}

impl Clock for TestClock {
    fn now(&self) -> Duration {
        self.0.elapsed()
    }

    fn relax(&self) {
        std::thread::yield_now();
    }
}

/// Holds `send` until another thread opens it
pub struct Gate {
    pub open: AtomicBool,
    pub waiting: AtomicBool,
}

impl Gate {
    pub fn new() -> Self {
        Self {
            open: AtomicBool::new(false),
            waiting: AtomicBool::new(false),
        }
    }

    fn pass(&self) {
        self.waiting.store(true, Ordering::SeqCst);
        while !self.open.load(Ordering::SeqCst) {
            std::thread::yield_now();
        }
    }
}

/// Mock transport recording everything the client sends
pub struct MockTransport<'a> {
    pub sent: Vec<u8, 2048>,
    pub chunks: usize,
    pub inbox: Vec<u8, 512>,
    pub notifiers: Vec<Notifier<'a>, 4>,
    pub fail_send: bool,
    pub fail_unregister: bool,
    pub registered: usize,
    pub unregistered: usize,
    pub last_id: Option<RequestId>,
    pub gate: Option<&'a Gate>,
}

impl<'a> MockTransport<'a> {
    pub fn new() -> Self {
        Self {
            sent: Vec::new(),
            chunks: 0,
            inbox: Vec::new(),
            notifiers: Vec::new(),
            fail_send: false,
            fail_unregister: false,
            registered: 0,
            unregistered: 0,
            last_id: None,
            gate: None,
        }
    }

    /// Queue response bytes and notify every registered request
    pub fn deliver(&mut self, data: &[u8]) {
        self.inbox.extend_from_slice(data).unwrap();
        for notifier in &self.notifiers {
            notifier.notify();
        }
    }

    /// The notifier registered for `id`
    pub fn notifier(&self, id: RequestId) -> Option<Notifier<'a>> {
        self.notifiers
            .iter()
            .find(|n| n.request_id() == id)
            .copied()
    }
}

impl<'a> Transport<'a> for MockTransport<'a> {
    fn send(&mut self, request: RequestId, bytes: &[u8]) -> Result<(), Error> {
        if self.fail_send {
            return Err(Error::WriteError);
        }
        if let Some(gate) = self.gate {
            gate.pass();
        }
        self.last_id = Some(request);
        self.chunks += 1;
        self.sent
            .extend_from_slice(bytes)
            .map_err(|_| Error::WriteError)
    }

    fn read(&mut self, _request: RequestId, buf: &mut [u8]) -> Result<usize, Error> {
        let n = buf.len().min(self.inbox.len());
        buf[..n].copy_from_slice(&self.inbox[..n]);
        self.inbox.copy_within(n.., 0);
        self.inbox.truncate(self.inbox.len() - n);
        Ok(n)
    }

    fn register_notify(&mut self, _request: RequestId, notifier: Notifier<'a>) -> Result<(), Error> {
        self.registered += 1;
        self.notifiers
            .push(notifier)
            .map_err(|_| Error::ProtocolError)
    }

    fn unregister_notify(&mut self, request: RequestId) -> Result<(), Error> {
        self.unregistered += 1;
        self.notifiers.retain(|n| n.request_id() != request);
        if self.fail_unregister {
            return Err(Error::ProtocolError);
        }
        Ok(())
    }

    fn available(&mut self, _request: RequestId) -> usize {
        self.inbox.len()
    }
}

/// Mock connection for testing the stream transport
#[derive(Debug)]
pub struct MockConnection {
    pub rx: Vec<u8, 512>,
    pub writes: Vec<u8, 1024>,
    pub max_write: usize,
    pub is_open: bool,
}

impl MockConnection {
    pub fn new() -> Self {
        Self {
            rx: Vec::new(),
            writes: Vec::new(),
            max_write: usize::MAX,
            is_open: true,
        }
    }

    /// Helper for tests to inject data into the connection's read buffer
    pub fn set_read_data(&mut self, data: &[u8]) {
        self.rx.clear();
        self.rx.extend_from_slice(data).unwrap();
    }
}

impl Read for MockConnection {
    type Error = Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if !self.is_open {
            return Err(Error::NotOpen);
        }
        let len = buf.len().min(self.rx.len());
        buf[..len].copy_from_slice(&self.rx[..len]);

        // Shift remaining data
        self.rx.copy_within(len.., 0);
        self.rx.truncate(self.rx.len() - len);
        Ok(len)
    }
}

impl Write for MockConnection {
    type Error = Error;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if !self.is_open {
            return Err(Error::NotOpen);
        }
        // Accept at most `max_write` bytes per call, like a short socket write.
        let len = buf.len().min(self.max_write);
        self.writes
            .extend_from_slice(&buf[..len])
            .map_err(|_| Error::WriteError)?;
        Ok(len)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        if !self.is_open {
            return Err(Error::NotOpen);
        }
        Ok(())
    }
}

impl Close for MockConnection {
    type Error = Error;

    fn close(mut self) -> Result<(), Self::Error> {
        self.is_open = false;
        Ok(())
    }
}

impl Connection for MockConnection {}
