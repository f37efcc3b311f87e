//! HTTP/1.1 protocol implementation for embedded systems.
//!
//! This module provides a lightweight HTTP client engine designed specifically
//! for embedded systems and `no_std` environments. It focuses on predictable
//! memory usage: nothing here allocates, every buffer is supplied by the
//! caller, and message types only borrow the text they describe.
//!
//! # Features
//!
//! - HTTP/1.1 request and response message model
//! - Resumable serialization into buffers of any size, down to one byte
//! - Empty header fields are elided from the output
//! - Bounded number of in-flight requests, with admission timeout
//! - Data-ready notification that is safe to fire from an interrupt
//! - Blocking and `async` waits on the response
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │   Request    │──▶│    Cursor    │──▶│    Client    │──▶│  Transport   │
//! │ (borrowed)   │   │ (resumable)  │   │ (admission)  │   │  (external)  │
//! └──────────────┘   └──────────────┘   └──────────────┘   └──────────────┘
//!                                              │                   │
//!                                              ▼                   │ Notifier
//!                                       ┌──────────────┐           │
//!                                       │   Promise    │◀──────────┘
//!                                       │ wait / read  │
//!                                       └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust
//! use core::time::Duration;
//! use libiot_http::network::application::http::{
//!     Client, Config, Method, Notifier, Request, RequestId, RequestTable, Response, Transport,
//! };
//! use libiot_http::network::error::Error;
//! use libiot_http::sync::Clock;
//!
//! /// A link that answers every request immediately.
//! struct Loopback<'a> {
//!     notifier: Option<Notifier<'a>>,
//! }
//!
//! impl<'a> Transport<'a> for Loopback<'a> {
//!     fn send(&mut self, _request: RequestId, _bytes: &[u8]) -> Result<(), Error> {
//!         Ok(())
//!     }
//!     fn read(&mut self, _request: RequestId, buf: &mut [u8]) -> Result<usize, Error> {
//!         let reply = b"HTTP/1.1 204 No Content\r\n\r\n";
//!         let n = reply.len().min(buf.len());
//!         buf[..n].copy_from_slice(&reply[..n]);
//!         Ok(n)
//!     }
//!     fn register_notify(&mut self, _request: RequestId, notifier: Notifier<'a>) -> Result<(), Error> {
//!         // A real link would do this from its receive interrupt.
//!         notifier.notify();
//!         self.notifier = Some(notifier);
//!         Ok(())
//!     }
//!     fn unregister_notify(&mut self, _request: RequestId) -> Result<(), Error> {
//!         self.notifier = None;
//!         Ok(())
//!     }
//! }
//!
//! struct Uptime(std::time::Instant);
//!
//! impl Clock for Uptime {
//!     fn now(&self) -> Duration {
//!         self.0.elapsed()
//!     }
//! }
//!
//! static TABLE: RequestTable<1> = RequestTable::new();
//!
//! let client: Client<'_, _, _> = Client::new(
//!     Loopback { notifier: None },
//!     Uptime(std::time::Instant::now()),
//!     &TABLE,
//!     Config::default(),
//! )
//! .unwrap();
//!
//! let mut request = Request::new(Method::Get, "/status");
//! request.headers.host = "device.local";
//!
//! let mut response = Response::default();
//! let mut promise = client.submit(&request, &mut response);
//! promise.wait(Duration::from_millis(100)).unwrap();
//!
//! let mut buf = [0u8; 64];
//! let n = promise.read(&mut buf).unwrap();
//! let head = Response::parse_head(&buf[..n]).unwrap();
//! assert!(head.status.success());
//! ```

#![deny(unsafe_code)]

/// Basic authentication credentials.
pub mod auth;

/// Admission-controlled request/response client.
pub mod client;

/// Construction-time client configuration.
pub mod config;

/// Error taxonomy of the HTTP engine.
pub mod error;

/// Fixed, named header field sets.
pub mod header;

/// Complete request and response messages.
pub mod message;

/// Request methods.
pub mod method;

/// Minimal response head parser.
pub mod parse;

/// Handle to an in-flight request.
pub mod promise;

/// Resumable serialization.
pub mod serialize;

/// Status codes.
pub mod status;

/// The transport contract and a stream adapter.
pub mod transport;

pub use client::{ActiveRequest, Client, Handle, Protocol, RequestTable, State};
pub use config::Config;
pub use error::Error;
pub use header::{EntityHeaders, GeneralHeaders, HeaderBag, RequestHeaders, ResponseHeaders};
pub use message::{Request, Response, content_length};
pub use method::Method;
pub use parse::ParseError;
pub use promise::Promise;
pub use serialize::{Cursor, Layout, Progress, SerializeError};
pub use status::StatusCode;
pub use transport::{FastCallback, Notifier, RequestId, StreamTransport, Transport};
