//! # libiot-http - HTTP/1.1 client engine for embedded devices
//!
//! A small HTTP/1.1 client protocol engine for memory-constrained IoT devices.
//! Requests are described with borrowed, allocation-free message types,
//! streamed into caller-sized buffers by a resumable serializer, and handed to
//! a narrow byte-oriented transport. The response is exposed through a
//! [`Promise`](network::application::http::Promise) that a thread can wait on
//! while the transport signals data arrival from an interrupt or callback.
//!
//! ## Features
//!
//! ### Message Model
//! - Closed set of standard methods plus extension tokens
//! - Status codes with class predicates and canonical reason phrases
//! - Fixed, named header bags (general, request, response, entity)
//!
//! ### Serialization Engine
//! - Resumable at any byte boundary
//! - Zero-copy: field values are copied straight from caller memory
//! - Identical output for any sequence of buffer sizes
//!
//! ### Client Protocol
//! - Bounded admission with timeout
//! - Interrupt-safe data-ready notification
//! - Blocking and `async` waits
//!
//! ## Usage
//!
//! ```rust
//! use libiot_http::network::application::http::{Method, Request};
//!
//! let mut request = Request::new(Method::Get, "/x");
//! request.headers.host = "h";
//!
//! let bytes = request.to_vec::<64>().unwrap();
//! assert_eq!(&bytes[..], b"GET /x HTTP/1.1\r\nHost: h\r\n\r\n");
//! ```
//!
//! ## Platform Support
//!
//! This library is designed to work on:
//! - Embedded microcontrollers with atomic compare-and-swap (ARM Cortex-M3+, RISC-V `a`)
//! - Linux-based IoT devices (Raspberry Pi, etc.)
//! - Any platform supporting Rust's `core` library and a `critical-section` implementation
//!
//! ## Optional Features
//!
//! - `std`: Enable standard library support ([`sync::StdClock`]) (default: disabled)
//! - `async`: Enable `async` waits on a response promise
//! - `defmt`: Enable defmt logging support for embedded debugging

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![doc(html_root_url = "https://shishir-dey.github.io/libiot/")]

#[macro_use]
mod fmt;

/// Network abstraction layer providing the HTTP client and its transport contract.
///
/// This module contains the byte-stream traits shared with the rest of the
/// `libiot` family and the HTTP/1.1 application protocol built on them.
pub mod network;

/// Blocking primitives shared between calling threads and notification contexts.
///
/// Provides the counting semaphore used for admission control, the event flag
/// signalled by data-ready notifications, and the clock abstraction that bounds
/// every wait.
pub mod sync;
