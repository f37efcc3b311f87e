//! A network abstraction layer for embedded systems
//!
//! This module provides the byte-stream traits shared by the `libiot` family
//! and the application protocols built on top of them. A concrete link (a
//! TCP socket, a UART to a Wi-Fi co-processor, ...) implements [`Read`],
//! [`Write`] and [`Close`]; protocol clients stay agnostic of the transport.
//!

#![allow(missing_docs)]
#![deny(unsafe_code)]

/// Common error types for network operations
pub mod error;

/// Application-layer protocol implementations
pub mod application;

/// Re-exports of common traits
pub mod prelude {
    pub use super::application::http::Transport;
    pub use super::{Close, Connection, Read, Write};
}

// Core synchronous traits
pub trait Read {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Read data from the connection
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

pub trait Write {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Write data to the connection
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;
    /// Flush the write buffer
    fn flush(&mut self) -> Result<(), Self::Error>;
}

pub trait Close {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Close the connection
    fn close(self) -> Result<(), Self::Error>;
}

/// A synchronous connection
pub trait Connection: Read + Write + Close {}
