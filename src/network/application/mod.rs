//! # Application Layer Network Protocols
//!
//! Application layer (OSI Layer 7) protocols built on the core network traits.
//!
//! ## Available Protocols
//!
//! - **[`http`]**: HTTP/1.1 client engine with resumable serialization and
//!   admission-controlled request/response handling
//!
//! ## Design Principles
//!
//! - **Transport Agnostic**: The protocol talks to a narrow
//!   [`Transport`](http::Transport) contract; any [`Connection`](crate::network::Connection)
//!   can be adapted to it
//! - **No-std Compatible**: Designed for embedded systems without heap allocation
//! - **Resource Conscious**: Caller-sized buffers and fixed-capacity tables
//! - **Error Handling**: Errors are plain values, never panics

/// HTTP/1.1 client implementation.
///
/// Provides the message model, the resumable serializer, the transport
/// contract and the admission-controlled client protocol.
pub mod http;
