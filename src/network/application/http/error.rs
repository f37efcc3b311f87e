//! Error types for the HTTP client engine.

use super::serialize::SerializeError;
use crate::network::error::Error as TransportError;

/// Errors reported by the HTTP client protocol and its [`Promise`](super::Promise).
///
/// Every failure is a plain value. [`ProgrammerError`](Error::ProgrammerError)
/// additionally trips a debug assertion before it is returned, because it
/// always indicates misuse of the API rather than a runtime condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The request was rejected before admission (invalid method, empty
    /// URI), or the promise is not attached to a request.
    Validation,
    /// No admission permit became available within the send timeout.
    Admission,
    /// The serializer failed while producing the request bytes.
    Serialization(SerializeError),
    /// The transport reported a failure.
    Transport(TransportError),
    /// No data became available within the wait timeout.
    Timeout,
    /// A stale or foreign handle was presented to the protocol.
    ProgrammerError,
    /// The client was constructed with an unusable configuration.
    InvalidConfig,
}

impl Error {
    /// Whether retrying the same operation later can succeed.
    ///
    /// Admission and wait timeouts depend on other requests finishing or on
    /// the peer answering; every other error is permanent for the request.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Admission | Error::Timeout)
    }
}

impl From<SerializeError> for Error {
    fn from(e: SerializeError) -> Self {
        Error::Serialization(e)
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Error::Transport(e)
    }
}
