//! Common error types for network operations

/// A common error type for network operations.
///
/// This is the error every [`Transport`](super::application::http::Transport)
/// reports. It is designed to be simple and portable for `no_std`
/// environments.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// An operation was attempted on a link that is not open.
    NotOpen,
    /// An error occurred during a write operation.
    WriteError,
    /// An error occurred during a read operation.
    ReadError,
    /// The link did not become writable or readable in time.
    Timeout,
    /// The remote end closed the connection.
    ConnectionClosed,
    /// An operation referred to a request the link is not serving.
    UnknownRequest,
    /// A protocol-specific error occurred.
    ProtocolError,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::NotOpen => defmt::write!(f, "NotOpen"),
            Error::WriteError => defmt::write!(f, "WriteError"),
            Error::ReadError => defmt::write!(f, "ReadError"),
            Error::Timeout => defmt::write!(f, "Timeout"),
            Error::ConnectionClosed => defmt::write!(f, "ConnectionClosed"),
            Error::UnknownRequest => defmt::write!(f, "UnknownRequest"),
            Error::ProtocolError => defmt::write!(f, "ProtocolError"),
        }
    }
}
