//! Client configuration.

use core::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::Error;

/// Construction-time settings of a [`Client`](super::Client).
///
/// Timeouts are in milliseconds; zero means "wait forever". Every field
/// has a default, so a JSON document only needs the fields it changes.
///
/// # Examples
///
/// ```rust
/// use libiot_http::network::application::http::Config;
///
/// let config = Config::from_json(br#"{"admission_capacity":2}"#).unwrap();
/// assert_eq!(config.admission_capacity, 2);
/// assert_eq!(config.wait_timeout_ms, Config::default().wait_timeout_ms);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct Config {
    /// Maximum number of requests in flight at once.
    pub admission_capacity: usize,
    /// How long `submit` waits for an admission slot.
    pub send_timeout_ms: u32,
    /// Default timeout for waiting on a response.
    pub wait_timeout_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            admission_capacity: 1,
            send_timeout_ms: 10,
            wait_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Parse a configuration from JSON.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`] if the document is malformed.
    pub fn from_json(json: &[u8]) -> Result<Self, Error> {
        serde_json_core::from_slice(json)
            .map(|(config, _)| config)
            .map_err(|_| Error::InvalidConfig)
    }

    /// Write the configuration as JSON into `buf`, returning the length.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`] if `buf` is too small.
    pub fn to_json(&self, buf: &mut [u8]) -> Result<usize, Error> {
        serde_json_core::to_slice(self, buf).map_err(|_| Error::InvalidConfig)
    }

    /// The admission timeout used by `submit`.
    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.send_timeout_ms))
    }

    /// The default response wait timeout.
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.wait_timeout_ms))
    }
}
