//! Unified error types for the LED ring firmware.
//!
//! Every failure is an initialisation failure: once the timer runs, the
//! animation has no error paths.  All variants are `Copy`.

use core::fmt;

use crate::app::ports::PortError;
use crate::config::ConfigError;

/// Every fallible start-up operation funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Configuration failed validation.
    Config(ConfigError),
    /// A peripheral could not be configured.
    Port(PortError),
    /// The animation state or interrupt slot is already in use.
    AlreadyStarted,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Port(e) => write!(f, "port: {e}"),
            Self::AlreadyStarted => write!(f, "animation already started"),
        }
    }
}

impl std::error::Error for Error {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<PortError> for Error {
    fn from(e: PortError) -> Self {
        Self::Port(e)
    }
}

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
