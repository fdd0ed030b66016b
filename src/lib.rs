#![cfg_attr(not(test), no_std)]

use core::fmt;

#[macro_use]
pub mod logging;

pub mod config;
pub mod diag;
pub mod fade;
pub mod io;
pub mod parse;

#[cfg(feature = "nrf9160")]
pub mod console;
#[cfg(feature = "nrf9160")]
pub mod led;

pub use diag::{diag_shell, DiagHandlers, DiagShell, DiagVar, Shelf, ROOT};
pub use fade::{FadeController, FadeState, PwmError, PwmOutput};
pub use io::{Port, SharedIo};
pub use parse::{parse_long, ParseError, ParseErrorKind};

#[cfg(feature = "nrf9160")]
use panic_probe as _;

/// errno values used for controller status codes
pub mod errno {
    pub const EIO: i32 = 5;
    pub const ENODEV: i32 = 19;
    pub const EINVAL: i32 = 22;
}

/// Crate error types
#[cfg_attr(feature = "nrf9160", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    DeviceNotReady,
    Pwm(PwmError),
    Disarmed,
}

impl From<PwmError> for Error {
    fn from(e: PwmError) -> Self {
        Self::Pwm(e)
    }
}

impl Error {
    /// Negative errno-style status, as a driver call would report it
    pub fn status(&self) -> i32 {
        match self {
            Error::DeviceNotReady => -errno::ENODEV,
            Error::Pwm(e) => e.status(),
            Error::Disarmed => -errno::ENODEV,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DeviceNotReady => f.write_str("device not ready"),
            Error::Pwm(e) => write!(f, "pwm: {}", e),
            Error::Disarmed => f.write_str("fade timer disarmed"),
        }
    }
}
