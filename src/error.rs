//! Error types for the ELL14 driver.
//!
//! `Ell14Error` is the single error type returned by every fallible operation in
//! the library, from frame decoding up to the device controller. It is built with
//! `thiserror`, so lower-level errors (I/O) convert automatically via `?`.
//!
//! ## Error Hierarchy
//!
//! - **Framing**: `FrameTimeout`, `MalformedFrame`, `AddressMismatch`,
//!   `UnexpectedHeader`. The reply could not be read or does not belong to the
//!   request that was sent.
//! - **Device state**: `UnknownStatus`, `DeviceFault`, `ReadyTimeout`. The device
//!   answered, but with a condition the caller has to handle.
//! - **Usage**: `ClosedDevice`, `InvalidAddress`, `PositionOverflow`,
//!   `InvalidAngle`, `Configuration`.
//! - **`Io`**: wraps `std::io::Error` raised by the underlying transport.
//!
//! None of these are retried internally. The only retry in the crate is the
//! busy poll inside `Ell14Driver::wait_until_ready`.

use crate::status::Ell14Status;
use std::time::Duration;
use thiserror::Error;

/// Convenience alias for results using the driver error type.
pub type Result<T> = std::result::Result<T, Ell14Error>;

#[derive(Error, Debug)]
#[allow(missing_docs)]
pub enum Ell14Error {
    #[error("No response terminator received within {timeout:?} ({received} bytes buffered)")]
    FrameTimeout { timeout: Duration, received: usize },

    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    #[error("Response address '{actual}' does not match device address '{expected}'")]
    AddressMismatch { expected: char, actual: char },

    #[error("Unexpected response header '{header}' to command '{command}'")]
    UnexpectedHeader {
        command: &'static str,
        header: String,
    },

    #[error("Unknown status code {0}")]
    UnknownStatus(u32),

    #[error("Device fault: {0}")]
    DeviceFault(Ell14Status),

    #[error("Device still busy after {elapsed:?} ({polls} status polls)")]
    ReadyTimeout { elapsed: Duration, polls: u32 },

    #[error("Device has been closed")]
    ClosedDevice,

    #[error("Invalid device address '{0}': expected a single digit 0-9")]
    InvalidAddress(String),

    #[error("Count value {0} is outside the range the position arithmetic supports")]
    PositionOverflow(i64),

    #[error("Angle {0} is not a finite number of degrees")]
    InvalidAngle(f64),

    #[error("Configuration validation error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Ell14Error {
    /// The device status carried by a [`Ell14Error::DeviceFault`], if any.
    pub fn device_status(&self) -> Option<Ell14Status> {
        match self {
            Self::DeviceFault(status) => Some(*status),
            _ => None,
        }
    }
}
