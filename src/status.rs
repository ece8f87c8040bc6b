//! ELL14 status codes returned in `GS` responses.

use crate::error::{Ell14Error, Result};
use std::fmt;

/// Operational condition reported by the device.
///
/// The discriminants are the wire codes carried in the payload of a `GS` reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Ell14Status {
    /// No error, device idle.
    Ok = 0x00,
    /// Communication timeout.
    CommunicationTimeout = 0x01,
    /// Mechanical timeout.
    MechanicalTimeout = 0x02,
    /// Command not understood.
    CommandError = 0x03,
    /// Command argument out of range.
    ValueOutOfRange = 0x04,
    /// Module isolated.
    ModuleIsolated = 0x05,
    /// Module out of isolation.
    ModuleOutOfIsolation = 0x06,
    /// Initialization error.
    InitializationError = 0x07,
    /// Thermal error.
    ThermalError = 0x08,
    /// Motion in progress.
    Busy = 0x09,
    /// Sensor error.
    SensorError = 0x0A,
    /// Motor error.
    MotorError = 0x0B,
    /// Position out of range.
    OutOfRange = 0x0C,
    /// Over current error.
    OverCurrent = 0x0D,
}

impl Ell14Status {
    /// Every status, ordered by wire code.
    pub const ALL: [Ell14Status; 14] = [
        Self::Ok,
        Self::CommunicationTimeout,
        Self::MechanicalTimeout,
        Self::CommandError,
        Self::ValueOutOfRange,
        Self::ModuleIsolated,
        Self::ModuleOutOfIsolation,
        Self::InitializationError,
        Self::ThermalError,
        Self::Busy,
        Self::SensorError,
        Self::MotorError,
        Self::OutOfRange,
        Self::OverCurrent,
    ];

    /// Look up a wire code. Codes outside 0..=13 fail with `UnknownStatus`.
    pub fn from_code(code: u32) -> Result<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
            .ok_or(Ell14Error::UnknownStatus(code))
    }

    /// Wire code of this status.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// True only for [`Ell14Status::Ok`].
    pub fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }

    /// True only for [`Ell14Status::Busy`].
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Busy)
    }

    /// Human readable name, as printed by the device manual.
    pub fn description(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::CommunicationTimeout => "communication timeout",
            Self::MechanicalTimeout => "mechanical timeout",
            Self::CommandError => "command error",
            Self::ValueOutOfRange => "value out of range",
            Self::ModuleIsolated => "module isolated",
            Self::ModuleOutOfIsolation => "module out of isolation",
            Self::InitializationError => "initialization error",
            Self::ThermalError => "thermal error",
            Self::Busy => "busy",
            Self::SensorError => "sensor error",
            Self::MotorError => "motor error",
            Self::OutOfRange => "out of range",
            Self::OverCurrent => "overcurrent",
        }
    }
}

impl TryFrom<u32> for Ell14Status {
    type Error = Ell14Error;

    fn try_from(code: u32) -> Result<Self> {
        Self::from_code(code)
    }
}

impl fmt::Display for Ell14Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}
