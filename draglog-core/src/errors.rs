//! Error Types for Acquisition, Calibration, and Logging Faults
//!
//! ## Design Philosophy
//!
//! The rig runs unattended on small hardware, so errors here follow the
//! same rules everywhere:
//!
//! 1. **Small and Copy**: every variant is a few bytes and implements
//!    Copy, so errors can ride inside notices and return values without
//!    move gymnastics.
//!
//! 2. **No Heap Allocation**: all context is inline integers; no String.
//!
//! 3. **Actionable**: each variant tells the operator what to do (rewire
//!    the cell, re-seat the card, put a real weight on) without further
//!    queries.
//!
//! ## Error Categories
//!
//! - [`SensorError`]: the load-cell amplifier did not produce a sample.
//! - [`CalibrationError`]: an operator calibration request was rejected
//!   before any state changed.
//! - [`StorageError`]: the durable medium failed. `Unavailable` is fatal
//!   at boot; `WriteFailed` costs one sample and the run continues.
//! - [`RigError`]: umbrella over the above for the acquisition loop.
//!
//! ## Handling Strategy
//!
//! ```rust
//! use draglog_core::errors::{CalibrationError, RigError};
//!
//! fn operator_hint(err: RigError) -> &'static str {
//!     match err {
//!         RigError::Sensor(_) => "check load cell wiring",
//!         RigError::Calibration(CalibrationError::InvalidReference) => "weight must be > 0",
//!         RigError::Calibration(CalibrationError::DegenerateCalibration) => "load the cell first",
//!         RigError::Storage(_) => "check the storage medium",
//!     }
//! }
//! # assert_eq!(
//! #     operator_hint(RigError::Calibration(CalibrationError::InvalidReference)),
//! #     "weight must be > 0",
//! # );
//! ```

use thiserror_no_std::Error;

/// Result type for acquisition-loop operations
pub type RigResult<T> = Result<T, RigError>;

/// Faults raised by the load-cell signal reader
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The data line never signalled ready within the configured bound
    #[error("sensor not ready after {waited_ms} ms")]
    Timeout {
        /// How long the reader polled before giving up
        waited_ms: u32,
    },

    /// A GPIO read or write failed
    #[error("pin access failed")]
    Pin,
}

/// Rejected calibration requests; state is untouched when these are returned
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationError {
    /// Reference weight was non-positive, NaN, or missing
    #[error("reference weight must be a positive number of grams")]
    InvalidReference,

    /// Raw reading equals the zero offset, which would make the scale
    /// factor zero and poison every later conversion
    #[error("no raw delta against zero offset; load the reference weight")]
    DegenerateCalibration,
}

/// Durable-storage faults
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Medium absent or unmountable. Fatal at boot: running a pull test
    /// without a log defeats the point of the rig
    #[error("storage medium unavailable")]
    Unavailable,

    /// One create or append did not complete; the sample is dropped and
    /// the run continues
    #[error("write failed")]
    WriteFailed,
}

/// Umbrella error for the acquisition loop
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RigError {
    /// Signal reader fault
    #[error("sensor: {0}")]
    Sensor(#[from] SensorError),

    /// Calibration request rejected
    #[error("calibration: {0}")]
    Calibration(#[from] CalibrationError),

    /// Storage fault
    #[error("storage: {0}")]
    Storage(#[from] StorageError),
}

#[cfg(feature = "defmt")]
impl defmt::Format for SensorError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Timeout { waited_ms } => defmt::write!(fmt, "not ready after {} ms", waited_ms),
            Self::Pin => defmt::write!(fmt, "pin access failed"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CalibrationError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InvalidReference => defmt::write!(fmt, "invalid reference weight"),
            Self::DegenerateCalibration => defmt::write!(fmt, "zero raw delta"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StorageError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Unavailable => defmt::write!(fmt, "storage unavailable"),
            Self::WriteFailed => defmt::write!(fmt, "write failed"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for RigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Sensor(e) => defmt::write!(fmt, "sensor: {}", e),
            Self::Calibration(e) => defmt::write!(fmt, "calibration: {}", e),
            Self::Storage(e) => defmt::write!(fmt, "storage: {}", e),
        }
    }
}
