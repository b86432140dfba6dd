//! Seams between the acquisition loop and its collaborators
//!
//! The loop never talks to hardware or a terminal directly; it sees a
//! [`LoadCell`] and a [`Console`]. Keep these small - the rig does not
//! need more abstraction than a test harness does.

use crate::command::ParseError;
use crate::errors::{RigError, SensorError};
use crate::sample::RawSample;

/// A source of raw load-cell samples
///
/// Implemented by the HX711 driver and by scripted cells in tests.
pub trait LoadCell {
    /// Block until one conversion is available, bounded by the driver's
    /// ready timeout
    fn read_raw(&mut self) -> Result<RawSample, SensorError>;
}

/// Operator console seam
///
/// The core emits typed [`Notice`] values and never formats display text;
/// how they reach the operator is the binary's concern.
pub trait Console {
    /// Return a complete newline-terminated command line, if one has
    /// arrived since the last poll. Never blocks.
    fn poll_line(&mut self) -> Option<&str>;

    /// Report a status or fault event
    fn notify(&mut self, notice: Notice);
}

/// Status events the loop reports each cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Notice {
    /// Per-cycle diagnostic echo of the sample just taken
    Reading {
        /// Unconverted sensor output
        raw: RawSample,
        /// Calibrated mass equivalent
        grams: f32,
        /// Calibrated force
        newtons: f32,
    },
    /// A run file was created, at boot or on `reset`
    RunOpened {
        /// Run index, as in `drag_log_<index>.txt`
        index: u32,
    },
    /// Tare accepted; conversions now zero at this raw value
    TareSet {
        /// The raw reading captured as the new zero
        zero_offset: i32,
    },
    /// Calibration accepted
    Calibrated {
        /// New scale factor in counts per gram
        scale_factor: f32,
    },
    /// A console line did not parse; nothing was executed
    CommandRejected(ParseError),
    /// A non-fatal fault; the run continues
    Fault(RigError),
}
