//! Sample types flowing through the acquisition chain
//!
//! A conversion yields one [`RawSample`]; the calibration state turns it
//! into a [`ForceSample`] which is logged and never touched again.

use crate::time::Timestamp;

/// Sign-extended 24-bit conversion result from the amplifier
pub type RawSample = i32;

/// Smallest value a 24-bit two's-complement conversion can produce
pub const RAW_MIN: RawSample = -(1 << 23);

/// Largest value a 24-bit two's-complement conversion can produce
pub const RAW_MAX: RawSample = (1 << 23) - 1;

/// One logged measurement: when, what the cell said, what it means
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceSample {
    /// Milliseconds since boot at the time of the read
    pub timestamp_ms: Timestamp,
    /// Unconverted sensor output
    pub raw: RawSample,
    /// Calibrated force in newtons
    pub force_newtons: f32,
}

#[cfg(feature = "defmt")]
impl defmt::Format for ForceSample {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "{} ms: raw {} -> {} N",
            self.timestamp_ms,
            self.raw,
            self.force_newtons
        );
    }
}
