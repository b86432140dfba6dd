//! Acquisition core for DragLog
//!
//! Reads a strain-gauge load cell through an HX711 amplifier during towed
//! or wind-tunnel parachute drag tests, converts raw counts to calibrated
//! force, and appends every sample to a numbered run file on durable
//! storage. Operator commands (`tare`, `calibrate <grams>`, `reset`)
//! arrive over a line-based console.
//!
//! Key constraints:
//! - Single-threaded, no heap in the acquisition path
//! - Power loss mid-test is expected; files are opened and closed per write
//! - Every collaborator sits behind a trait so the loop runs against real
//!   pins, a host directory, or scripted test doubles
//!
//! ```
//! use draglog_core::{sign_extend_24, Calibration};
//!
//! // Two's-complement decode of a 24-bit conversion
//! assert_eq!(sign_extend_24(0xFF_FFFF), -1);
//!
//! // Tare, calibrate against a 500 g check weight, convert a pull reading
//! let mut cal = Calibration::default();
//! cal.tare(44_300);
//! cal.calibrate(46_600, 500.0)?;
//! assert!((cal.convert(48_760) - 9.508).abs() < 1e-3);
//! # Ok::<(), draglog_core::CalibrationError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod calibration;
pub mod command;
pub mod constants;
pub mod errors;
pub mod hx711;
pub mod rig;
pub mod runlog;
pub mod sample;
pub mod storage;
pub mod time;
pub mod traits;

// Public API
pub use calibration::Calibration;
pub use command::{parse_line, Command, LineBuffer, ParseError};
pub use errors::{CalibrationError, RigError, RigResult, SensorError, StorageError};
pub use hx711::{sign_extend_24, Gain, Hx711};
pub use rig::Rig;
pub use runlog::RunLog;
pub use sample::{ForceSample, RawSample, RAW_MAX, RAW_MIN};
pub use storage::Storage;
pub use time::{TimeSource, Timestamp};
pub use traits::{Console, LoadCell, Notice};

/// Crate version, from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
