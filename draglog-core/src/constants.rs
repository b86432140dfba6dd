//! Constants for the DragLog acquisition core
//!
//! Centralizes every numeric value the rig depends on, with units in the
//! name and the source of the value documented. Use these instead of magic
//! numbers.

// ===== PHYSICS =====

/// Standard gravitational acceleration (m/s²).
///
/// Conversion factor between calibrated mass (grams) and force (newtons):
/// `N = g / 1000 * 9.80665`.
///
/// Source: CODATA standard acceleration of free fall
pub const STANDARD_GRAVITY: f32 = 9.80665;

// ===== CALIBRATION DEFAULTS =====

/// Zero offset (raw counts) compiled in as the boot default.
///
/// Measured on the reference rig's load cell with no load applied. Only
/// meaningful until the operator issues `tare`; kept so a rig that boots
/// mid-test still produces plausible numbers.
pub const DEFAULT_ZERO_OFFSET: i32 = 44_300;

/// Scale factor (raw counts per gram) compiled in as the boot default.
///
/// Measured on the reference rig against a 500 g check weight. Negative
/// because that cell's wiring inverts under tension. Replaced by
/// `calibrate <weight>`.
pub const DEFAULT_SCALE_FACTOR: f32 = -4.47823;

// ===== SENSOR PROTOCOL (HX711) =====

/// Bits clocked out per conversion.
pub const SAMPLE_BITS: u32 = 24;

/// Settling delay between clock edges (µs).
///
/// Datasheet minimum high/low time for PD_SCK is 0.2 µs; 1 µs is the
/// smallest delay the pin abstraction resolves and leaves slack for slow
/// level shifters.
pub const CLOCK_SETTLE_US: u32 = 1;

/// Interval between polls of the data-ready line (µs).
pub const READY_POLL_INTERVAL_US: u32 = 100;

/// Upper bound on the wait for data-ready (ms).
///
/// At the chip's slowest output rate (10 SPS) a conversion takes 100 ms;
/// five times that means the cell is disconnected, not slow.
pub const READY_TIMEOUT_MS: u32 = 500;

// ===== ACQUISITION =====

/// Nominal interval between samples (ms).
///
/// Best effort: sensor read time is additive, so the true period drifts
/// by the read duration.
pub const SAMPLE_INTERVAL_MS: u32 = 500;

// ===== LOG FILES =====

/// Prefix of per-run log file names.
pub const RUN_FILE_PREFIX: &str = "drag_log_";

/// Suffix of per-run log file names.
pub const RUN_FILE_SUFFIX: &str = ".txt";

/// Index the boot-time file scan starts from.
pub const FIRST_RUN_INDEX: u32 = 1;

/// Header line written at the top of every run file.
pub const RUN_HEADER: &str = "Millis\tRawValue\tForce(N)\n";

/// Name of the overwritten calibration audit record.
pub const CALIBRATION_FILE: &str = "calibration.txt";
