//! Calibration state: raw counts to physical force
//!
//! Holds the zero offset set by `tare` and the scale factor set by
//! `calibrate`. Conversions are pure; the two mutators guard their inputs
//! and leave state untouched on rejection, so a bad operator command can
//! never poison later samples.
//!
//! State starts from the compiled-in defaults each boot. The persisted
//! calibration record is an audit artifact for the operator, not a source
//! of truth read back at startup.

use crate::constants::{DEFAULT_SCALE_FACTOR, DEFAULT_ZERO_OFFSET, STANDARD_GRAVITY};
use crate::errors::CalibrationError;
use crate::sample::RawSample;

/// Zero offset and scale factor for one load cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    /// Raw reading that maps to zero force
    zero_offset: i32,

    /// Raw counts per gram of applied load
    scale_factor: f32,

    /// Whether a measured calibration has replaced the compiled-in
    /// scale factor this boot
    calibrated: bool,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            zero_offset: DEFAULT_ZERO_OFFSET,
            scale_factor: DEFAULT_SCALE_FACTOR,
            calibrated: false,
        }
    }
}

impl Calibration {
    /// Current zero offset in raw counts
    pub fn zero_offset(&self) -> i32 {
        self.zero_offset
    }

    /// Current scale factor in counts per gram
    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    /// True once `calibrate` has succeeded this boot
    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    /// Define `raw` as the physical zero point
    ///
    /// The scale factor is kept; taring an already calibrated cell is the
    /// normal way to re-zero between pulls.
    pub fn tare(&mut self, raw: RawSample) {
        self.zero_offset = raw;
    }

    /// Derive a new scale factor from `raw` observed under a known load
    ///
    /// Rejects the request before touching state if the reference weight
    /// is unusable or if `raw` shows no delta against the zero offset (a
    /// zero scale factor would turn every later conversion into a divide
    /// by zero).
    pub fn calibrate(&mut self, raw: RawSample, known_grams: f32) -> Result<(), CalibrationError> {
        if !known_grams.is_finite() || known_grams <= 0.0 {
            return Err(CalibrationError::InvalidReference);
        }

        let delta = raw - self.zero_offset;
        if delta == 0 {
            return Err(CalibrationError::DegenerateCalibration);
        }

        self.scale_factor = delta as f32 / known_grams;
        self.calibrated = true;
        Ok(())
    }

    /// Calibrated mass equivalent of `raw`, in grams
    pub fn grams(&self, raw: RawSample) -> f32 {
        (raw - self.zero_offset) as f32 / self.scale_factor
    }

    /// Calibrated force for `raw`, in newtons
    pub fn convert(&self, raw: RawSample) -> f32 {
        self.grams(raw) * STANDARD_GRAVITY / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calibrated_at(zero: i32, raw: RawSample, grams: f32) -> Calibration {
        let mut cal = Calibration::default();
        cal.tare(zero);
        cal.calibrate(raw, grams).unwrap();
        cal
    }

    #[test]
    fn defaults_come_from_compiled_constants() {
        let cal = Calibration::default();
        assert_eq!(cal.zero_offset(), DEFAULT_ZERO_OFFSET);
        assert_eq!(cal.scale_factor(), DEFAULT_SCALE_FACTOR);
        assert!(!cal.is_calibrated());
    }

    #[test]
    fn convert_is_zero_at_the_offset() {
        let mut cal = Calibration::default();
        cal.tare(44_300);
        assert_eq!(cal.convert(44_300), 0.0);

        // Holds for any offset, including negative raws
        cal.tare(-1_234);
        assert_eq!(cal.convert(-1_234), 0.0);
    }

    #[test]
    fn reference_rig_example() {
        // 500 g check weight observed at 46600 against a 44300 zero
        let cal = calibrated_at(44_300, 46_600, 500.0);
        assert!((cal.scale_factor() - 4.6).abs() < 1e-6);

        // A pull reading of 48760 is (48760-44300)/4.6 grams
        let grams = cal.grams(48_760);
        assert!((grams - 969.5652).abs() < 1e-3);

        let newtons = cal.convert(48_760);
        assert!((newtons - 9.5082).abs() < 1e-3);
    }

    #[test]
    fn calibration_round_trips_the_reference_weight() {
        let cal = calibrated_at(10_000, 12_300, 750.0);
        assert!((cal.grams(12_300) - 750.0).abs() < 1e-3);
    }

    #[test]
    fn non_positive_weight_is_rejected_without_mutation() {
        let mut cal = Calibration::default();
        let before = cal;

        assert_eq!(
            cal.calibrate(46_600, 0.0),
            Err(CalibrationError::InvalidReference)
        );
        assert_eq!(
            cal.calibrate(46_600, -5.0),
            Err(CalibrationError::InvalidReference)
        );
        assert_eq!(
            cal.calibrate(46_600, f32::NAN),
            Err(CalibrationError::InvalidReference)
        );
        assert_eq!(cal, before);
    }

    #[test]
    fn zero_delta_is_rejected_without_mutation() {
        let mut cal = Calibration::default();
        cal.tare(44_300);
        let before = cal;

        assert_eq!(
            cal.calibrate(44_300, 500.0),
            Err(CalibrationError::DegenerateCalibration)
        );
        assert_eq!(cal, before);
    }

    #[test]
    fn tare_keeps_the_scale_factor() {
        let mut cal = calibrated_at(44_300, 46_600, 500.0);
        cal.tare(44_800);
        assert!((cal.scale_factor() - 4.6).abs() < 1e-6);
        assert_eq!(cal.convert(44_800), 0.0);
        assert!(cal.is_calibrated());
    }

    #[test]
    fn negative_scale_factor_converts_tension_readings() {
        // The compiled-in factor is negative: raws below the offset mean
        // increasing load on that wiring
        let cal = Calibration::default();
        let grams = cal.grams(DEFAULT_ZERO_OFFSET - 4_478);
        assert!(grams > 999.0 && grams < 1001.0);
    }
}
