//! HX711 load-cell amplifier driver
//!
//! Bit-bangs the two-wire synchronous protocol: the chip holds the data
//! line high while converting and drops it when a sample is ready; the
//! host then issues 24 clock pulses, sampling one bit per pulse, MSB
//! first. One to three extra pulses select the channel and gain used for
//! the *next* conversion.
//!
//! ## Timing
//!
//! Clock edges are separated by [`CLOCK_SETTLE_US`]. The read loop must
//! not be preempted: a clock held high longer than 60 µs powers the chip
//! down mid-sample. On the single-threaded rig this needs no locking,
//! only the absence of interrupts around [`Hx711::read_raw`].
//!
//! ## Readiness
//!
//! The wait for the ready line is bounded by [`READY_TIMEOUT_MS`] so a
//! disconnected cell yields [`SensorError::Timeout`] instead of a hung
//! rig.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::constants::{CLOCK_SETTLE_US, READY_POLL_INTERVAL_US, READY_TIMEOUT_MS, SAMPLE_BITS};
use crate::errors::SensorError;
use crate::sample::RawSample;
use crate::traits::LoadCell;

/// Channel and gain selection, encoded as the number of extra clock
/// pulses after the 24 data bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Gain {
    /// Channel A, gain 128. Power-up default and the rig's wiring
    A128 = 1,
    /// Channel B, gain 32
    B32 = 2,
    /// Channel A, gain 64
    A64 = 3,
}

impl Gain {
    fn extra_pulses(self) -> u8 {
        self as u8
    }
}

/// Driver over a data-in pin, a clock-out pin, and a delay provider
pub struct Hx711<Dt, Sck, D> {
    dt: Dt,
    sck: Sck,
    delay: D,
    gain: Gain,
}

impl<Dt, Sck, D> Hx711<Dt, Sck, D>
where
    Dt: InputPin,
    Sck: OutputPin,
    D: DelayNs,
{
    /// Take ownership of the pins and drive the clock line low
    ///
    /// The chip powers down whenever the clock is held high, so the line
    /// must be low before the first conversion can start.
    pub fn new(dt: Dt, sck: Sck, delay: D) -> Result<Self, SensorError> {
        let mut hx = Self {
            dt,
            sck,
            delay,
            gain: Gain::A128,
        };
        hx.sck.set_low().map_err(|_| SensorError::Pin)?;
        Ok(hx)
    }

    /// Select the channel/gain pulsed out after each read
    ///
    /// Takes effect one conversion late: the pulses at the end of the
    /// next read configure the one after it.
    pub fn set_gain(&mut self, gain: Gain) {
        self.gain = gain;
    }

    /// Currently selected channel/gain
    pub fn gain(&self) -> Gain {
        self.gain
    }

    /// Block until one conversion is available and decode it
    pub fn read_raw(&mut self) -> Result<RawSample, SensorError> {
        self.wait_ready()?;

        let mut value: u32 = 0;
        for _ in 0..SAMPLE_BITS {
            // Bits arrive MSB first
            value = (value << 1) | self.read_bit()? as u32;
        }

        for _ in 0..self.gain.extra_pulses() {
            self.pulse()?;
        }

        Ok(sign_extend_24(value))
    }

    fn wait_ready(&mut self) -> Result<(), SensorError> {
        let timeout_us = READY_TIMEOUT_MS * 1_000;
        let mut waited_us: u32 = 0;
        loop {
            if self.dt.is_low().map_err(|_| SensorError::Pin)? {
                return Ok(());
            }
            if waited_us >= timeout_us {
                return Err(SensorError::Timeout {
                    waited_ms: waited_us / 1_000,
                });
            }
            self.delay.delay_us(READY_POLL_INTERVAL_US);
            waited_us += READY_POLL_INTERVAL_US;
        }
    }

    fn read_bit(&mut self) -> Result<bool, SensorError> {
        self.sck.set_high().map_err(|_| SensorError::Pin)?;
        self.delay.delay_us(CLOCK_SETTLE_US);
        let bit = self.dt.is_high().map_err(|_| SensorError::Pin)?;
        self.sck.set_low().map_err(|_| SensorError::Pin)?;
        self.delay.delay_us(CLOCK_SETTLE_US);
        Ok(bit)
    }

    fn pulse(&mut self) -> Result<(), SensorError> {
        self.sck.set_high().map_err(|_| SensorError::Pin)?;
        self.delay.delay_us(CLOCK_SETTLE_US);
        self.sck.set_low().map_err(|_| SensorError::Pin)?;
        self.delay.delay_us(CLOCK_SETTLE_US);
        Ok(())
    }
}

impl<Dt, Sck, D> LoadCell for Hx711<Dt, Sck, D>
where
    Dt: InputPin,
    Sck: OutputPin,
    D: DelayNs,
{
    fn read_raw(&mut self) -> Result<RawSample, SensorError> {
        Hx711::read_raw(self)
    }
}

/// Widen a 24-bit two's-complement pattern to a full `i32`
///
/// Bits above 23 in the input are ignored.
pub const fn sign_extend_24(bits: u32) -> RawSample {
    let bits = bits & 0x00FF_FFFF;
    if bits & 0x0080_0000 != 0 {
        (bits | 0xFF00_0000) as i32
    } else {
        bits as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::{RAW_MAX, RAW_MIN};

    use core::convert::Infallible;
    use std::cell::RefCell;
    use std::rc::Rc;

    // --- Sign extension ---

    #[test]
    fn sign_extension_edges() {
        assert_eq!(sign_extend_24(0x00_0000), 0);
        assert_eq!(sign_extend_24(0x00_0001), 1);
        assert_eq!(sign_extend_24(0x7F_FFFF), RAW_MAX);
        assert_eq!(sign_extend_24(0x80_0000), RAW_MIN);
        assert_eq!(sign_extend_24(0xFF_FFFF), -1);
    }

    #[test]
    fn sign_extension_ignores_stray_high_bits() {
        assert_eq!(sign_extend_24(0xAB00_0001), 1);
    }

    mod props {
        use super::super::sign_extend_24;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn matches_shift_reference(bits in 0u32..0x100_0000) {
                // Shifting through the sign bit is the textbook widening
                let expected = ((bits << 8) as i32) >> 8;
                prop_assert_eq!(sign_extend_24(bits), expected);
            }
        }
    }

    // --- Wire-level behavior, against a scripted chip ---

    struct ChipState {
        /// 24-bit pattern the chip will shift out
        raw_bits: u32,
        /// Rising clock edges seen so far
        clocks: u32,
        /// Whether a conversion is waiting
        ready: bool,
    }

    #[derive(Clone)]
    struct Chip(Rc<RefCell<ChipState>>);

    impl Chip {
        fn new(raw_bits: u32, ready: bool) -> Self {
            Self(Rc::new(RefCell::new(ChipState {
                raw_bits,
                clocks: 0,
                ready,
            })))
        }

        fn clocks(&self) -> u32 {
            self.0.borrow().clocks
        }
    }

    struct DtPin(Chip);
    struct SckPin(Chip);
    struct NoDelay;

    impl embedded_hal::digital::ErrorType for DtPin {
        type Error = Infallible;
    }

    impl InputPin for DtPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            let state = self.0 .0.borrow();
            let level = if state.clocks == 0 {
                // Idle: high means still converting
                !state.ready
            } else if state.clocks <= 24 {
                // Bit for rising edge k is bit 24-k of the pattern
                (state.raw_bits >> (24 - state.clocks)) & 1 == 1
            } else {
                // After the data bits the chip raises the line again
                true
            };
            Ok(level)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            self.is_high().map(|h| !h)
        }
    }

    impl embedded_hal::digital::ErrorType for SckPin {
        type Error = Infallible;
    }

    impl OutputPin for SckPin {
        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.0 .0.borrow_mut().clocks += 1;
            Ok(())
        }

        fn set_low(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn driver_for(chip: &Chip) -> Hx711<DtPin, SckPin, NoDelay> {
        Hx711::new(DtPin(chip.clone()), SckPin(chip.clone()), NoDelay).unwrap()
    }

    #[test]
    fn reads_a_positive_sample() {
        let chip = Chip::new(0x00_0001, true);
        let mut hx = driver_for(&chip);
        assert_eq!(hx.read_raw(), Ok(1));
    }

    #[test]
    fn reads_a_negative_sample() {
        let chip = Chip::new(0x80_0000, true);
        let mut hx = driver_for(&chip);
        assert_eq!(hx.read_raw(), Ok(RAW_MIN));
    }

    #[test]
    fn clocks_exactly_24_bits_plus_gain_pulses() {
        let chip = Chip::new(0x12_3456, true);
        let mut hx = driver_for(&chip);
        hx.read_raw().unwrap();
        // A128 is one pulse on top of the data bits
        assert_eq!(chip.clocks(), 25);

        for (gain, total) in [(Gain::B32, 26), (Gain::A64, 27)] {
            let chip = Chip::new(0, true);
            let mut hx = driver_for(&chip);
            hx.set_gain(gain);
            hx.read_raw().unwrap();
            assert_eq!(chip.clocks(), total);
        }
    }

    #[test]
    fn decoded_value_matches_the_wire_pattern() {
        let chip = Chip::new(0x12_3456, true);
        let mut hx = driver_for(&chip);
        assert_eq!(hx.read_raw(), Ok(0x12_3456));
    }

    #[test]
    fn never_ready_times_out() {
        let chip = Chip::new(0, false);
        let mut hx = driver_for(&chip);
        assert_eq!(
            hx.read_raw(),
            Err(SensorError::Timeout {
                waited_ms: READY_TIMEOUT_MS
            })
        );
        // No data bits were clocked out
        assert_eq!(chip.clocks(), 0);
    }
}
