//! Operator command parsing
//!
//! One newline-terminated line is one command. Parsing is a pure function
//! from text to a typed [`Command`], decoupled from whatever transport the
//! console runs over, so the grammar is testable without a serial port.
//!
//! Grammar (keywords case-insensitive):
//!
//! ```text
//! tare                re-zero at the current raw reading
//! calibrate <grams>   derive scale factor from a known weight
//! reset               close the run and open the next numbered file
//! ```
//!
//! Everything after the `calibrate` keyword is taken as the weight
//! argument, mirroring how the rig's operators already type it.

use thiserror_no_std::Error;

/// A parsed operator command
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Capture the current raw reading as the zero point
    Tare,
    /// Derive a new scale factor from a reference weight in grams
    Calibrate {
        /// Reference weight on the cell, in grams
        grams: f32,
    },
    /// Rotate to the next numbered log file
    Reset,
}

/// Why a console line was rejected
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Line does not start with a known keyword
    #[error("unrecognized command")]
    Unknown,

    /// `calibrate` argument was missing, unparsable, or not a positive
    /// finite number
    #[error("reference weight must be a positive number of grams")]
    InvalidReference,
}

#[cfg(feature = "defmt")]
impl defmt::Format for ParseError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Unknown => defmt::write!(fmt, "unrecognized command"),
            Self::InvalidReference => defmt::write!(fmt, "invalid reference weight"),
        }
    }
}

/// Parse one console line into a [`Command`]
///
/// The weight guard here is the console-side half of the check; the
/// calibration state applies the same rule again so direct API callers
/// get identical behavior.
pub fn parse_line(line: &str) -> Result<Command, ParseError> {
    let line = line.trim();

    if line.eq_ignore_ascii_case("tare") {
        return Ok(Command::Tare);
    }
    if line.eq_ignore_ascii_case("reset") {
        return Ok(Command::Reset);
    }

    let mut parts = line.splitn(2, |c: char| c.is_whitespace());
    let keyword = parts.next().unwrap_or("");
    if keyword.eq_ignore_ascii_case("calibrate") {
        let grams = parts
            .next()
            .map(str::trim)
            .and_then(|arg| arg.parse::<f32>().ok())
            .ok_or(ParseError::InvalidReference)?;
        if !grams.is_finite() || grams <= 0.0 {
            return Err(ParseError::InvalidReference);
        }
        return Ok(Command::Calibrate { grams });
    }

    Err(ParseError::Unknown)
}

/// Byte-fed accumulator turning a console stream into complete lines
///
/// A UART console implementation feeds every received byte through
/// [`push`](LineBuffer::push) and gets a borrowed line back when the
/// terminator arrives. Carriage returns are dropped, so CRLF terminals
/// work unmodified. A line longer than the buffer is discarded whole; no
/// valid command comes close to the capacity.
#[derive(Debug)]
pub struct LineBuffer<const N: usize> {
    buf: heapless::Vec<u8, N>,
    overflow: bool,
    ready: bool,
}

impl<const N: usize> LineBuffer<N> {
    /// Empty buffer
    pub const fn new() -> Self {
        Self {
            buf: heapless::Vec::new(),
            overflow: false,
            ready: false,
        }
    }

    /// Feed one byte; returns the completed line when `byte` is `\n`
    ///
    /// The returned slice stays valid until the next call, which recycles
    /// the buffer.
    pub fn push(&mut self, byte: u8) -> Option<&str> {
        if self.ready {
            self.buf.clear();
            self.ready = false;
        }

        match byte {
            b'\n' => {
                if self.overflow {
                    self.buf.clear();
                    self.overflow = false;
                    return None;
                }
                self.ready = true;
                core::str::from_utf8(&self.buf).ok()
            }
            b'\r' => None,
            _ => {
                if self.buf.push(byte).is_err() {
                    self.overflow = true;
                }
                None
            }
        }
    }
}

impl<const N: usize> Default for LineBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
