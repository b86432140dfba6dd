//! DragLog host simulator
//!
//! Drives the acquisition core against a synthetic load cell and a
//! directory-backed store, so the whole command and log lifecycle can be
//! exercised on a workstation without rig hardware. The cell plays a
//! repeating pull: a ramp up to roughly a kilogram of drag, a ramp back
//! down, then a quiet stretch, with a little noise on top.
//!
//! Usage:
//!
//! ```text
//! draglog-sim [LOG_DIR] [--log-level LEVEL]
//! ```
//!
//! `LOG_DIR` must already exist (an absent directory stands in for an
//! unmounted card and is fatal, as on the rig). Commands are read from
//! stdin: `tare`, `calibrate <grams>`, `reset`.

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use embedded_hal::delay::DelayNs;
use log::LevelFilter;

use draglog_core::constants::DEFAULT_ZERO_OFFSET;
use draglog_core::storage::DirStorage;
use draglog_core::time::UptimeClock;
use draglog_core::{Calibration, Console, LoadCell, Notice, RawSample, Rig, SensorError};

/// Synthetic load cell: repeating pull ramp with deterministic jitter
struct SyntheticCell {
    step: u32,
    seed: u32,
}

impl SyntheticCell {
    fn new() -> Self {
        Self { step: 0, seed: 42 }
    }

    fn noise(&mut self) -> i32 {
        // Same LCG the core's generators use; ±8 counts of jitter
        self.seed = self.seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        ((self.seed >> 28) as i32) - 8
    }
}

impl LoadCell for SyntheticCell {
    fn read_raw(&mut self) -> Result<RawSample, SensorError> {
        // 100-sample period: 40 up, 40 down, 20 quiet. Peak is ~4500
        // counts, about a kilogram on the compiled-in scale.
        let phase = self.step % 100;
        self.step = self.step.wrapping_add(1);

        let pull = match phase {
            0..=39 => phase * 115,
            40..=79 => (79 - phase) * 115,
            _ => 0,
        };

        Ok(DEFAULT_ZERO_OFFSET + pull as i32 + self.noise())
    }
}

/// Terminal console: stdin lines in, rendered notices out
struct TermConsole {
    rx: Receiver<String>,
    current: Option<String>,
}

impl TermConsole {
    fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        // Reader thread, because stdin has no non-blocking line API;
        // the channel turns poll_line into a try_recv
        thread::spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            }
        });
        Self { rx, current: None }
    }
}

impl Console for TermConsole {
    fn poll_line(&mut self) -> Option<&str> {
        self.current = self.rx.try_recv().ok();
        self.current.as_deref()
    }

    fn notify(&mut self, notice: Notice) {
        match notice {
            Notice::Reading {
                raw,
                grams,
                newtons,
            } => {
                println!("raw {:>8}   {:>9.1} g   {:>8.3} N", raw, grams, newtons);
            }
            Notice::RunOpened { index } => {
                println!("--- logging to drag_log_{}.txt ---", index);
            }
            Notice::TareSet { zero_offset } => {
                println!("tare set at raw {}", zero_offset);
            }
            Notice::Calibrated { scale_factor } => {
                println!("scale factor {:.5} counts/g", scale_factor);
            }
            Notice::CommandRejected(e) => {
                println!("rejected: {} (tare | calibrate <grams> | reset)", e);
            }
            Notice::Fault(e) => log::warn!("{}", e),
        }
    }
}

/// Thread-sleep delay for the fixed sample interval
struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(ns.into()));
    }
}

fn main() {
    let (dir, log_level) = parse_args();

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    println!("DragLog simulator");
    println!("=================");
    println!("run files under {}", dir.display());
    println!("commands: tare | calibrate <grams> | reset");
    println!();

    let storage = match DirStorage::open(&dir) {
        Ok(storage) => storage,
        Err(e) => {
            log::error!("storage root {}: {}", dir.display(), e);
            process::exit(1);
        }
    };

    let mut rig = match Rig::boot(
        SyntheticCell::new(),
        storage,
        UptimeClock::new(),
        TermConsole::new(),
        Calibration::default(),
    ) {
        Ok(rig) => rig,
        Err(e) => {
            // No run file, no test: halt instead of sampling into the void
            log::error!("boot failed: {}", e);
            process::exit(1);
        }
    };

    rig.run(&mut StdDelay)
}

/// Parse `[LOG_DIR] [--log-level LEVEL]`; the directory defaults to `.`
fn parse_args() -> (PathBuf, LevelFilter) {
    let mut dir = PathBuf::from(".");
    let mut level = LevelFilter::Info;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut i = 0;
    while i < args.len() {
        if args[i] == "--log-level" && i + 1 < args.len() {
            level = match args[i + 1].to_uppercase().as_str() {
                "OFF" => LevelFilter::Off,
                "ERROR" => LevelFilter::Error,
                "WARN" => LevelFilter::Warn,
                "INFO" => LevelFilter::Info,
                "DEBUG" => LevelFilter::Debug,
                "TRACE" => LevelFilter::Trace,
                other => {
                    eprintln!("Unknown log level: {}. Using INFO", other);
                    LevelFilter::Info
                }
            };
            i += 2;
        } else {
            dir = PathBuf::from(&args[i]);
            i += 1;
        }
    }

    (dir, level)
}
