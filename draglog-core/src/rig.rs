//! The acquisition loop: sample, convert, log, obey the operator
//!
//! [`Rig`] owns every collaborator — load cell, run log, clock, console,
//! calibration — and runs the single steady-state cycle the rig repeats
//! until power is cut:
//!
//! ```text
//! read raw → convert → echo reading → append to run → poll console → sleep
//! ```
//!
//! ## Fault policy
//!
//! Boot is the only fatal point: without a run file the test data has
//! nowhere to go, so [`Rig::boot`] propagates storage failure and the
//! caller halts. Everything after that is best effort. A sensor timeout
//! skips one sample, a failed append drops one record, a bad command does
//! nothing; each is reported through the console as a [`Notice`] and the
//! next cycle proceeds. There is no retry and no queueing — on slow
//! storage the cadence degrades, it never buffers.
//!
//! [`cycle`](Rig::cycle) is public so tests and host frontends can drive
//! one iteration at a time; [`run`](Rig::run) is the firmware entry point
//! that never returns.

use embedded_hal::delay::DelayNs;

use crate::calibration::Calibration;
use crate::command::{parse_line, Command};
use crate::constants::SAMPLE_INTERVAL_MS;
use crate::errors::{RigError, RigResult, StorageError};
use crate::runlog::RunLog;
use crate::sample::ForceSample;
use crate::storage::Storage;
use crate::time::TimeSource;
use crate::traits::{Console, LoadCell, Notice};

/// The acquisition loop over its injected collaborators
pub struct Rig<C, S: Storage, K, O> {
    cell: C,
    runlog: RunLog<S>,
    clock: K,
    console: O,
    cal: Calibration,
}

impl<C, S, K, O> Rig<C, S, K, O>
where
    C: LoadCell,
    S: Storage,
    K: TimeSource,
    O: Console,
{
    /// Open the first run and assemble the loop
    ///
    /// Scans `storage` for the lowest unused run file and writes its
    /// header. Failure here is fatal by design: the caller should halt
    /// rather than run an unlogged test.
    pub fn boot(
        cell: C,
        storage: S,
        clock: K,
        console: O,
        cal: Calibration,
    ) -> Result<Self, StorageError> {
        let runlog = RunLog::open(storage)?;
        let mut rig = Self {
            cell,
            runlog,
            clock,
            console,
            cal,
        };
        rig.console.notify(Notice::RunOpened {
            index: rig.runlog.index(),
        });
        Ok(rig)
    }

    /// Run one steady-state iteration
    ///
    /// Takes a sample, echoes it, appends it to the open run, then polls
    /// the console for one command and dispatches it. Every fault is
    /// reported through the console before this returns; the returned
    /// error is the first fault of the iteration, so hosts can count bad
    /// cycles. The loop continues regardless of the outcome.
    pub fn cycle(&mut self) -> RigResult<()> {
        let sampled = self.sample_once();
        let commanded = self.poll_command();
        sampled.and(commanded)
    }

    /// Cycle and sleep forever at the nominal interval
    ///
    /// The sleep is fixed at [`SAMPLE_INTERVAL_MS`]; sample and storage
    /// time come on top, so the true period drifts by however long the
    /// cycle took. Accepted: cadence is advisory, durability is not.
    pub fn run(&mut self, delay: &mut impl DelayNs) -> ! {
        loop {
            let _ = self.cycle();
            delay.delay_ms(SAMPLE_INTERVAL_MS);
        }
    }

    /// Calibration currently applied to conversions
    pub fn calibration(&self) -> &Calibration {
        &self.cal
    }

    /// The open run log
    pub fn runlog(&self) -> &RunLog<S> {
        &self.runlog
    }

    /// Mutable access to the open run log
    pub fn runlog_mut(&mut self) -> &mut RunLog<S> {
        &mut self.runlog
    }

    /// The console this rig reports through
    pub fn console(&self) -> &O {
        &self.console
    }

    /// Mutable access to the console
    pub fn console_mut(&mut self) -> &mut O {
        &mut self.console
    }

    fn sample_once(&mut self) -> RigResult<()> {
        let raw = match self.cell.read_raw() {
            Ok(raw) => raw,
            Err(e) => return self.report(e.into()),
        };

        let newtons = self.cal.convert(raw);
        self.console.notify(Notice::Reading {
            raw,
            grams: self.cal.grams(raw),
            newtons,
        });

        let sample = ForceSample {
            timestamp_ms: self.clock.now(),
            raw,
            force_newtons: newtons,
        };
        if let Err(e) = self.runlog.append(&sample) {
            return self.report(e.into());
        }
        Ok(())
    }

    fn poll_command(&mut self) -> RigResult<()> {
        // Parse inside the match so the borrow of the console line ends
        // before dispatch needs the console back for notices
        let parsed = match self.console.poll_line() {
            Some(line) => parse_line(line),
            None => return Ok(()),
        };

        match parsed {
            Ok(cmd) => self.dispatch(cmd),
            Err(e) => {
                self.console.notify(Notice::CommandRejected(e));
                Ok(())
            }
        }
    }

    fn dispatch(&mut self, cmd: Command) -> RigResult<()> {
        match cmd {
            Command::Tare => {
                let raw = match self.cell.read_raw() {
                    Ok(raw) => raw,
                    Err(e) => return self.report(e.into()),
                };
                self.cal.tare(raw);
                self.console.notify(Notice::TareSet { zero_offset: raw });
                self.persist_calibration()
            }
            Command::Calibrate { grams } => {
                let raw = match self.cell.read_raw() {
                    Ok(raw) => raw,
                    Err(e) => return self.report(e.into()),
                };
                match self.cal.calibrate(raw, grams) {
                    Ok(()) => {
                        self.console.notify(Notice::Calibrated {
                            scale_factor: self.cal.scale_factor(),
                        });
                        self.persist_calibration()
                    }
                    Err(e) => self.report(e.into()),
                }
            }
            Command::Reset => match self.runlog.rotate() {
                Ok(()) => {
                    self.console.notify(Notice::RunOpened {
                        index: self.runlog.index(),
                    });
                    Ok(())
                }
                Err(e) => self.report(e.into()),
            },
        }
    }

    /// Overwrite the audit record; the in-memory state is already updated,
    /// so a failure here costs the record, not the calibration
    fn persist_calibration(&mut self) -> RigResult<()> {
        if let Err(e) = self.runlog.write_calibration_record(&self.cal) {
            return self.report(e.into());
        }
        Ok(())
    }

    fn report(&mut self, err: RigError) -> RigResult<()> {
        self.console.notify(Notice::Fault(err));
        Err(err)
    }
}
