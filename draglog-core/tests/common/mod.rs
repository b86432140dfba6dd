//! Shared test doubles for the run-lifecycle integration tests
//!
//! A scripted load cell, a self-advancing clock, and a console that queues
//! operator lines and records notices, so whole rig sessions run
//! deterministically against real directories.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use draglog_core::{Console, LoadCell, Notice, RawSample, SensorError, TimeSource, Timestamp};

/// Load cell that replays a fixed script of readings
pub struct ScriptedCell {
    readings: VecDeque<Result<RawSample, SensorError>>,
}

impl ScriptedCell {
    /// Cell that produces `raws` in order, then times out
    pub fn new(raws: &[RawSample]) -> Self {
        Self {
            readings: raws.iter().map(|&r| Ok(r)).collect(),
        }
    }

    /// Cell with explicit per-read outcomes
    pub fn scripted(script: &[Result<RawSample, SensorError>]) -> Self {
        Self {
            readings: script.iter().copied().collect(),
        }
    }
}

impl LoadCell for ScriptedCell {
    fn read_raw(&mut self) -> Result<RawSample, SensorError> {
        self.readings
            .pop_front()
            .unwrap_or(Err(SensorError::Timeout { waited_ms: 0 }))
    }
}

/// Clock that steps forward on every sample, like a rig keeping cadence
pub struct StepClock {
    next: core::cell::Cell<Timestamp>,
    step: u64,
}

impl StepClock {
    /// First `now()` returns `start`; each later call adds `step_ms`
    pub fn new(start: Timestamp, step_ms: u64) -> Self {
        Self {
            next: core::cell::Cell::new(start),
            step: step_ms,
        }
    }
}

impl TimeSource for StepClock {
    fn now(&self) -> Timestamp {
        let now = self.next.get();
        self.next.set(now + self.step);
        now
    }
}

/// Console double: operator lines in, recorded notices out
#[derive(Default)]
pub struct RecordingConsole {
    lines: VecDeque<String>,
    current: Option<String>,
    /// Every notice the rig has emitted, in order
    pub notices: Vec<Notice>,
}

impl RecordingConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one operator line for the next poll
    pub fn queue(&mut self, line: &str) {
        self.lines.push_back(line.to_string());
    }

    /// Whether a notice satisfying `pred` was emitted
    pub fn saw(&self, pred: impl Fn(&Notice) -> bool) -> bool {
        self.notices.iter().any(|n| pred(n))
    }
}

impl Console for RecordingConsole {
    fn poll_line(&mut self) -> Option<&str> {
        self.current = self.lines.pop_front();
        self.current.as_deref()
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

/// Contents of `drag_log_<index>.txt` under `dir`
pub fn read_run(dir: &Path, index: u32) -> String {
    fs::read_to_string(dir.join(format!("drag_log_{}.txt", index))).unwrap()
}

/// Contents of the calibration audit record under `dir`
pub fn read_calibration(dir: &Path) -> String {
    fs::read_to_string(dir.join("calibration.txt")).unwrap()
}
