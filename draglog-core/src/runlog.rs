//! Log run lifecycle: naming, rotation, appends, calibration record
//!
//! One test run is one `drag_log_<N>.txt` file. The scan at boot picks the
//! lowest index with no file on the medium, so prior runs are never
//! overwritten no matter how often the rig power-cycles; `reset` advances
//! to the next unused index from the current one, so indices within a boot
//! only go up.
//!
//! Records are appended through [`Storage`], which opens and closes the
//! medium per write. A run file is therefore complete up to the last
//! sample even if the battery dies mid-pull.

use core::fmt::Write;

use crate::calibration::Calibration;
use crate::constants::{CALIBRATION_FILE, FIRST_RUN_INDEX, RUN_FILE_PREFIX, RUN_FILE_SUFFIX, RUN_HEADER};
use crate::errors::StorageError;
use crate::sample::ForceSample;
use crate::storage::Storage;

/// Run file name, `drag_log_` + u32 + `.txt` at most
type FileName = heapless::String<24>;

/// Record line buffer, sized for the widest f32 rendering
type Record = heapless::String<96>;

fn run_file_name(index: u32) -> FileName {
    let mut name = FileName::new();
    // Prefix (9) + ten digits + suffix (4) fits the capacity for any u32
    let _ = write!(name, "{}{}{}", RUN_FILE_PREFIX, index, RUN_FILE_SUFFIX);
    name
}

/// The open log run and the storage it lives on
#[derive(Debug)]
pub struct RunLog<S: Storage> {
    storage: S,
    index: u32,
    name: FileName,
}

impl<S: Storage> RunLog<S> {
    /// Scan for the lowest unused run index and open it
    ///
    /// Callers at boot treat any error here as fatal; there is no
    /// meaningful mode without a log file.
    pub fn open(mut storage: S) -> Result<Self, StorageError> {
        let (index, name) = Self::scan_unused(&storage, FIRST_RUN_INDEX)?;
        storage.create(&name, RUN_HEADER)?;
        Ok(Self {
            storage,
            index,
            name,
        })
    }

    /// Index of the run currently open for writing
    pub fn index(&self) -> u32 {
        self.index
    }

    /// File name of the run currently open for writing
    pub fn file_name(&self) -> &str {
        &self.name
    }

    /// Read access to the underlying storage
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Mutable access to the underlying storage
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Append one sample record to the open run
    pub fn append(&mut self, sample: &ForceSample) -> Result<(), StorageError> {
        let mut record = Record::new();
        write!(
            record,
            "{}\t{}\t{:.3}\n",
            sample.timestamp_ms, sample.raw, sample.force_newtons
        )
        .map_err(|_| StorageError::WriteFailed)?;
        self.storage.append(&self.name, &record)
    }

    /// Close the current run and open the next unused index above it
    ///
    /// On failure the current run stays open and the index stays put, so
    /// a later `reset` retries the same candidate.
    pub fn rotate(&mut self) -> Result<(), StorageError> {
        let (index, name) = Self::scan_unused(&self.storage, self.index + 1)?;
        self.storage.create(&name, RUN_HEADER)?;
        self.index = index;
        self.name = name;
        Ok(())
    }

    /// Overwrite the calibration audit record
    ///
    /// Always writes the tare line; the scale line appears once a
    /// measured calibration has replaced the compiled-in factor.
    pub fn write_calibration_record(&mut self, cal: &Calibration) -> Result<(), StorageError> {
        let mut record = Record::new();
        write!(record, "Tare: {}\n", cal.zero_offset()).map_err(|_| StorageError::WriteFailed)?;
        if cal.is_calibrated() {
            write!(record, "ScaleFactor: {:.5}\n", cal.scale_factor())
                .map_err(|_| StorageError::WriteFailed)?;
        }
        self.storage.create(CALIBRATION_FILE, &record)
    }

    fn scan_unused(storage: &S, from: u32) -> Result<(u32, FileName), StorageError> {
        let mut index = from;
        loop {
            let name = run_file_name(index);
            if !storage.exists(&name)? {
                return Ok((index, name));
            }
            index += 1;
        }
    }
}
