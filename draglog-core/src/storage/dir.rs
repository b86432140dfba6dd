//! Directory-backed storage
//!
//! Maps the flat file namespace onto one host directory. This is what the
//! simulator and the integration tests run against; on the rig itself the
//! same trait sits over the SD card driver.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::Storage;
use crate::errors::StorageError;

// Macro for optional logging
#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

/// Storage over a single existing directory
#[derive(Debug, Clone)]
pub struct DirStorage {
    root: PathBuf,
}

impl DirStorage {
    /// Bind to `root`, failing if it is not a mounted directory
    ///
    /// The directory is deliberately not created here: an absent mount
    /// point at boot means the medium is missing, and silently logging
    /// into a fresh local directory would hide that.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        if !root.is_dir() {
            log_warn!("storage root {:?} is not a directory", root);
            return Err(StorageError::Unavailable);
        }
        Ok(Self { root })
    }

    /// Directory this storage writes into
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl Storage for DirStorage {
    fn exists(&self, name: &str) -> Result<bool, StorageError> {
        match fs::metadata(self.path_of(name)) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => {
                log_warn!("stat {} failed: {}", name, e);
                Err(StorageError::Unavailable)
            }
        }
    }

    fn create(&mut self, name: &str, contents: &str) -> Result<(), StorageError> {
        fs::write(self.path_of(name), contents).map_err(|e| {
            log_warn!("create {} failed: {}", name, e);
            StorageError::WriteFailed
        })
    }

    fn append(&mut self, name: &str, data: &str) -> Result<(), StorageError> {
        // Open, write, close on every record so an abrupt power cut
        // costs at most the sample in flight
        let mut file = OpenOptions::new()
            .append(true)
            .open(self.path_of(name))
            .map_err(|e| {
                log_warn!("open {} for append failed: {}", name, e);
                StorageError::WriteFailed
            })?;
        file.write_all(data.as_bytes()).map_err(|e| {
            log_warn!("append to {} failed: {}", name, e);
            StorageError::WriteFailed
        })
    }
}
