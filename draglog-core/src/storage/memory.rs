//! In-memory storage for testing and replay
//!
//! Behaves like a tiny flat filesystem and can be told to fail in the
//! ways the error taxonomy cares about, so the boot-fatal and
//! dropped-sample paths are exercised deterministically instead of by
//! yanking real media.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use super::Storage;
use crate::errors::StorageError;

/// Growable in-memory file set with fault injection
#[derive(Debug, Default)]
pub struct MemStorage {
    files: Vec<(String, String)>,
    unavailable: bool,
    fail_creates: bool,
    fail_appends: bool,
}

impl MemStorage {
    /// Empty storage that accepts everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail with [`StorageError::Unavailable`],
    /// as an unmounted medium would
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    /// Make `create` fail with [`StorageError::WriteFailed`]
    pub fn fail_creates(&mut self, fail: bool) {
        self.fail_creates = fail;
    }

    /// Make `append` fail with [`StorageError::WriteFailed`]
    pub fn fail_appends(&mut self, fail: bool) {
        self.fail_appends = fail;
    }

    /// Full text of a stored file, if present
    pub fn contents(&self, name: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, text)| text.as_str())
    }

    /// Names of all stored files, in creation order
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|(n, _)| n.as_str())
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if self.unavailable {
            Err(StorageError::Unavailable)
        } else {
            Ok(())
        }
    }
}

impl Storage for MemStorage {
    fn exists(&self, name: &str) -> Result<bool, StorageError> {
        self.check_available()?;
        Ok(self.files.iter().any(|(n, _)| n == name))
    }

    fn create(&mut self, name: &str, contents: &str) -> Result<(), StorageError> {
        self.check_available()?;
        if self.fail_creates {
            return Err(StorageError::WriteFailed);
        }
        match self.files.iter_mut().find(|(n, _)| n == name) {
            Some((_, text)) => *text = contents.to_string(),
            None => self.files.push((name.to_string(), contents.to_string())),
        }
        Ok(())
    }

    fn append(&mut self, name: &str, data: &str) -> Result<(), StorageError> {
        self.check_available()?;
        if self.fail_appends {
            return Err(StorageError::WriteFailed);
        }
        match self.files.iter_mut().find(|(n, _)| n == name) {
            Some((_, text)) => {
                text.push_str(data);
                Ok(())
            }
            None => Err(StorageError::WriteFailed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_grow_by_appending() {
        let mut storage = MemStorage::new();
        storage.create("run.txt", "header\n").unwrap();
        storage.append("run.txt", "line\n").unwrap();
        assert_eq!(storage.contents("run.txt"), Some("header\nline\n"));
    }

    #[test]
    fn create_overwrites_in_place() {
        let mut storage = MemStorage::new();
        storage.create("calibration.txt", "Tare: 1\n").unwrap();
        storage.create("calibration.txt", "Tare: 2\n").unwrap();
        assert_eq!(storage.contents("calibration.txt"), Some("Tare: 2\n"));
        assert_eq!(storage.file_names().count(), 1);
    }

    #[test]
    fn appending_to_nothing_fails() {
        let mut storage = MemStorage::new();
        assert_eq!(storage.append("ghost", "x"), Err(StorageError::WriteFailed));
    }

    #[test]
    fn unavailable_blocks_everything() {
        let mut storage = MemStorage::new();
        storage.create("run.txt", "").unwrap();
        storage.set_unavailable(true);

        assert_eq!(storage.exists("run.txt"), Err(StorageError::Unavailable));
        assert_eq!(storage.create("x", ""), Err(StorageError::Unavailable));
        assert_eq!(
            storage.append("run.txt", "y"),
            Err(StorageError::Unavailable)
        );
    }

    #[test]
    fn injected_write_faults_are_scoped_to_one_operation() {
        let mut storage = MemStorage::new();
        storage.create("run.txt", "").unwrap();

        storage.fail_appends(true);
        assert_eq!(
            storage.append("run.txt", "lost"),
            Err(StorageError::WriteFailed)
        );

        storage.fail_appends(false);
        storage.append("run.txt", "kept").unwrap();
        assert_eq!(storage.contents("run.txt"), Some("kept"));
    }
}
