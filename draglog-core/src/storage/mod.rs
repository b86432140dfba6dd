//! Durable storage capability
//!
//! The log store never touches a filesystem directly; it writes through
//! the [`Storage`] trait so the acquisition loop can run against an SD
//! card on the rig, a directory on a workstation, or an in-memory fake
//! that injects faults on demand.
//!
//! ## Module Organization
//!
//! - Core trait (this file)
//! - `dir` - directory-backed storage (requires `std`)
//! - `memory` - in-memory storage for testing and replay

#[cfg(feature = "std")]
pub mod dir;

#[cfg(feature = "storage-memory")]
pub mod memory;

#[cfg(feature = "std")]
pub use dir::DirStorage;

#[cfg(feature = "storage-memory")]
pub use memory::MemStorage;

use crate::errors::StorageError;

/// A flat namespace of append-only text files
///
/// Every operation opens and closes the medium; nothing is held open
/// between calls. Power loss mid-test is the expected failure mode, so
/// durability per operation beats throughput.
pub trait Storage {
    /// Whether a file of this name is present on the medium
    ///
    /// Returns [`StorageError::Unavailable`] when the medium itself
    /// cannot answer, which callers treat as fatal during boot scans.
    fn exists(&self, name: &str) -> Result<bool, StorageError>;

    /// Write a whole file, truncating any previous content
    fn create(&mut self, name: &str, contents: &str) -> Result<(), StorageError>;

    /// Append one record to an existing file
    fn append(&mut self, name: &str, data: &str) -> Result<(), StorageError>;
}
