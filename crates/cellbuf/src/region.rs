//! Byte regions backing a cell buffer.
//!
//! A region is either read into memory owned by the process or mapped
//! read-only from the file. Both dereference to `&[u8]`, so everything built
//! on top of a region is oblivious to which one it got.

use memmap2::{Mmap, MmapOptions};
use std::fmt;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::ops::Deref;

/// How a region's bytes are obtained from the backing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessMode {
    /// Map the byte range read-only; pages are faulted in by the OS on access.
    #[default]
    MemoryMapped,
    /// Read the byte range eagerly into an owned buffer.
    LoadToMemory,
}

impl AccessMode {
    pub fn name(self) -> &'static str {
        match self {
            AccessMode::MemoryMapped => "mmap",
            AccessMode::LoadToMemory => "load",
        }
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable bytes of one file section.
pub enum CellRegion {
    Owned(Vec<u8>),
    Mapped(Mmap),
}

impl CellRegion {
    /// Wraps bytes the caller already holds.
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        CellRegion::Owned(bytes)
    }

    /// Reads `len` bytes starting at `offset` into an owned buffer.
    ///
    /// Fails with `UnexpectedEof` if the file ends before `offset + len`.
    pub fn load(file: &File, offset: u64, len: usize) -> io::Result<Self> {
        let mut handle = file;
        handle.seek(SeekFrom::Start(offset))?;
        let mut buf = vec![0u8; len];
        handle.read_exact(&mut buf)?;
        Ok(CellRegion::Owned(buf))
    }

    /// Maps `[offset, offset + len)` of `file` read-only.
    ///
    /// An empty range is returned as an empty owned region since zero-length
    /// mappings are rejected on some platforms.
    pub fn map(file: &File, offset: u64, len: usize) -> io::Result<Self> {
        if len == 0 {
            return Ok(CellRegion::Owned(Vec::new()));
        }
        // SAFETY: the mapping is read-only and callers treat column files as
        // immutable once written. Truncating the file underneath a live
        // mapping is outside the contract of this crate.
        let mmap = unsafe { MmapOptions::new().offset(offset).len(len).map(file)? };
        Ok(CellRegion::Mapped(mmap))
    }

    /// Obtains `[offset, offset + len)` according to `mode`.
    pub fn read(file: &File, offset: u64, len: usize, mode: AccessMode) -> io::Result<Self> {
        match mode {
            AccessMode::MemoryMapped => Self::map(file, offset, len),
            AccessMode::LoadToMemory => Self::load(file, offset, len),
        }
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self, CellRegion::Mapped(_))
    }
}

impl Deref for CellRegion {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            CellRegion::Owned(buf) => buf,
            CellRegion::Mapped(mmap) => mmap,
        }
    }
}

impl fmt::Debug for CellRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_mapped() { "Mapped" } else { "Owned" };
        f.debug_struct("CellRegion")
            .field("kind", &kind)
            .field("len", &self.len())
            .finish()
    }
}
