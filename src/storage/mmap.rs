//! # Memory-Mapped Database File
//!
//! `MmapStorage` maps the database file read-only and hands out page
//! slices. Mapping the file sidesteps a user-space page cache entirely:
//! the OS page cache backs every read, and a "page read" is a bounds
//! check plus slice arithmetic.
//!
//! ## Read-Only Model
//!
//! The engine never writes, so the mapping is immutable for its whole
//! lifetime and page slices borrow from `MmapStorage` with no interior
//! mutability. One owner of the file handle, one shared mapping, values
//! copied out of page buffers before a traversal moves on.
//!
//! ## Page Addressing
//!
//! SQLite numbers pages from 1; page P starts at byte
//! `(P - 1) * page_size`. The page size comes from the file header, so
//! it is a runtime field here rather than a compile-time constant.
//!
//! ## Error Handling
//!
//! All fallible operations return `eyre::Result` with the file path or
//! page number in context: open/metadata failures, a file shorter than
//! the 100-byte header, a size that is not a whole number of pages, and
//! out-of-range page requests.

use std::fs::File;
use std::path::Path;

use eyre::{ensure, Result, WrapErr};
use memmap2::Mmap;

use super::{DatabaseHeader, FILE_HEADER_SIZE};

#[derive(Debug)]
pub struct MmapStorage {
    mmap: Mmap,
    page_size: u32,
    page_count: u32,
    text_encoding: u32,
}

impl MmapStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path)
            .wrap_err_with(|| format!("failed to open database file '{}'", path.display()))?;

        let metadata = file
            .metadata()
            .wrap_err_with(|| format!("failed to get metadata for '{}'", path.display()))?;

        let file_size = metadata.len();

        ensure!(
            file_size >= FILE_HEADER_SIZE as u64,
            "database file '{}' is too small ({} bytes) to hold a header",
            path.display(),
            file_size
        );

        // SAFETY: Mmap::map is unsafe because the underlying file could be
        // truncated or rewritten by another process while mapped. This is
        // safe for our purposes because:
        // 1. The engine holds the mapping only for the span of one query
        // 2. The file is opened read-only and never written by this process
        // 3. All access goes through page(), which bounds-checks against
        //    the length captured at map time
        let mmap = unsafe {
            Mmap::map(&file)
                .wrap_err_with(|| format!("failed to memory-map '{}'", path.display()))?
        };

        let header = DatabaseHeader::from_bytes(&mmap)?;
        let page_size = header.page_size();
        let text_encoding = header.text_encoding();

        ensure!(
            file_size % page_size as u64 == 0,
            "database file '{}' size {} is not a multiple of page size {}",
            path.display(),
            file_size,
            page_size
        );

        let page_count = (file_size / page_size as u64) as u32;

        Ok(Self {
            mmap,
            page_size,
            page_count,
            text_encoding,
        })
    }

    /// Returns the full page slice for 1-based page number `page_no`.
    pub fn page(&self, page_no: u32) -> Result<&[u8]> {
        ensure!(
            page_no >= 1 && page_no <= self.page_count,
            "page {} out of bounds (page_count={})",
            page_no,
            self.page_count
        );

        let offset = (page_no as usize - 1) * self.page_size as usize;
        Ok(&self.mmap[offset..offset + self.page_size as usize])
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn text_encoding(&self) -> u32 {
        self.text_encoding
    }
}
