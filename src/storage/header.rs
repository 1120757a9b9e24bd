//! # Database File Header
//!
//! The first 100 bytes of every SQLite database file form a fixed-layout
//! header. This module maps those bytes onto a typed, zerocopy-backed
//! struct so fields can be read directly from the mmap without copying.
//!
//! ## Header Layout (100 bytes)
//!
//! ```text
//! Offset  Size  Field               Description
//! ------  ----  ------------------  -----------------------------------
//! 0       16    magic               "SQLite format 3\0"
//! 16      2     page_size           Page size in bytes (1 means 65536)
//! 18      1     write_version       1 = legacy, 2 = WAL
//! 19      1     read_version        1 = legacy, 2 = WAL
//! 20      1     reserved_per_page   Unused bytes at the end of each page
//! 21      3     payload fractions   Fixed constants 64 / 32 / 32
//! 24      4     change_counter      File change counter
//! 28      4     page_count          Size of the database in pages
//! 32      8     freelist            First trunk page + page count
//! 40      4     schema_cookie       Bumped on schema change
//! 44      4     schema_format       1..4
//! 48      4     default_cache_size
//! 52      4     largest_root_page   Non-zero when vacuum is enabled
//! 56      4     text_encoding       1 = UTF-8, 2 = UTF-16le, 3 = UTF-16be
//! 60      12    user/vacuum/app id
//! 72      20    reserved            Must be zero
//! 92      8     version-valid-for + sqlite version number
//! ```
//!
//! All multi-byte fields are big-endian; the zerocopy `U16<BigEndian>` /
//! `U32<BigEndian>` types handle the conversion at the access site.
//!
//! ## Validation
//!
//! `from_bytes` rejects a missing magic string and a page size that is
//! not a power of two in 512..=32768 (or the literal 1 encoding 65536).
//! Everything else is taken at face value; the engine only ever consults
//! the page size and the text encoding.

use eyre::{ensure, Result};
use zerocopy::big_endian::{U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use super::FILE_HEADER_SIZE;

pub const MAGIC: &[u8; 16] = b"SQLite format 3\x00";

pub const TEXT_ENCODING_UTF8: u32 = 1;

#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct DatabaseHeader {
    magic: [u8; 16],
    page_size: U16,
    write_version: u8,
    read_version: u8,
    reserved_per_page: u8,
    max_payload_fraction: u8,
    min_payload_fraction: u8,
    leaf_payload_fraction: u8,
    change_counter: U32,
    page_count: U32,
    freelist_trunk_page: U32,
    freelist_page_count: U32,
    schema_cookie: U32,
    schema_format: U32,
    default_cache_size: U32,
    largest_root_page: U32,
    text_encoding: U32,
    user_version: U32,
    incremental_vacuum: U32,
    application_id: U32,
    reserved: [u8; 20],
    version_valid_for: U32,
    sqlite_version: U32,
}

const _: () = assert!(std::mem::size_of::<DatabaseHeader>() == FILE_HEADER_SIZE);

impl DatabaseHeader {
    pub fn from_bytes(bytes: &[u8]) -> Result<&Self> {
        ensure!(
            bytes.len() >= FILE_HEADER_SIZE,
            "file too small for database header: {} < {}",
            bytes.len(),
            FILE_HEADER_SIZE
        );

        let header = Self::ref_from_bytes(&bytes[..FILE_HEADER_SIZE])
            .map_err(|e| eyre::eyre!("failed to read database header: {:?}", e))?;

        ensure!(
            &header.magic == MAGIC,
            "not a SQLite 3 database: bad magic string"
        );

        let raw = header.page_size.get();
        ensure!(
            raw == 1 || (raw >= 512 && raw.is_power_of_two()),
            "invalid page size in header: {}",
            raw
        );

        Ok(header)
    }

    /// Page size in bytes. The on-disk value 1 encodes 65536.
    pub fn page_size(&self) -> u32 {
        match self.page_size.get() {
            1 => 65536,
            n => n as u32,
        }
    }

    pub fn page_count(&self) -> u32 {
        self.page_count.get()
    }

    pub fn text_encoding(&self) -> u32 {
        self.text_encoding.get()
    }

    pub fn schema_cookie(&self) -> u32 {
        self.schema_cookie.get()
    }

    pub fn reserved_per_page(&self) -> u8 {
        self.reserved_per_page
    }
}
