//! # Storage Layer
//!
//! Read-only access to a SQLite database file: the 100-byte file header,
//! a memory-mapped page accessor, and the B-tree page header plus cell
//! pointer array.
//!
//! ## File Layout
//!
//! A database file is a sequence of fixed-size pages numbered from 1.
//! Page 1 opens with the 100-byte file header; the page's own B-tree
//! content begins immediately after it, but cell offsets stay relative to
//! the page origin (byte 0 of the file).
//!
//! ```text
//! Offset 0:               File header (100 bytes) + page 1 content
//! Offset page_size:       Page 2
//! Offset 2 * page_size:   Page 3
//! ...
//! ```
//!
//! The page size is read from the header at open time; unlike a format
//! with a compile-time page size, every accessor here carries it at
//! runtime.

pub mod header;
pub mod mmap;
pub mod page;

pub use header::DatabaseHeader;
pub use mmap::MmapStorage;
pub use page::{BtreePage, PageType};

/// Size of the database file header occupying the start of page 1.
pub const FILE_HEADER_SIZE: usize = 100;

/// B-tree page header size on leaf pages.
pub const LEAF_HEADER_SIZE: usize = 8;

/// B-tree page header size on interior pages (8 bytes + right pointer).
pub const INTERIOR_HEADER_SIZE: usize = 12;
