//! # B-Tree Traversal
//!
//! Two tree shapes share the page format but differ in what a cell
//! carries:
//!
//! - **Table trees** (interior 0x05, leaf 0x0D) are keyed on the integer
//!   rowid. Leaf cells hold `payload-size varint, rowid varint, record`;
//!   interior cells hold a 4-byte left-child pointer and a rowid-key
//!   varint, with the key equal to the largest rowid in the left subtree.
//! - **Index trees** (interior 0x02, leaf 0x0A) are keyed on a record
//!   whose first column is the indexed value and whose last column is
//!   the rowid of the owning table row. Interior cells carry real
//!   entries, not just separators.
//!
//! Traversal is a pushdown automaton whose only state is the descent
//! path. The table scan keeps that path as an explicit stack rather than
//! recursing, so stack usage stays bounded by tree height no matter how
//! deep a (possibly corrupt) file claims to be; [`MAX_DEPTH`] cuts off
//! files that would otherwise cycle.

pub mod index;
pub mod table;

pub use index::probe;
pub use table::{lookup, TableScan};

/// Upper bound on descent depth. A healthy tree over any plausible file
/// is a handful of levels; hitting this means the file is corrupt or
/// self-referential.
pub(crate) const MAX_DEPTH: usize = 32;
