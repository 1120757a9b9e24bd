//! # Index B-Tree Equality Probe
//!
//! An index tree maps `(indexed value, rowid)` records to nothing: the
//! record is the key. An equality probe therefore walks the tree
//! collecting the trailing rowid of every record whose first column
//! equals the target value.
//!
//! ## Why Interior Cells Are Collected
//!
//! Unlike a table tree, index interior cells are real entries: each one
//! carries a full key record (and its rowid), with the left child
//! holding keys that sort at or below it. A probe that only descended
//! would drop the rowids that happen to live in interior cells, so the
//! walk is:
//!
//! ```text
//! interior cell key < target:  skip the cell (left subtree is all smaller)
//! interior cell key = target:  descend left, collect this cell's rowid
//! interior cell key > target:  descend left (may still hold equals), stop
//! all cells < target:          descend the right pointer
//! leaf cell key = target:      collect; stop at the first greater key
//! ```
//!
//! Equal keys can span sibling subtrees because the full index key also
//! includes the rowid, so the result may contain duplicates when the
//! walk revisits boundaries; the executor deduplicates.
//!
//! Comparison uses [`Value::sql_cmp`], the same semantics the WHERE
//! evaluator applies, so an indexed plan and a scan plan agree on which
//! rows match.

use eyre::{bail, ensure, Result};
use std::cmp::Ordering;

use crate::encoding::{read_u32, read_varint};
use crate::records::{decode_record, Record, Value};
use crate::storage::{BtreePage, MmapStorage, PageType};

use super::MAX_DEPTH;

/// Decodes the key record of an index cell, starting at its
/// payload-size varint.
fn cell_record(buf: &[u8]) -> Result<Record> {
    let (payload_size, n) = read_varint(buf)?;
    ensure!(payload_size >= 0, "negative payload size {}", payload_size);
    let payload_size = payload_size as usize;
    ensure!(
        payload_size <= buf.len() - n,
        "index payload of {} bytes spills past the page (overflow pages are not supported)",
        payload_size
    );
    decode_record(&buf[n..n + payload_size])
}

fn entry_key(record: &Record) -> Result<&Value> {
    record
        .values
        .first()
        .ok_or_else(|| eyre::eyre!("index record has no key column"))
}

fn entry_rowid(record: &Record) -> Result<i64> {
    match record.values.last() {
        Some(Value::Int(rowid)) => Ok(*rowid),
        other => bail!("index record missing trailing rowid (got {:?})", other),
    }
}

/// Collects the rowids of every index entry equal to `key`. The result
/// may contain duplicates.
pub fn probe(storage: &MmapStorage, root_page: u32, key: &Value) -> Result<Vec<i64>> {
    let mut rowids = Vec::new();
    walk(storage, root_page, key, &mut rowids, 0)?;
    Ok(rowids)
}

fn walk(
    storage: &MmapStorage,
    page_no: u32,
    key: &Value,
    rowids: &mut Vec<i64>,
    depth: usize,
) -> Result<()> {
    ensure!(
        depth < MAX_DEPTH,
        "index b-tree deeper than {} levels; refusing descent",
        MAX_DEPTH
    );

    let page = BtreePage::parse(storage.page(page_no)?, page_no)?;

    match page.page_type() {
        PageType::IndexInterior => {
            for idx in 0..page.cell_count() as usize {
                let cell = page.cell_bytes(idx)?;
                let child = read_u32(cell)?;
                let record = cell_record(&cell[4..])?;

                match entry_key(&record)?.sql_cmp(key) {
                    Ordering::Less => continue,
                    Ordering::Equal => {
                        walk(storage, child, key, rowids, depth + 1)?;
                        rowids.push(entry_rowid(&record)?);
                    }
                    Ordering::Greater => {
                        walk(storage, child, key, rowids, depth + 1)?;
                        return Ok(());
                    }
                }
            }
            walk(storage, page.right_pointer()?, key, rowids, depth + 1)
        }
        PageType::IndexLeaf => {
            for idx in 0..page.cell_count() as usize {
                let record = cell_record(page.cell_bytes(idx)?)?;
                match entry_key(&record)?.sql_cmp(key) {
                    Ordering::Less => continue,
                    Ordering::Equal => rowids.push(entry_rowid(&record)?),
                    Ordering::Greater => break,
                }
            }
            Ok(())
        }
        other => bail!("unexpected page type {:?} in index b-tree", other),
    }
}
