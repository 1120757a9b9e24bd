//! # Table B-Tree Traversal
//!
//! Two operations over rowid-keyed trees: a full in-order scan and a
//! keyed point lookup.
//!
//! ## Full Scan
//!
//! [`TableScan`] is a cursor. Each `next()` call resumes from an explicit
//! descent stack: leaf frames emit one cell per call, interior frames
//! push their children in cell-pointer order and the right pointer last.
//! Rows therefore come out in strictly ascending rowid order, and memory
//! stays at one frame per level regardless of table size.
//!
//! The cursor yields `(rowid, payload)` with the payload borrowed from
//! the mapped file; callers pick the record entry point that fits (the
//! schema bootstrap decodes with a fixed column count, the executor with
//! the header-length-driven decoder).
//!
//! ## Keyed Lookup
//!
//! [`lookup`] descends one child per level: at an interior page the first
//! cell whose key is >= the target selects the child (falling through to
//! the right pointer), at a leaf the cells are scanned until the rowid
//! matches or overshoots. O(height) pages are read.
//!
//! ## Overflow
//!
//! A leaf payload longer than the bytes remaining in its page would
//! continue on an overflow chain; this engine treats that as a format
//! error rather than following the chain.

use eyre::{bail, ensure, Result};
use smallvec::SmallVec;

use crate::encoding::{read_u32, read_varint};
use crate::storage::{BtreePage, MmapStorage, PageType};

use super::MAX_DEPTH;

/// Splits a table leaf cell into its rowid and record payload.
fn leaf_cell(cell: &[u8]) -> Result<(i64, &[u8])> {
    let (payload_size, n1) = read_varint(cell)?;
    let (rowid, n2) = read_varint(&cell[n1..])?;

    ensure!(payload_size >= 0, "negative payload size {}", payload_size);
    let start = n1 + n2;
    let payload_size = payload_size as usize;
    ensure!(
        payload_size <= cell.len() - start,
        "payload of {} bytes spills past the page (overflow pages are not supported)",
        payload_size
    );

    Ok((rowid, &cell[start..start + payload_size]))
}

/// Splits a table interior cell into its left child and rowid key.
fn interior_cell(cell: &[u8]) -> Result<(u32, i64)> {
    let child = read_u32(cell)?;
    let (key, _) = read_varint(&cell[4..])?;
    Ok((child, key))
}

struct Frame<'db> {
    page: BtreePage<'db>,
    /// Next cell-pointer index to visit; `cell_count` means the right
    /// pointer is next, `cell_count + 1` means the frame is exhausted.
    next_cell: usize,
}

/// In-order cursor over a table B-tree.
pub struct TableScan<'db> {
    storage: &'db MmapStorage,
    stack: SmallVec<[Frame<'db>; 8]>,
}

impl<'db> TableScan<'db> {
    pub fn new(storage: &'db MmapStorage, root_page: u32) -> Result<Self> {
        let mut scan = Self {
            storage,
            stack: SmallVec::new(),
        };
        scan.push(root_page)?;
        Ok(scan)
    }

    fn push(&mut self, page_no: u32) -> Result<()> {
        ensure!(
            self.stack.len() < MAX_DEPTH,
            "table b-tree deeper than {} levels; refusing descent",
            MAX_DEPTH
        );

        let page = BtreePage::parse(self.storage.page(page_no)?, page_no)?;
        ensure!(
            page.page_type().is_table(),
            "page {} is not a table b-tree page (type {:?})",
            page_no,
            page.page_type()
        );

        self.stack.push(Frame { page, next_cell: 0 });
        Ok(())
    }

    /// Advances to the next row, returning its rowid and record payload.
    pub fn next(&mut self) -> Result<Option<(i64, &'db [u8])>> {
        loop {
            let Some(frame) = self.stack.last_mut() else {
                return Ok(None);
            };

            let cell_count = frame.page.cell_count() as usize;

            match frame.page.page_type() {
                PageType::TableLeaf => {
                    if frame.next_cell >= cell_count {
                        self.stack.pop();
                        continue;
                    }
                    let idx = frame.next_cell;
                    frame.next_cell += 1;
                    let cell = frame.page.cell_bytes(idx)?;
                    return leaf_cell(cell).map(Some);
                }
                PageType::TableInterior => {
                    if frame.next_cell < cell_count {
                        let idx = frame.next_cell;
                        frame.next_cell += 1;
                        let (child, _key) = interior_cell(frame.page.cell_bytes(idx)?)?;
                        self.push(child)?;
                    } else if frame.next_cell == cell_count {
                        frame.next_cell += 1;
                        let child = frame.page.right_pointer()?;
                        self.push(child)?;
                    } else {
                        self.stack.pop();
                    }
                }
                other => bail!("unexpected page type {:?} in table b-tree", other),
            }
        }
    }
}

/// Point lookup by rowid. Returns the record payload of the matching
/// row, or `None` when the rowid is absent.
pub fn lookup<'db>(
    storage: &'db MmapStorage,
    root_page: u32,
    rowid: i64,
) -> Result<Option<&'db [u8]>> {
    let mut page_no = root_page;

    for _ in 0..MAX_DEPTH {
        let page = BtreePage::parse(storage.page(page_no)?, page_no)?;

        match page.page_type() {
            PageType::TableInterior => {
                let mut next = page.right_pointer()?;
                for idx in 0..page.cell_count() as usize {
                    let (child, key) = interior_cell(page.cell_bytes(idx)?)?;
                    if key >= rowid {
                        next = child;
                        break;
                    }
                }
                page_no = next;
            }
            PageType::TableLeaf => {
                for idx in 0..page.cell_count() as usize {
                    let (cell_rowid, payload) = leaf_cell(page.cell_bytes(idx)?)?;
                    if cell_rowid == rowid {
                        return Ok(Some(payload));
                    }
                    if cell_rowid > rowid {
                        return Ok(None);
                    }
                }
                return Ok(None);
            }
            other => bail!("unexpected page type {:?} in table b-tree", other),
        }
    }

    bail!(
        "table b-tree deeper than {} levels; refusing descent",
        MAX_DEPTH
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{decode_record, Value};
    use crate::storage::header::MAGIC;
    use std::io::Write;
    use tempfile::tempdir;

    const PAGE_SIZE: usize = 512;

    /// Record payload with single-byte serial types and bodies.
    fn record(columns: &[(u8, &[u8])]) -> Vec<u8> {
        let mut out = vec![1 + columns.len() as u8];
        for &(serial_type, _) in columns {
            out.push(serial_type);
        }
        for &(_, body) in columns {
            out.extend_from_slice(body);
        }
        out
    }

    /// Table leaf page holding `rows` of (rowid, record payload).
    /// Rowids must stay below 128 so their varints are single bytes.
    fn leaf(rows: &[(u8, Vec<u8>)]) -> Vec<u8> {
        let mut page = vec![0u8; PAGE_SIZE];
        page[0] = 0x0D;
        page[3..5].copy_from_slice(&(rows.len() as u16).to_be_bytes());

        let mut content_end = PAGE_SIZE;
        for (i, (rowid, payload)) in rows.iter().enumerate() {
            assert!(payload.len() < 128);
            let cell_len = 2 + payload.len();
            let offset = content_end - cell_len;
            page[offset] = payload.len() as u8;
            page[offset + 1] = *rowid;
            page[offset + 2..offset + 2 + payload.len()].copy_from_slice(payload);
            page[8 + 2 * i..10 + 2 * i].copy_from_slice(&(offset as u16).to_be_bytes());
            content_end = offset;
        }
        page[5..7].copy_from_slice(&(content_end as u16).to_be_bytes());
        page
    }

    /// Table interior page with (left child, rowid key) cells.
    fn interior(cells: &[(u32, u8)], right: u32) -> Vec<u8> {
        let mut page = vec![0u8; PAGE_SIZE];
        page[0] = 0x05;
        page[3..5].copy_from_slice(&(cells.len() as u16).to_be_bytes());
        page[8..12].copy_from_slice(&right.to_be_bytes());

        let mut content_end = PAGE_SIZE;
        for (i, (child, key)) in cells.iter().enumerate() {
            let offset = content_end - 5;
            page[offset..offset + 4].copy_from_slice(&child.to_be_bytes());
            page[offset + 4] = *key;
            page[12 + 2 * i..14 + 2 * i].copy_from_slice(&(offset as u16).to_be_bytes());
            content_end = offset;
        }
        page[5..7].copy_from_slice(&(content_end as u16).to_be_bytes());
        page
    }

    /// Writes page 1 (file header + empty schema leaf) plus the given
    /// pages, then maps the file.
    fn build_db(pages: &[Vec<u8>]) -> (tempfile::TempDir, MmapStorage) {
        let mut page1 = vec![0u8; PAGE_SIZE];
        page1[..16].copy_from_slice(MAGIC);
        page1[16..18].copy_from_slice(&(PAGE_SIZE as u16).to_be_bytes());
        page1[56..60].copy_from_slice(&1u32.to_be_bytes());
        page1[100] = 0x0D;

        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&page1).unwrap();
        for page in pages {
            assert_eq!(page.len(), PAGE_SIZE);
            file.write_all(page).unwrap();
        }
        drop(file);

        (dir, MmapStorage::open(&path).unwrap())
    }

    fn collect(storage: &MmapStorage, root: u32) -> Vec<(i64, Vec<Value>)> {
        let mut scan = TableScan::new(storage, root).unwrap();
        let mut rows = Vec::new();
        while let Some((rowid, payload)) = scan.next().unwrap() {
            rows.push((rowid, decode_record(payload).unwrap().values));
        }
        rows
    }

    #[test]
    fn scans_single_leaf_in_cell_order() {
        let rows = vec![
            (1u8, record(&[(15, b"a")])),
            (2, record(&[(15, b"b")])),
            (3, record(&[(15, b"c")])),
        ];
        let (_dir, storage) = build_db(&[leaf(&rows)]);

        let out = collect(&storage, 2);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0], (1, vec![Value::Text(b"a".to_vec())]));
        assert_eq!(out[2], (3, vec![Value::Text(b"c".to_vec())]));
    }

    #[test]
    fn scans_interior_tree_in_ascending_rowid_order() {
        let left = leaf(&[(1, record(&[(1, &[10])])), (2, record(&[(1, &[20])]))]);
        let mid = leaf(&[(3, record(&[(1, &[30])]))]);
        let right = leaf(&[(4, record(&[(1, &[40])])), (5, record(&[(1, &[50])]))]);
        let root = interior(&[(2, 2), (3, 3)], 4);
        let (_dir, storage) = build_db(&[left, mid, right, root]);

        let out = collect(&storage, 5);
        let rowids: Vec<i64> = out.iter().map(|(r, _)| *r).collect();
        assert_eq!(rowids, vec![1, 2, 3, 4, 5]);
        assert!(rowids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn empty_leaf_yields_no_rows() {
        let (_dir, storage) = build_db(&[leaf(&[])]);
        assert!(collect(&storage, 2).is_empty());
    }

    #[test]
    fn lookup_finds_rows_across_levels() {
        let left = leaf(&[(1, record(&[(1, &[10])])), (2, record(&[(1, &[20])]))]);
        let right = leaf(&[(4, record(&[(1, &[40])]))]);
        let root = interior(&[(2, 2)], 3);
        let (_dir, storage) = build_db(&[left, right, root]);

        let payload = lookup(&storage, 4, 2).unwrap().unwrap();
        let rec = decode_record(payload).unwrap();
        assert_eq!(rec.values, vec![Value::Int(20)]);

        let payload = lookup(&storage, 4, 4).unwrap().unwrap();
        let rec = decode_record(payload).unwrap();
        assert_eq!(rec.values, vec![Value::Int(40)]);
    }

    #[test]
    fn lookup_missing_rowid_returns_none() {
        let page = leaf(&[(1, record(&[(1, &[10])])), (3, record(&[(1, &[30])]))]);
        let (_dir, storage) = build_db(&[page]);

        assert!(lookup(&storage, 2, 2).unwrap().is_none());
        assert!(lookup(&storage, 2, 9).unwrap().is_none());
    }

    #[test]
    fn index_page_in_table_tree_is_rejected() {
        let mut page = leaf(&[]);
        page[0] = 0x0A;
        let (_dir, storage) = build_db(&[page]);

        assert!(TableScan::new(&storage, 2).is_err());
    }

    #[test]
    fn self_referential_tree_is_cut_off() {
        let root = interior(&[(2, 1)], 2);
        let (_dir, storage) = build_db(&[root]);

        let mut scan = TableScan::new(&storage, 2).unwrap();
        assert!(scan.next().is_err());
    }

    #[test]
    fn oversized_payload_is_a_format_error() {
        let mut page = vec![0u8; PAGE_SIZE];
        page[0] = 0x0D;
        page[3..5].copy_from_slice(&1u16.to_be_bytes());
        let offset = PAGE_SIZE - 4;
        page[offset] = 200;
        page[offset + 1] = 1;
        page[8..10].copy_from_slice(&(offset as u16).to_be_bytes());
        let (_dir, storage) = build_db(&[page]);

        let mut scan = TableScan::new(&storage, 2).unwrap();
        let err = scan.next().unwrap_err();
        assert!(err.to_string().contains("overflow pages"));
    }
}
