//! # Database Facade
//!
//! `Database` ties the layers together: open the file, bootstrap the
//! catalog, run queries. It is the only type most callers touch.
//!
//! Opening is cheap (a read-only mmap plus one scan of the schema
//! table) and everything afterwards is borrowed from the mapping, so a
//! `Database` is naturally short-lived: open, answer one command, drop.

use std::path::Path;

use eyre::{ensure, Result};

use crate::schema::Catalog;
use crate::sql::{parse_select, QueryEngine};
use crate::storage::header::TEXT_ENCODING_UTF8;
use crate::storage::MmapStorage;

#[derive(Debug)]
pub struct Database {
    storage: MmapStorage,
    catalog: Catalog,
}

impl Database {
    /// Opens a database file read-only and bootstraps the schema catalog.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let storage = MmapStorage::open(path)?;

        ensure!(
            storage.text_encoding() == TEXT_ENCODING_UTF8,
            "unsupported text encoding: {} (only UTF-8 is supported)",
            storage.text_encoding()
        );

        let catalog = Catalog::load(&storage)?;
        Ok(Self { storage, catalog })
    }

    /// Page size recorded in the file header.
    pub fn page_size(&self) -> u32 {
        self.storage.page_size()
    }

    /// Total schema rows, indexes and views included.
    pub fn object_count(&self) -> usize {
        self.catalog.object_count()
    }

    /// Table names in schema order.
    pub fn table_names(&self) -> Vec<String> {
        self.catalog
            .table_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Parses and runs one SELECT, returning rendered output lines.
    pub fn execute_sql(&self, sql: &str) -> Result<Vec<String>> {
        let stmt = parse_select(sql)?;
        QueryEngine::new(&self.storage, &self.catalog).run(&stmt)
    }
}
