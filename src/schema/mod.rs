//! # Schema Catalog
//!
//! Page 1's B-tree is the schema table: one row per database object,
//! five columns (kind, name, parent table, root page, CREATE SQL). This
//! module bootstraps a catalog from it and derives column definitions
//! from the stored CREATE TABLE text.
//!
//! - [`catalog`]: schema-table scan, name → root-page resolution,
//!   index lookup by (table, column)
//! - [`columns`]: the lightweight CREATE TABLE / CREATE INDEX parser

pub mod catalog;
pub mod columns;

pub use catalog::{Catalog, IndexInfo, SchemaObject};
pub use columns::{parse_index_column, parse_table_columns, ColumnDef};
