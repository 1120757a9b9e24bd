//! # Catalog Bootstrap
//!
//! The catalog is built by scanning page 1 as a table B-tree. Each row
//! describes one object in five columns:
//!
//! ```text
//! kind        "table" | "index" | "view" | "trigger"
//! name        object name
//! tbl_name    parent table name (== name for tables)
//! rootpage    root page of the object's B-tree
//! sql         original CREATE statement (NULL for auto-indexes)
//! ```
//!
//! Schema rows are decoded with the fixed-count record entry point:
//! the column count is known a priori, and the bootstrap must not
//! depend on the schema it is in the middle of building.
//!
//! The catalog resolves table names case-insensitively (SQLite treats
//! identifiers that way) and answers the planner's one question about
//! indexes: is there an index on (table, column)? Auto-indexes store no
//! SQL, so they resolve to no column but still count toward the object
//! total that `.dbinfo` reports.

use eyre::{bail, ensure, Result};
use std::collections::HashMap;

use crate::btree::TableScan;
use crate::records::{decode_record_fixed, Value};
use crate::storage::MmapStorage;

use super::columns::parse_index_column;

/// Root page of the schema table itself.
const SCHEMA_ROOT_PAGE: u32 = 1;

/// Column count of every schema-table row.
const SCHEMA_COLUMNS: usize = 5;

/// One row of the schema table.
#[derive(Debug, Clone)]
pub struct SchemaObject {
    pub kind: String,
    pub name: String,
    pub table_name: String,
    pub root_page: u32,
    pub sql: Option<String>,
}

/// An index recorded in the catalog, keyed for planner lookup.
#[derive(Debug, Clone)]
pub struct IndexInfo {
    pub name: String,
    pub table_name: String,
    pub column: Option<String>,
    pub root_page: u32,
}

#[derive(Debug)]
pub struct Catalog {
    objects: Vec<SchemaObject>,
    tables: HashMap<String, usize>,
    indexes: Vec<IndexInfo>,
}

fn text_column(value: &Value, what: &str) -> Result<String> {
    match value {
        Value::Text(bytes) => Ok(std::str::from_utf8(bytes)
            .map_err(|_| eyre::eyre!("schema {} is not valid UTF-8", what))?
            .to_string()),
        other => bail!("schema {} has unexpected type {:?}", what, other),
    }
}

fn int_column(value: &Value, what: &str) -> Result<i64> {
    match value {
        Value::Int(n) => Ok(*n),
        other => bail!("schema {} has unexpected type {:?}", what, other),
    }
}

impl Catalog {
    /// Scans the schema table and builds the name maps.
    pub fn load(storage: &MmapStorage) -> Result<Self> {
        let mut objects = Vec::new();
        let mut tables = HashMap::new();
        let mut indexes = Vec::new();

        let mut scan = TableScan::new(storage, SCHEMA_ROOT_PAGE)?;
        while let Some((_rowid, payload)) = scan.next()? {
            let record = decode_record_fixed(payload, SCHEMA_COLUMNS)?;
            ensure!(
                record.values.len() == SCHEMA_COLUMNS,
                "schema row with {} columns",
                record.values.len()
            );

            let kind = text_column(&record.values[0], "object kind")?;
            let name = text_column(&record.values[1], "object name")?;
            let table_name = text_column(&record.values[2], "parent table name")?;
            let root_page = int_column(&record.values[3], "root page")?;
            ensure!(root_page >= 0, "negative root page {}", root_page);
            let sql = match &record.values[4] {
                Value::Null => None,
                other => Some(text_column(other, "create statement")?),
            };

            let object = SchemaObject {
                kind,
                name,
                table_name,
                root_page: root_page as u32,
                sql,
            };

            match object.kind.as_str() {
                "table" => {
                    tables.insert(object.name.to_lowercase(), objects.len());
                }
                "index" => {
                    indexes.push(IndexInfo {
                        name: object.name.clone(),
                        table_name: object.table_name.clone(),
                        column: object.sql.as_deref().and_then(parse_index_column),
                        root_page: object.root_page,
                    });
                }
                _ => {}
            }

            objects.push(object);
        }

        Ok(Self {
            objects,
            tables,
            indexes,
        })
    }

    /// Total schema rows, indexes and views included.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Table names in schema-table order.
    pub fn table_names(&self) -> Vec<&str> {
        self.objects
            .iter()
            .filter(|o| o.kind == "table")
            .map(|o| o.name.as_str())
            .collect()
    }

    pub fn resolve_table(&self, name: &str) -> Result<&SchemaObject> {
        self.tables
            .get(&name.to_lowercase())
            .map(|&i| &self.objects[i])
            .ok_or_else(|| eyre::eyre!("no such table: {}", name))
    }

    /// Finds an index on `(table, column)`, both case-insensitive.
    pub fn index_on(&self, table: &str, column: &str) -> Option<&IndexInfo> {
        self.indexes.iter().find(|idx| {
            idx.table_name.eq_ignore_ascii_case(table)
                && idx
                    .column
                    .as_deref()
                    .is_some_and(|c| c.eq_ignore_ascii_case(column))
        })
    }
}
