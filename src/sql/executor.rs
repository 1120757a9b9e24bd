//! # Query Execution
//!
//! The executor turns a lowered SELECT into output lines. It resolves
//! the table through the catalog, derives column definitions from the
//! stored CREATE TABLE text, picks a plan, filters, projects, and
//! renders.
//!
//! ## Plan Selection
//!
//! Two plans exist:
//!
//! - **Index probe**: when the filter carries an equality on a column
//!   (possibly under top-level ANDs) and the catalog has an index on
//!   (table, column), the index tree yields candidate rowids. They are
//!   deduplicated, each row is fetched with a keyed table lookup, and
//!   the *full* predicate is re-applied so any other conjuncts stay
//!   honored.
//! - **Full scan**: everything else walks the table tree in rowid order
//!   and evaluates the predicate per row.
//!
//! Both plans produce identical row sets for an indexed equality; the
//! probe just reads O(matches · height) pages instead of the whole
//! table.
//!
//! ## Projection
//!
//! Each projected item is either a record slot or the rowid marker.
//! `*` expands to the rowid-alias column first (when one exists)
//! followed by the remaining columns in definition order. The alias
//! column and the literal name `rowid` both project the cell rowid;
//! their record slot holds only a placeholder NULL.
//!
//! ## Output
//!
//! One string per row, values joined with `|`. NULL renders empty,
//! numbers in base 10, text and blobs as their raw bytes. `COUNT(*)`
//! short-circuits projection entirely and emits a single line.

use eyre::{bail, ensure, Result};

use crate::btree::{lookup, probe, TableScan};
use crate::records::decode_record;
use crate::schema::{parse_table_columns, Catalog, ColumnDef, SchemaObject};
use crate::sql::ast::{Projection, SelectStatement};
use crate::sql::predicate::RowPredicate;
use crate::storage::MmapStorage;

/// A projected output column: a record slot or the cell rowid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Rowid,
    Slot(usize),
}

pub struct QueryEngine<'db> {
    storage: &'db MmapStorage,
    catalog: &'db Catalog,
}

impl<'db> QueryEngine<'db> {
    pub fn new(storage: &'db MmapStorage, catalog: &'db Catalog) -> Self {
        Self { storage, catalog }
    }

    /// Runs one SELECT, returning the rendered output lines.
    pub fn run(&self, stmt: &SelectStatement) -> Result<Vec<String>> {
        let table = self.catalog.resolve_table(&stmt.table)?;
        let Some(create_sql) = table.sql.as_deref() else {
            bail!("no schema available for table: {}", table.name);
        };
        let columns = parse_table_columns(create_sql);
        ensure!(
            !columns.is_empty(),
            "could not derive columns for table: {}",
            table.name
        );

        match &stmt.projection {
            Projection::CountStar => self.run_count(table, &columns, stmt),
            _ => self.run_rows(table, &columns, stmt),
        }
    }

    fn run_count(
        &self,
        table: &SchemaObject,
        columns: &[ColumnDef],
        stmt: &SelectStatement,
    ) -> Result<Vec<String>> {
        let predicate = stmt
            .filter
            .as_ref()
            .map(|expr| RowPredicate::new(expr, columns));

        let mut count: u64 = 0;
        let mut scan = TableScan::new(self.storage, table.root_page)?;
        while let Some((rowid, payload)) = scan.next()? {
            match &predicate {
                Some(p) => {
                    let record = decode_record(payload)?;
                    if p.matches(rowid, &record)? {
                        count += 1;
                    }
                }
                None => count += 1,
            }
        }

        Ok(vec![count.to_string()])
    }

    fn run_rows(
        &self,
        table: &SchemaObject,
        columns: &[ColumnDef],
        stmt: &SelectStatement,
    ) -> Result<Vec<String>> {
        let targets = resolve_projection(&stmt.projection, columns)?;
        let predicate = stmt
            .filter
            .as_ref()
            .map(|expr| RowPredicate::new(expr, columns));

        let indexed = stmt.filter.as_ref().and_then(|filter| {
            let (column, literal) = filter.equality_on_column()?;
            let index = self.catalog.index_on(&table.name, column)?;
            Some((index.root_page, literal.to_value()))
        });

        let mut lines = Vec::new();

        if let Some((index_root, key)) = indexed {
            let mut rowids = probe(self.storage, index_root, &key)?;
            rowids.sort_unstable();
            rowids.dedup();

            for rowid in rowids {
                let Some(payload) = lookup(self.storage, table.root_page, rowid)? else {
                    bail!(
                        "index on {} references missing rowid {}",
                        table.name,
                        rowid
                    );
                };
                let record = decode_record(payload)?;
                if let Some(p) = &predicate {
                    if !p.matches(rowid, &record)? {
                        continue;
                    }
                }
                lines.push(render_row(&targets, rowid, &record.values));
            }
        } else {
            let mut scan = TableScan::new(self.storage, table.root_page)?;
            while let Some((rowid, payload)) = scan.next()? {
                let record = decode_record(payload)?;
                if let Some(p) = &predicate {
                    if !p.matches(rowid, &record)? {
                        continue;
                    }
                }
                lines.push(render_row(&targets, rowid, &record.values));
            }
        }

        Ok(lines)
    }
}

fn resolve_projection(projection: &Projection, columns: &[ColumnDef]) -> Result<Vec<Target>> {
    match projection {
        Projection::CountStar => bail!("COUNT(*) does not project columns"),
        Projection::Star => {
            let mut targets = Vec::with_capacity(columns.len());
            if columns.iter().any(|c| c.rowid_alias) {
                targets.push(Target::Rowid);
            }
            for (index, column) in columns.iter().enumerate() {
                if !column.rowid_alias {
                    targets.push(Target::Slot(index));
                }
            }
            Ok(targets)
        }
        Projection::Columns(names) => {
            let mut targets = Vec::with_capacity(names.len());
            for name in names {
                if name.eq_ignore_ascii_case("rowid") {
                    targets.push(Target::Rowid);
                    continue;
                }
                let found = columns
                    .iter()
                    .enumerate()
                    .find(|(_, c)| c.name.eq_ignore_ascii_case(name));
                match found {
                    Some((_, def)) if def.rowid_alias => targets.push(Target::Rowid),
                    Some((index, _)) => targets.push(Target::Slot(index)),
                    None => bail!("no such column: {}", name),
                }
            }
            Ok(targets)
        }
    }
}

fn render_row(targets: &[Target], rowid: i64, values: &[crate::records::Value]) -> String {
    let rendered: Vec<String> = targets
        .iter()
        .map(|target| match target {
            Target::Rowid => rowid.to_string(),
            Target::Slot(index) => values
                .get(*index)
                .map(|v| v.render())
                .unwrap_or_default(),
        })
        .collect();
    rendered.join("|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Value;

    fn columns(defs: &[(&str, bool)]) -> Vec<ColumnDef> {
        defs.iter()
            .map(|(name, rowid_alias)| ColumnDef {
                name: name.to_string(),
                rowid_alias: *rowid_alias,
            })
            .collect()
    }

    #[test]
    fn star_puts_rowid_alias_first() {
        let columns = columns(&[("name", false), ("id", true), ("country", false)]);
        let targets = resolve_projection(&Projection::Star, &columns).unwrap();
        assert_eq!(
            targets,
            vec![Target::Rowid, Target::Slot(0), Target::Slot(2)]
        );
    }

    #[test]
    fn star_without_alias_is_definition_order() {
        let columns = columns(&[("a", false), ("b", false)]);
        let targets = resolve_projection(&Projection::Star, &columns).unwrap();
        assert_eq!(targets, vec![Target::Slot(0), Target::Slot(1)]);
    }

    #[test]
    fn named_alias_and_rowid_resolve_to_rowid_marker() {
        let columns = columns(&[("id", true), ("name", false)]);
        let projection =
            Projection::Columns(vec!["ID".to_string(), "rowid".to_string(), "name".to_string()]);
        let targets = resolve_projection(&projection, &columns).unwrap();
        assert_eq!(targets, vec![Target::Rowid, Target::Rowid, Target::Slot(1)]);
    }

    #[test]
    fn unknown_projection_column_fails() {
        let columns = columns(&[("a", false)]);
        let projection = Projection::Columns(vec!["nope".to_string()]);
        let err = resolve_projection(&projection, &columns).unwrap_err();
        assert!(err.to_string().contains("no such column: nope"));
    }

    #[test]
    fn render_joins_with_pipes_and_serves_rowid() {
        let targets = vec![Target::Rowid, Target::Slot(1)];
        let values = vec![Value::Null, Value::Text(b"beta".to_vec())];
        assert_eq!(render_row(&targets, 2, &values), "2|beta");
    }

    #[test]
    fn render_null_is_empty_and_missing_slot_is_empty() {
        let targets = vec![Target::Slot(0), Target::Slot(5)];
        let values = vec![Value::Null];
        assert_eq!(render_row(&targets, 1, &values), "|");
    }
}
