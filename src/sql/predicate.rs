//! # WHERE Evaluation
//!
//! `RowPredicate` binds a lowered filter expression to one table's
//! column definitions and answers, per row, whether the row matches.
//!
//! ## Column Resolution
//!
//! Names resolve case-insensitively against the column list. Two names
//! are served from the cell rowid instead of the record: the literal
//! `rowid`, and the table's rowid-alias column (whose record slot
//! stores NULL). All other columns read the record slot at the same
//! index as their definition: record slots align one-to-one with
//! column definitions, alias included.
//!
//! A row shorter than the schema (columns added after the row was
//! written) reads as NULL past its end.
//!
//! ## Comparison
//!
//! Comparisons delegate to [`Value::sql_cmp`]: NULLs sort below
//! everything and equal each other, numbers compare numerically, and
//! everything else compares bytewise. AND and OR short-circuit.

use eyre::{bail, Result};

use crate::records::{Record, Value};
use crate::schema::ColumnDef;
use crate::sql::ast::{CompareOp, Expr};

/// Resolves a column reference to its value for one row.
pub fn resolve_column(
    columns: &[ColumnDef],
    name: &str,
    rowid: i64,
    record: &Record,
) -> Result<Value> {
    if name.eq_ignore_ascii_case("rowid") {
        return Ok(Value::Int(rowid));
    }

    let Some((index, def)) = columns
        .iter()
        .enumerate()
        .find(|(_, c)| c.name.eq_ignore_ascii_case(name))
    else {
        bail!("no such column: {}", name);
    };

    if def.rowid_alias {
        return Ok(Value::Int(rowid));
    }

    Ok(record.values.get(index).cloned().unwrap_or(Value::Null))
}

/// A filter expression bound to a table's column definitions.
pub struct RowPredicate<'a> {
    expr: &'a Expr,
    columns: &'a [ColumnDef],
}

impl<'a> RowPredicate<'a> {
    pub fn new(expr: &'a Expr, columns: &'a [ColumnDef]) -> Self {
        Self { expr, columns }
    }

    pub fn matches(&self, rowid: i64, record: &Record) -> Result<bool> {
        self.eval(self.expr, rowid, record)
    }

    fn eval(&self, expr: &Expr, rowid: i64, record: &Record) -> Result<bool> {
        match expr {
            Expr::And(lhs, rhs) => {
                Ok(self.eval(lhs, rowid, record)? && self.eval(rhs, rowid, record)?)
            }
            Expr::Or(lhs, rhs) => {
                Ok(self.eval(lhs, rowid, record)? || self.eval(rhs, rowid, record)?)
            }
            Expr::Compare { op, lhs, rhs } => {
                let left = self.operand(lhs, rowid, record)?;
                let right = self.operand(rhs, rowid, record)?;
                let ordering = left.sql_cmp(&right);
                Ok(match op {
                    CompareOp::Eq => ordering.is_eq(),
                    CompareOp::NotEq => ordering.is_ne(),
                    CompareOp::Lt => ordering.is_lt(),
                    CompareOp::LtEq => ordering.is_le(),
                    CompareOp::Gt => ordering.is_gt(),
                    CompareOp::GtEq => ordering.is_ge(),
                })
            }
            Expr::Column(_) | Expr::Literal(_) => {
                bail!("unsupported WHERE clause: bare value without comparison")
            }
        }
    }

    fn operand(&self, expr: &Expr, rowid: i64, record: &Record) -> Result<Value> {
        match expr {
            Expr::Column(name) => resolve_column(self.columns, name, rowid, record),
            Expr::Literal(lit) => Ok(lit.to_value()),
            _ => bail!("unsupported operand: comparisons take a column or a literal"),
        }
    }
}
