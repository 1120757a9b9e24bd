//! # SQL Front End
//!
//! Parsing is delegated to the `sqlparser` crate with the SQLite
//! dialect; this module's job is lowering that library's tree into the
//! crate's restricted AST and drawing the support boundary. Every
//! rejection happens here, with a diagnostic naming the construct, so
//! the executor only ever sees shapes it can run.
//!
//! ## Supported Subset
//!
//! - a single SELECT statement
//! - single-table FROM, no joins
//! - projection: `*`, `COUNT(*)`, or plain column names
//! - WHERE built from `=, <>, !=, <, <=, >, >=`, AND, OR, parentheses,
//!   column references, and string/integer/float/NULL literals
//!
//! `COUNT(*)` is detected the way the original did it: the single
//! select item's textual form is compared case-insensitively, which
//! keeps the detection independent of how the library models function
//! calls.

use eyre::{bail, ensure, eyre, Result};
use sqlparser::ast as sp;
use sqlparser::dialect::SQLiteDialect;
use sqlparser::parser::Parser;

use super::ast::{CompareOp, Expr, Literal, Projection, SelectStatement};

/// Parses one SQL string into the restricted SELECT shape.
pub fn parse_select(sql: &str) -> Result<SelectStatement> {
    let statements =
        Parser::parse_sql(&SQLiteDialect {}, sql).map_err(|e| eyre!("parse error: {}", e))?;

    ensure!(
        statements.len() == 1,
        "expected exactly one statement, got {}",
        statements.len()
    );

    let sp::Statement::Query(query) = &statements[0] else {
        bail!("unsupported statement: only SELECT is supported");
    };

    let sp::SetExpr::Select(select) = query.body.as_ref() else {
        bail!("unsupported query shape: only a plain SELECT is supported");
    };

    let table = lower_from(&select.from)?;
    let projection = lower_projection(&select.projection)?;
    let filter = select.selection.as_ref().map(lower_expr).transpose()?;

    Ok(SelectStatement {
        table,
        projection,
        filter,
    })
}

fn lower_from(from: &[sp::TableWithJoins]) -> Result<String> {
    ensure!(
        from.len() == 1,
        "only single-table SELECT statements are supported"
    );
    ensure!(
        from[0].joins.is_empty(),
        "JOIN is not supported"
    );

    match &from[0].relation {
        sp::TableFactor::Table { name, .. } => {
            let ident = name
                .0
                .last()
                .ok_or_else(|| eyre!("empty table name in FROM"))?;
            Ok(ident.value.clone())
        }
        other => bail!("unsupported FROM clause: {}", other),
    }
}

fn lower_projection(items: &[sp::SelectItem]) -> Result<Projection> {
    if items.len() == 1 && items[0].to_string().eq_ignore_ascii_case("COUNT(*)") {
        return Ok(Projection::CountStar);
    }

    if let [sp::SelectItem::Wildcard(_)] = items {
        return Ok(Projection::Star);
    }

    let mut columns = Vec::with_capacity(items.len());
    for item in items {
        match item {
            sp::SelectItem::UnnamedExpr(sp::Expr::Identifier(ident)) => {
                columns.push(ident.value.clone());
            }
            other => bail!("unsupported select expression: {}", other),
        }
    }
    Ok(Projection::Columns(columns))
}

fn lower_expr(expr: &sp::Expr) -> Result<Expr> {
    match expr {
        sp::Expr::Identifier(ident) => Ok(Expr::Column(ident.value.clone())),
        sp::Expr::Nested(inner) => lower_expr(inner),
        sp::Expr::Value(value) => Ok(Expr::Literal(lower_literal(value)?)),
        sp::Expr::BinaryOp { left, op, right } => {
            let lhs = Box::new(lower_expr(left)?);
            let rhs = Box::new(lower_expr(right)?);
            match op {
                sp::BinaryOperator::And => Ok(Expr::And(lhs, rhs)),
                sp::BinaryOperator::Or => Ok(Expr::Or(lhs, rhs)),
                _ => {
                    let op = lower_compare_op(op)?;
                    Ok(Expr::Compare { op, lhs, rhs })
                }
            }
        }
        other => bail!("unsupported expression in WHERE clause: {}", other),
    }
}

fn lower_compare_op(op: &sp::BinaryOperator) -> Result<CompareOp> {
    match op {
        sp::BinaryOperator::Eq => Ok(CompareOp::Eq),
        sp::BinaryOperator::NotEq => Ok(CompareOp::NotEq),
        sp::BinaryOperator::Lt => Ok(CompareOp::Lt),
        sp::BinaryOperator::LtEq => Ok(CompareOp::LtEq),
        sp::BinaryOperator::Gt => Ok(CompareOp::Gt),
        sp::BinaryOperator::GtEq => Ok(CompareOp::GtEq),
        other => bail!("unsupported operator: {}", other),
    }
}

fn lower_literal(value: &sp::Value) -> Result<Literal> {
    match value {
        sp::Value::Number(text, _) => {
            if let Ok(i) = text.parse::<i64>() {
                Ok(Literal::Integer(i))
            } else {
                let f: f64 = text
                    .parse()
                    .map_err(|_| eyre!("unsupported numeric literal: {}", text))?;
                Ok(Literal::Float(f))
            }
        }
        sp::Value::SingleQuotedString(s) => Ok(Literal::Text(s.clone())),
        sp::Value::Null => Ok(Literal::Null),
        other => bail!("unsupported literal: {}", other),
    }
}
