//! # Restricted SELECT AST
//!
//! The shape of a query after lowering: a single table, a projection
//! that is `COUNT(*)`, `*`, or a list of column names, and an optional
//! filter built from comparisons, AND, and OR. Anything the lowering
//! could not express in this shape was already rejected as unsupported.

use crate::records::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    pub table: String,
    pub projection: Projection,
    pub filter: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    CountStar,
    Star,
    Columns(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Literal {
    pub fn to_value(&self) -> Value {
        match self {
            Literal::Null => Value::Null,
            Literal::Integer(i) => Value::Int(*i),
            Literal::Float(f) => Value::Float(*f),
            Literal::Text(s) => Value::Text(s.as_bytes().to_vec()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Column(String),
    Literal(Literal),
    Compare {
        op: CompareOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Finds an equality test `column = literal` at the top level of the
    /// filter, looking through AND conjunctions (an OR branch cannot be
    /// served by an index probe alone). Returns the column name and the
    /// compared literal.
    pub fn equality_on_column(&self) -> Option<(&str, &Literal)> {
        match self {
            Expr::Compare {
                op: CompareOp::Eq,
                lhs,
                rhs,
            } => match (lhs.as_ref(), rhs.as_ref()) {
                (Expr::Column(name), Expr::Literal(lit))
                | (Expr::Literal(lit), Expr::Column(name)) => Some((name, lit)),
                _ => None,
            },
            Expr::And(lhs, rhs) => lhs
                .equality_on_column()
                .or_else(|| rhs.equality_on_column()),
            _ => None,
        }
    }
}
