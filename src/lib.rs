//! # Lithic - Read-Only SQLite File Query Engine
//!
//! Lithic answers catalog questions and restricted SELECT queries against a
//! single SQLite 3 database file without ever writing to it. It exists to
//! make the hard parts of a relational storage engine visible: the on-disk
//! binary format, B-tree traversal, variable-length integers, and the
//! schema-driven mapping from raw byte streams to typed values.
//!
//! ## Quick Start
//!
//! ```ignore
//! use lithic::Database;
//!
//! let db = Database::open("./sample.db")?;
//! for line in db.execute_sql("SELECT name, country FROM companies WHERE country = 'US'")? {
//!     println!("{line}");
//! }
//! ```
//!
//! ## Architecture
//!
//! Lithic uses a layered architecture, leaves first:
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │      CLI (dot commands + SQL)        │
//! ├──────────────────────────────────────┤
//! │ Query Executor (plan/filter/project) │
//! ├──────────────────────────────────────┤
//! │  Schema Catalog  │  SQL Front End    │
//! ├──────────────────┼───────────────────┤
//! │  Table B-Tree    │  Index B-Tree     │
//! ├──────────────────────────────────────┤
//! │   Record Decoder (serial types)      │
//! ├──────────────────────────────────────┤
//! │   Page Layer (header + cell array)   │
//! ├──────────────────────────────────────┤
//! │ Byte Decoders + Memory-Mapped File   │
//! └──────────────────────────────────────┘
//! ```
//!
//! ## Scope
//!
//! The engine is strictly read-only and single-threaded. Writes,
//! transactions, WAL/journal handling, page-cache eviction, concurrent
//! readers, encryption, and non-binary collations are out of scope.
//! Payloads that spill to overflow pages are reported as format errors.
//!
//! ## Module Overview
//!
//! - [`encoding`]: big-endian fixed-width readers and the 1..9-byte varint
//! - [`storage`]: file header, read-only mmap, B-tree page headers
//! - [`records`]: serial-typed record decoding into tagged values
//! - [`btree`]: table-tree scan/lookup and index-tree equality probe
//! - [`schema`]: catalog bootstrap from page 1, CREATE TABLE column parsing
//! - [`sql`]: sqlparser front end, WHERE evaluator, query executor
//! - [`cli`]: dot-command and SQL dispatch for the binary

pub mod btree;
pub mod cli;
pub mod database;
pub mod encoding;
pub mod records;
pub mod schema;
pub mod sql;
pub mod storage;

pub use database::Database;
pub use records::{Record, Value};
