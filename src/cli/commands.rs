//! # Command Handling
//!
//! Two dot-commands exist:
//!
//! | Command    | Output                                              |
//! |------------|-----------------------------------------------------|
//! | `.dbinfo`  | page size and the schema-row count                  |
//! | `.tables`  | space-separated table names, schema order           |
//!
//! Any other dot-command is an error (`Unknown command <cmd>`). The
//! `.dbinfo` page-size line carries two spaces after the colon, and its
//! "number of tables" counts every schema row, indexes included; both
//! quirks are part of the output contract.

use eyre::{bail, Result};

use crate::Database;

/// Executes one command against an open database, returning output lines.
pub fn run(db: &Database, command: &str) -> Result<Vec<String>> {
    if command.starts_with('.') {
        run_dot_command(db, command)
    } else {
        db.execute_sql(command)
    }
}

fn run_dot_command(db: &Database, command: &str) -> Result<Vec<String>> {
    match command {
        ".dbinfo" => Ok(vec![
            format!("database page size:  {}", db.page_size()),
            format!("number of tables: {}", db.object_count()),
        ]),
        ".tables" => Ok(vec![db.table_names().join(" ")]),
        other => bail!("Unknown command {}", other),
    }
}
