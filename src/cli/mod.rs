//! # CLI Dispatch
//!
//! The binary takes a database path and one command. A command starting
//! with `.` is a dot-command; anything else is handed to the SQL layer.
//! Output is returned as lines so the engine stays printable-free and
//! the binary owns stdout and the exit code.

pub mod commands;

pub use commands::run;
