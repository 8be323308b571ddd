//! Subcommand implementations.

pub mod columns;
pub mod gen;
pub mod list;
pub mod query;
