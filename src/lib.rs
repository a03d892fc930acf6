//! Table browser backend core: compiles declarative filter trees into SQL
//! restriction clauses and assembles the surrounding browse statements.

pub mod compiler;
pub mod filter;
pub mod import;
pub mod schema;
pub mod statement;
