//! Domain logic with no I/O: DDL parsing, query construction, table hierarchy.

pub mod ddl;
pub mod query;
pub mod tables;
