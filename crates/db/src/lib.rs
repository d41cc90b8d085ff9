//! Embeddable application layer over the table engine: a named-table
//! catalog with an explicit index registry, demo student/exam data, query
//! glue, and result rendering.

pub mod database;
pub mod dataset;
pub mod printer;
pub mod queries;

pub use database::Database;
pub use printer::format_table;
