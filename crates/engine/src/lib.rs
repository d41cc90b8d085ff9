//! Minimal in-memory relational table engine: typed tables with schemas,
//! interchangeable secondary indexes (hash, balanced-ordered, and an
//! unbalanced search tree), scan/range/join/project/distinct operators, and
//! an arithmetic expression evaluator for computed columns.
//!
//! Everything is single-threaded and fully resident; indexes are kept
//! current by explicit `add`/`clear` calls, never by subscription to table
//! mutation.

pub mod error;
pub mod expr;
pub mod index;
pub mod schema;
pub mod table;
pub mod tree;
pub mod value;

pub use error::{EngineError, EngineResult};
pub use expr::{evaluate, referenced_variables, BinaryOperator, Expr, UnaryOperator};
pub use index::{build_index, BTreeIndex, HashIndex, Index, IndexKind, RecordId, UnbalancedTreeIndex};
pub use schema::{ColumnDef, Schema};
pub use table::{Record, Table};
pub use tree::UnbalancedSearchTree;
pub use value::{DataType, Value};
