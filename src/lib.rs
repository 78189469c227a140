//! An in-memory relational table engine.
//!
//! A [Table] holds typed tuples under a [Schema] and a primary-key index.
//! Relational operators (project, select, union, minus and three joins) read
//! one or two tables and return a new, independently owned table.

pub mod algebra;
pub mod data_type;
pub mod error;
pub mod join;
pub mod key;
pub mod schema;
pub mod store;
pub mod table;
pub mod value;

pub use data_type::DataType;
pub use error::{Result, StoreError, TableError};
pub use key::KeyValue;
pub use schema::{ColumnDef, Schema, Tuple};
pub use store::{Store, StoreConfig};
pub use table::Table;
pub use value::Value;
