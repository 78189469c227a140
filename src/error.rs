use thiserror::Error;

use crate::data_type::DataType;

/// Failure conditions of the table operators.
///
/// Every operator either returns a complete new table or one of these; no input
/// table is modified when an error is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("tuple has {found} values but the schema has {expected} attributes")]
    ArityMismatchOnInsert { expected: usize, found: usize },

    #[error("type mismatch on attribute {attribute:?}: expected {expected}, found {found}")]
    TypeMismatch {
        attribute: String,
        expected: DataType,
        found: DataType,
    },

    #[error("tables are not union compatible: {0}")]
    SchemaIncompatible(String),

    #[error("join attribute lists differ in length: {left} vs {right}")]
    ArityMismatch { left: usize, right: usize },

    #[error("attribute {0:?} not found")]
    AttributeNotFound(String),

    #[error("attribute {0:?} appears more than once")]
    DuplicateAttribute(String),

    #[error("{attributes} attribute names but {domains} domains")]
    DomainCountMismatch { attributes: usize, domains: usize },

    #[error("a table needs at least one key attribute")]
    EmptyKey,

    #[error("unknown domain {0:?}")]
    UnknownDomain(String),
}

pub type Result<T> = std::result::Result<T, TableError>;

/// Failures of the persistence collaborator.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("table {0:?} not found in store")]
    NotFound(String),

    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("encode error: {0}")]
    Encode(#[source] bincode::Error),

    #[error("decode error: {0}")]
    Decode(#[source] bincode::Error),

    #[error("unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion { expected: u32, found: u32 },

    #[error("stored table rejected: {0}")]
    Table(#[from] TableError),
}
