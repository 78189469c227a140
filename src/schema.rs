use std::collections::HashSet;

use allocative::Allocative;
use serde::{Deserialize, Serialize};

use crate::data_type::DataType;
use crate::error::{Result, TableError};
use crate::key::KeyValue;
use crate::value::Value;

/// One row: an ordered sequence of values aligned with a schema's columns.
pub type Tuple = Vec<Value>;

/// Column definition in the schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Allocative)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Attribute names, their domains and the primary-key attributes of a table.
///
/// A schema is validated once on construction and immutable afterwards:
/// attribute names are distinct, the key is non-empty and every key attribute
/// is one of the columns. The key's column positions are resolved up front.
#[derive(Debug, Clone, PartialEq, Eq, Allocative)]
pub struct Schema {
    columns: Vec<ColumnDef>,
    key: Vec<String>,
    key_columns: Vec<usize>,
}

impl Schema {
    pub fn new(columns: Vec<ColumnDef>, key: Vec<String>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        for col in &columns {
            if !seen.insert(col.name.as_str()) {
                return Err(TableError::DuplicateAttribute(col.name.clone()));
            }
        }
        if key.is_empty() {
            return Err(TableError::EmptyKey);
        }
        let key_columns = resolve(&columns, &key)?;
        Ok(Self {
            columns,
            key,
            key_columns,
        })
    }

    /// Builds a schema from parallel attribute and domain lists.
    pub fn from_parts<S: Into<String>>(
        attributes: Vec<S>,
        domains: Vec<DataType>,
        key: Vec<String>,
    ) -> Result<Self> {
        if attributes.len() != domains.len() {
            return Err(TableError::DomainCountMismatch {
                attributes: attributes.len(),
                domains: domains.len(),
            });
        }
        let columns = attributes
            .into_iter()
            .zip(domains)
            .map(|(name, data_type)| ColumnDef::new(name, data_type))
            .collect();
        Self::new(columns, key)
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn attributes(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn domains(&self) -> Vec<DataType> {
        self.columns.iter().map(|c| c.data_type).collect()
    }

    pub fn key(&self) -> &[String] {
        &self.key
    }

    /// Column positions of the key attributes, in key order.
    pub fn key_columns(&self) -> &[usize] {
        &self.key_columns
    }

    pub fn arity(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index_of(&self, attribute: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == attribute)
    }

    /// Maps every requested attribute name to its column position.
    ///
    /// # Errors
    /// [TableError::AttributeNotFound] naming the first attribute that is not
    /// part of this schema.
    pub fn resolve_columns<S: AsRef<str>>(&self, attributes: &[S]) -> Result<Vec<usize>> {
        resolve(&self.columns, attributes)
    }

    /// Projects the domain sequence onto `columns`, in the given order.
    pub fn extract_domains(&self, columns: &[usize]) -> Vec<DataType> {
        columns.iter().map(|&c| self.columns[c].data_type).collect()
    }

    /// Checks that `tuple` has one value per attribute and that each value's kind
    /// is exactly the domain declared at that position.
    pub fn type_check(&self, tuple: &[Value]) -> Result<()> {
        if tuple.len() != self.columns.len() {
            return Err(TableError::ArityMismatchOnInsert {
                expected: self.columns.len(),
                found: tuple.len(),
            });
        }
        for (value, col) in tuple.iter().zip(&self.columns) {
            if value.data_type() != col.data_type {
                return Err(TableError::TypeMismatch {
                    attribute: col.name.clone(),
                    expected: col.data_type,
                    found: value.data_type(),
                });
            }
        }
        Ok(())
    }

    /// Two schemas are union compatible when they have the same arity and the
    /// same domains position by position. Attribute names are not compared.
    pub fn union_compatible(&self, other: &Schema) -> bool {
        self.incompatibility(other).is_none()
    }

    /// Describes why `other` is not union compatible with this schema.
    pub(crate) fn incompatibility(&self, other: &Schema) -> Option<String> {
        if self.arity() != other.arity() {
            return Some(format!(
                "different arity, {} vs {}",
                self.arity(),
                other.arity()
            ));
        }
        self.columns
            .iter()
            .zip(&other.columns)
            .position(|(a, b)| a.data_type != b.data_type)
            .map(|j| {
                format!(
                    "disagree on domain {j}, {} vs {}",
                    self.columns[j].data_type, other.columns[j].data_type
                )
            })
    }

    /// Composite key value of a tuple conforming to this schema.
    pub fn key_of(&self, tuple: &[Value]) -> KeyValue {
        KeyValue::from_tuple(tuple, &self.key_columns)
    }
}

fn resolve<S: AsRef<str>>(columns: &[ColumnDef], attributes: &[S]) -> Result<Vec<usize>> {
    attributes
        .iter()
        .map(|attr| {
            let attr = attr.as_ref();
            columns
                .iter()
                .position(|c| c.name == attr)
                .ok_or_else(|| TableError::AttributeNotFound(attr.to_string()))
        })
        .collect()
}

/// Builds a new tuple from the values of `tuple` at `columns`, in that order.
pub fn extract_columns(tuple: &[Value], columns: &[usize]) -> Tuple {
    columns.iter().map(|&c| tuple[c].clone()).collect()
}

/// Merges two attribute lists for a join result. Left names pass unchanged; a
/// right name that collides with a left name gets a `2` appended.
///
/// Collisions are only checked against the left side. A renamed attribute that
/// still clashes is rejected later, when the merged [Schema] is built.
pub fn disambiguate_names<L: AsRef<str>, R: AsRef<str>>(left: &[L], right: &[R]) -> Vec<String> {
    let left_names: HashSet<&str> = left.iter().map(AsRef::as_ref).collect();
    left.iter()
        .map(|a| a.as_ref().to_string())
        .chain(right.iter().map(|a| {
            let a = a.as_ref();
            if left_names.contains(a) {
                format!("{a}2")
            } else {
                a.to_string()
            }
        }))
        .collect()
}
