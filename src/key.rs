use std::fmt;

use allocative::Allocative;

use crate::value::Value;

/// A composite key value: the values found at a table's key columns, in key
/// order. Compared lexicographically over the value sequence.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Allocative)]
pub struct KeyValue(Vec<Value>);

impl KeyValue {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    /// Projects `tuple` onto `columns`. The columns must be in range.
    pub(crate) fn from_tuple(tuple: &[Value], columns: &[usize]) -> Self {
        Self(columns.iter().map(|&c| tuple[c].clone()).collect())
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Value> for KeyValue {
    fn from(value: Value) -> Self {
        Self(vec![value])
    }
}

impl From<Vec<Value>> for KeyValue {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl From<&str> for KeyValue {
    fn from(s: &str) -> Self {
        Self(vec![Value::from(s)])
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{v}")?;
        }
        f.write_str(")")
    }
}
