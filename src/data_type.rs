use std::fmt;
use std::str::FromStr;

use allocative::Allocative;
use serde::{Deserialize, Serialize};

use crate::error::TableError;

/// The domain of an attribute: the kind of value every tuple must hold at that
/// position. Values are checked against it on insert with no coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Allocative)]
pub enum DataType {
    /// A 64-bit signed integer.
    Long,
    /// A 32-bit signed integer.
    Integer,
    /// A 16-bit signed integer.
    Short,
    /// An 8-bit signed integer.
    Byte,
    /// A 64-bit floating-point number.
    Double,
    /// A 32-bit floating-point number.
    Float,
    /// A single character.
    Char,
    /// A variable-length UTF-8 character string.
    Text,
    /// A boolean value (true or false).
    Bool,
}

impl DataType {
    /// Canonical spelling, as accepted by [DataType::from_str].
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Long => "Long",
            Self::Integer => "Integer",
            Self::Short => "Short",
            Self::Byte => "Byte",
            Self::Double => "Double",
            Self::Float => "Float",
            Self::Char => "Character",
            Self::Text => "String",
            Self::Bool => "Boolean",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = TableError;

    /// Parses a domain name such as `"Integer"` or `"String"` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "long" | "bigint" => Ok(Self::Long),
            "integer" | "int" => Ok(Self::Integer),
            "short" | "smallint" => Ok(Self::Short),
            "byte" | "tinyint" => Ok(Self::Byte),
            "double" | "real" => Ok(Self::Double),
            "float" => Ok(Self::Float),
            "character" | "char" => Ok(Self::Char),
            "string" | "text" => Ok(Self::Text),
            "boolean" | "bool" => Ok(Self::Bool),
            _ => Err(TableError::UnknownDomain(s.to_string())),
        }
    }
}
