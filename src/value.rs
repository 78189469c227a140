use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use allocative::Allocative;
use serde::{Deserialize, Serialize};

use crate::data_type::DataType;

/// Represents a single data value stored in a tuple.
///
/// Each variant corresponds to exactly one [DataType]; a value conforms to a
/// domain only when [Value::data_type] returns that domain.
///
/// Values are totally ordered: first by variant (in declaration order), then by
/// payload. Floating-point payloads use [f64::total_cmp], so equality, ordering
/// and hashing agree with each other and values can key ordered and hashed maps.
#[derive(Debug, Clone, Serialize, Deserialize, Allocative)]
pub enum Value {
    /// A 64-bit signed integer value.
    Long(i64),
    /// A 32-bit signed integer value.
    Integer(i32),
    /// A 16-bit signed integer value.
    Short(i16),
    /// An 8-bit signed integer value.
    Byte(i8),
    /// A 64-bit floating-point value.
    Double(f64),
    /// A 32-bit floating-point value.
    Float(f32),
    /// A single character.
    Char(#[allocative(skip)] char),
    /// A UTF-8 string value, wrapped in an [Arc] for cheap cloning when tuples
    /// are copied into derived tables.
    Text(Arc<str>),
    /// A boolean value.
    Bool(bool),
}

impl Value {
    /// Returns the [DataType] this value belongs to.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Long(_) => DataType::Long,
            Self::Integer(_) => DataType::Integer,
            Self::Short(_) => DataType::Short,
            Self::Byte(_) => DataType::Byte,
            Self::Double(_) => DataType::Double,
            Self::Float(_) => DataType::Float,
            Self::Char(_) => DataType::Char,
            Self::Text(_) => DataType::Text,
            Self::Bool(_) => DataType::Bool,
        }
    }

    /// Returns the value widened to `i64` if it is one of the integer variants.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Long(i) => Some(*i),
            Self::Integer(i) => Some(i64::from(*i)),
            Self::Short(i) => Some(i64::from(*i)),
            Self::Byte(i) => Some(i64::from(*i)),
            _ => None,
        }
    }

    /// Returns the value widened to `f64` if it is one of the real variants.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Double(f) => Some(*f),
            Self::Float(f) => Some(f64::from(*f)),
            _ => None,
        }
    }

    /// Returns a reference to the inner string slice if this is a [Value::Text].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the inner character if this is a [Value::Char].
    pub fn as_char(&self) -> Option<char> {
        match self {
            Self::Char(c) => Some(*c),
            _ => None,
        }
    }

    /// Returns the inner boolean value if this is a [Value::Bool].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Long(_) => 0,
            Self::Integer(_) => 1,
            Self::Short(_) => 2,
            Self::Byte(_) => 3,
            Self::Double(_) => 4,
            Self::Float(_) => 5,
            Self::Char(_) => 6,
            Self::Text(_) => 7,
            Self::Bool(_) => 8,
        }
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Long(a), Self::Long(b)) => a.cmp(b),
            (Self::Integer(a), Self::Integer(b)) => a.cmp(b),
            (Self::Short(a), Self::Short(b)) => a.cmp(b),
            (Self::Byte(a), Self::Byte(b)) => a.cmp(b),
            (Self::Double(a), Self::Double(b)) => a.total_cmp(b),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            (Self::Char(a), Self::Char(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Self::Long(v) => v.hash(state),
            Self::Integer(v) => v.hash(state),
            Self::Short(v) => v.hash(state),
            Self::Byte(v) => v.hash(state),
            Self::Double(v) => v.to_bits().hash(state),
            Self::Float(v) => v.to_bits().hash(state),
            Self::Char(v) => v.hash(state),
            Self::Text(v) => v.hash(state),
            Self::Bool(v) => v.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Long(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Short(v) => write!(f, "{v}"),
            Self::Byte(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Char(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

impl_from! {
    i64 => Long,
    i32 => Integer,
    i16 => Short,
    i8 => Byte,
    f64 => Double,
    f32 => Float,
    char => Char,
    bool => Bool,
    Arc<str> => Text,
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(Arc::from(s))
    }
}
