use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use allocative::Allocative;

/// Represents a single cell stored in a table.
///
/// Every comparison in the engine goes through the value's canonical form:
/// two values are equal iff their canonical strings are equal, and ordered
/// the way their canonical strings order lexicographically. Nothing is ever
/// interpreted as a number, so `"10000" < "9000"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Allocative)]
pub enum Value {
    /// An absent cell. It has no canonical form, is never indexed and never
    /// satisfies a condition.
    Null,
    /// A UTF-8 string value, wrapped in an [Arc] so that rows and index keys
    /// can share it cheaply.
    Text(Arc<str>),
}

impl Value {
    /// Returns `true` if the value is [Value::Null].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the canonical string used for ordering and equality, or `None`
    /// for an absent value.
    pub fn canonical(&self) -> Option<&str> {
        match self {
            Self::Null => None,
            Self::Text(s) => Some(&**s),
        }
    }

    /// Returns the shared canonical string, used as an index key.
    pub(crate) fn canonical_key(&self) -> Option<Arc<str>> {
        match self {
            Self::Null => None,
            Self::Text(s) => Some(Arc::clone(s)),
        }
    }

    /// Orders two values by canonical form. [Value::Null] sorts first.
    pub fn cmp_canonical(&self, other: &Self) -> Ordering {
        self.canonical().cmp(&other.canonical())
    }
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

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Text(s) => f.write_str(s),
        }
    }
}
