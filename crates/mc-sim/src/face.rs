//! Face identifiers

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single die face, either a number or a label
///
/// Faces order numbers before labels, then naturally within each kind, so
/// every table built from them sorts deterministically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Face {
    Int(i64),
    Text(String),
}

impl Face {
    /// Numeric value, if this is a numbered face
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Face::Int(v) => Some(*v),
            Face::Text(_) => None,
        }
    }

    /// Label, if this is a text face
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Face::Int(_) => None,
            Face::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Face::Int(v) => write!(f, "{}", v),
            Face::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Face {
    fn from(v: i64) -> Self {
        Face::Int(v)
    }
}

impl From<i32> for Face {
    fn from(v: i32) -> Self {
        Face::Int(v as i64)
    }
}

impl From<u32> for Face {
    fn from(v: u32) -> Self {
        Face::Int(v as i64)
    }
}

impl From<&str> for Face {
    fn from(s: &str) -> Self {
        Face::Text(s.to_string())
    }
}

impl From<String> for Face {
    fn from(s: String) -> Self {
        Face::Text(s)
    }
}

impl From<char> for Face {
    fn from(c: char) -> Self {
        Face::Text(c.to_string())
    }
}

/// Convert any iterable of face-like values into faces
pub fn faces<I, F>(values: I) -> Vec<Face>
where
    I: IntoIterator<Item = F>,
    F: Into<Face>,
{
    values.into_iter().map(Into::into).collect()
}
