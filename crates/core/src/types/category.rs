//! Category identifier with string coercion.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A category identifier.
///
/// The back-office API is not consistent about whether category ids are
/// JSON numbers or strings, and the same category can be referenced both
/// ways within one payload. `CategoryId` unifies them by string coercion:
/// the number `5` and the string `"5"` are the same id.
///
/// ```
/// use backroom_core::CategoryId;
/// use serde_json::json;
///
/// let a = CategoryId::from_value(&json!(5)).unwrap();
/// let b = CategoryId::from_value(&json!("5")).unwrap();
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    /// Create an id from a string value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Coerce a JSON scalar into an id.
    ///
    /// Strings are taken as-is and numbers are stringified; anything else
    /// (null, booleans, containers) does not identify a category and yields
    /// `None`.
    #[must_use]
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Some(Self(s.clone())),
            serde_json::Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the id and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CategoryId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for CategoryId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl<'de> Deserialize<'de> for CategoryId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Self(s),
            Raw::Number(n) => Self(n.to_string()),
        })
    }
}
