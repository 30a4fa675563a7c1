use crate::{ValidationError, ValidationErrorKind, Validator};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// The coarse JSON classification used to decide which constraints apply to a
/// value.
///
/// Booleans are classified as [`JsonType::Number`]. [`JsonType::Any`] and
/// [`JsonType::Ambiguous`] are never the classification of a value; they only
/// appear in declarations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    Any,
    Object,
    Array,
    String,
    Number,
    Null,
    Ambiguous,
}

impl JsonType {
    /// Classifies a value. Booleans are numbers.
    pub fn of(value: &Value) -> JsonType {
        match value {
            Value::Object(_) => JsonType::Object,
            Value::Array(_) => JsonType::Array,
            Value::String(_) => JsonType::String,
            Value::Number(_) | Value::Bool(_) => JsonType::Number,
            Value::Null => JsonType::Null,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JsonType::Any => "any",
            JsonType::Object => "object",
            JsonType::Array => "array",
            JsonType::String => "string",
            JsonType::Number => "number",
            JsonType::Null => "null",
            JsonType::Ambiguous => "ambiguous",
        }
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JsonType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any" => Ok(Self::Any),
            "object" => Ok(Self::Object),
            "array" => Ok(Self::Array),
            "string" => Ok(Self::String),
            "number" => Ok(Self::Number),
            "null" => Ok(Self::Null),
            _ => Err(()),
        }
    }
}

/// Checks that a value's classification is one of a set of accepted types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeValidator {
    accepted: BTreeSet<JsonType>,
}

impl TypeValidator {
    pub fn new<I: IntoIterator<Item = JsonType>>(accepted: I) -> Self {
        Self {
            accepted: accepted.into_iter().collect(),
        }
    }

    pub fn accepted(&self) -> &BTreeSet<JsonType> {
        &self.accepted
    }

    /// Whether a value classified as `actual` passes this validator.
    pub fn accepts(&self, actual: JsonType) -> bool {
        self.accepted.contains(&JsonType::Any) || self.accepted.contains(&actual)
    }
}

impl Validator for TypeValidator {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        let actual = JsonType::of(value);
        if self.accepts(actual) {
            Ok(())
        } else {
            Err(ValidationError::new(ValidationErrorKind::TypeMismatch {
                expected: self.accepted.iter().copied().collect(),
                actual,
            }))
        }
    }
}
