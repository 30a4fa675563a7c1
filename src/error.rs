use crate::JsonType;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Where inside a larger structure a failure occurred, relative to the
/// container that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PathSegment {
    /// A key of an object.
    Key(String),

    /// An index of an array.
    Index(usize),

    /// The number of entries of a collection, rather than any one entry.
    Count,
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(&key.replace('~', "~0").replace('/', "~1")),
            PathSegment::Index(index) => write!(f, "{}", index),
            PathSegment::Count => f.write_str("#count"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_owned())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// What went wrong in a single validation failure.
///
/// The `Display` output of a kind is the failure's human-readable
/// description.
#[derive(Clone, Debug, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ValidationErrorKind {
    #[error("expected {}, found {actual}", describe_types(.expected))]
    TypeMismatch {
        expected: Vec<JsonType>,
        actual: JsonType,
    },

    #[error("{failures} constraint(s) on the object failed")]
    KeyedCollection { failures: usize },

    #[error("{failures} constraint(s) on the array failed")]
    Collection { failures: usize },

    #[error("{count} constraint(s) failed")]
    Multiple { count: usize },

    #[error("{failures} of {total} validators failed")]
    AllOf { failures: usize, total: usize },

    #[error("no validator passed")]
    NoneMatched,

    #[error("value passed a negated validator")]
    NegationMatched,

    #[error("expected exactly one validator to pass, {matched} passed")]
    ExclusionViolated { matched: usize },

    #[error("value is not one of the allowed values")]
    NotInValueSet,

    #[error("string has {actual} characters, fewer than {min}")]
    StringTooShort { min: u64, actual: u64 },

    #[error("string has {actual} characters, more than {max}")]
    StringTooLong { max: u64, actual: u64 },

    #[error("string does not match pattern {pattern:?}")]
    PatternMismatch { pattern: String },

    #[error("string is not a valid {format}")]
    InvalidFormat { format: String },

    #[error("number is {} {minimum}", below_relation(.exclusive))]
    BelowMinimum { minimum: f64, exclusive: bool },

    #[error("number is {} {maximum}", above_relation(.exclusive))]
    AboveMaximum { maximum: f64, exclusive: bool },

    #[error("number is not a multiple of {divisor}")]
    NotMultipleOf { divisor: f64 },

    #[error("number is not an integer")]
    NotInteger,

    #[error("missing required key(s): {}", join_keys(.keys))]
    MissingKeys { keys: Vec<String> },

    #[error("key is not allowed")]
    DisallowedKey,

    #[error("constraints implied by key {key:?} failed")]
    DependencyFailed { key: String },

    #[error("duplicates the element at index {first}")]
    DuplicateElement { first: usize },

    #[error("element is not allowed")]
    UnexpectedElement,

    #[error("invalid value")]
    Invalid,

    #[error("{message}")]
    Custom { message: String },
}

fn below_relation(exclusive: &bool) -> &'static str {
    if *exclusive {
        "not greater than"
    } else {
        "less than"
    }
}

fn above_relation(exclusive: &bool) -> &'static str {
    if *exclusive {
        "not less than"
    } else {
        "greater than"
    }
}

fn join_keys(keys: &[String]) -> String {
    keys.join(", ")
}

fn describe_types(types: &[JsonType]) -> String {
    match types {
        [] => "no type at all".to_owned(),
        [only] => only.to_string(),
        _ => {
            let names: Vec<_> = types.iter().map(|t| t.as_str()).collect();
            format!("one of {}", names.join(", "))
        }
    }
}

/// A failed validation.
///
/// Errors form a tree: containers wrap the failures of their sub-validators,
/// tagging each with the [`PathSegment`] that produced it, so the full path of
/// a failure is the sequence of segments from the root down to it.
#[derive(Clone, Debug, PartialEq, Error, Serialize)]
#[error("{kind}")]
pub struct ValidationError {
    #[serde(flatten)]
    kind: ValidationErrorKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<PathSegment>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    causes: Vec<ValidationError>,
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind) -> Self {
        Self {
            kind,
            path: None,
            causes: Vec::new(),
        }
    }

    /// An error aggregating the failures of sub-validators.
    pub fn with_causes(kind: ValidationErrorKind, causes: Vec<ValidationError>) -> Self {
        Self {
            kind,
            path: None,
            causes,
        }
    }

    pub fn custom<S: Into<String>>(message: S) -> Self {
        Self::new(ValidationErrorKind::Custom {
            message: message.into(),
        })
    }

    pub fn kind(&self) -> &ValidationErrorKind {
        &self.kind
    }

    pub fn description(&self) -> String {
        self.kind.to_string()
    }

    pub fn path(&self) -> Option<&PathSegment> {
        self.path.as_ref()
    }

    pub fn causes(&self) -> &[ValidationError] {
        &self.causes
    }

    /// Tags this error with the segment of the container that produced it.
    ///
    /// An error that already carries a segment is wrapped in a new
    /// [`ValidationErrorKind::Invalid`] error so that no segment is lost.
    pub fn at<P: Into<PathSegment>>(self, segment: P) -> Self {
        let segment = segment.into();
        if self.path.is_none() {
            Self {
                path: Some(segment),
                ..self
            }
        } else {
            Self {
                kind: ValidationErrorKind::Invalid,
                path: Some(segment),
                causes: vec![self],
            }
        }
    }

    /// Flattens the tree into its leaf failures, each paired with the JSON
    /// pointer of its full path from this error.
    pub fn leaves(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        self.collect_leaves(&mut Vec::new(), &mut out);
        out
    }

    fn collect_leaves<'a>(
        &'a self,
        path: &mut Vec<&'a PathSegment>,
        out: &mut Vec<(String, String)>,
    ) {
        if let Some(segment) = &self.path {
            path.push(segment);
        }

        if self.causes.is_empty() {
            let pointer: String = path.iter().map(|s| format!("/{}", s)).collect();
            out.push((pointer, self.description()));
        } else {
            for cause in &self.causes {
                cause.collect_leaves(path, out);
            }
        }

        if self.path.is_some() {
            path.pop();
        }
    }
}
