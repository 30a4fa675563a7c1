use crate::number::combine;
use crate::{JsonType, ValidationError, ValidationErrorKind, Validator};
use chrono::DateTime;
use regex::Regex;
use serde_json::Value;
use std::str::FromStr;

/// String formats that can be checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// An RFC 3339 timestamp.
    DateTime,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Format::DateTime => "date-time",
        }
    }

    fn matches(self, s: &str) -> bool {
        match self {
            Format::DateTime => DateTime::parse_from_rfc3339(s).is_ok(),
        }
    }
}

impl FromStr for Format {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date-time" => Ok(Self::DateTime),
            _ => Err(()),
        }
    }
}

/// Validates JSON strings by length (in characters), pattern, and format.
///
/// Patterns are unanchored: a string passes if the pattern matches anywhere in
/// it.
#[derive(Clone, Debug, Default)]
pub struct StringValidator {
    min_length: Option<u64>,
    max_length: Option<u64>,
    pattern: Option<Regex>,
    format: Option<Format>,
}

impl StringValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_length(mut self, min: u64) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn with_max_length(mut self, max: u64) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn with_pattern(self, pattern: &str) -> Result<Self, regex::Error> {
        Ok(self.with_regex(Regex::new(pattern)?))
    }

    pub fn with_regex(mut self, regex: Regex) -> Self {
        self.pattern = Some(regex);
        self
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    pub fn is_unconstrained(&self) -> bool {
        self.min_length.is_none()
            && self.max_length.is_none()
            && self.pattern.is_none()
            && self.format.is_none()
    }
}

impl Validator for StringValidator {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        let s = value.as_str().ok_or_else(|| {
            ValidationError::new(ValidationErrorKind::TypeMismatch {
                expected: vec![JsonType::String],
                actual: JsonType::of(value),
            })
        })?;

        let mut errors = Vec::new();
        let length = s.chars().count() as u64;

        if let Some(min) = self.min_length {
            if length < min {
                errors.push(ValidationErrorKind::StringTooShort {
                    min,
                    actual: length,
                });
            }
        }

        if let Some(max) = self.max_length {
            if length > max {
                errors.push(ValidationErrorKind::StringTooLong {
                    max,
                    actual: length,
                });
            }
        }

        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(s) {
                errors.push(ValidationErrorKind::PatternMismatch {
                    pattern: pattern.as_str().to_owned(),
                });
            }
        }

        if let Some(format) = self.format {
            if !format.matches(s) {
                errors.push(ValidationErrorKind::InvalidFormat {
                    format: format.as_str().to_owned(),
                });
            }
        }

        combine(errors)
    }
}
