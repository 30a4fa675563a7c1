//! Object constraints that are not about a single, named key: required keys,
//! keys matched by pattern, keys matched by nothing, and keys that depend on
//! each other.

use crate::keyed::expected_object;
use crate::{JsonType, ValidationError, ValidationErrorKind, Validator};
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeSet;

/// Validates that a JSON object has every one of a list of keys.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequiredKeysValidator {
    keys: Vec<String>,
}

impl RequiredKeysValidator {
    pub fn new<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }
}

impl Validator for RequiredKeysValidator {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        let obj = value.as_object().ok_or_else(|| expected_object(value))?;
        let missing: Vec<_> = self
            .keys
            .iter()
            .filter(|key| !obj.contains_key(key.as_str()))
            .cloned()
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(ValidationErrorKind::MissingKeys {
                keys: missing,
            }))
        }
    }
}

/// Validates a single key: it must be one of a set of names or match one of a
/// set of patterns.
///
/// Meant to be used as a key validator of a
/// [`KeyedCollectionValidator`](crate::KeyedCollectionValidator).
#[derive(Clone, Debug, Default)]
pub struct AllowedKeysValidator {
    names: BTreeSet<String>,
    patterns: Vec<Regex>,
}

impl AllowedKeysValidator {
    pub fn new<I: IntoIterator<Item = String>>(names: I, patterns: Vec<Regex>) -> Self {
        Self {
            names: names.into_iter().collect(),
            patterns,
        }
    }

    fn allows(&self, key: &str) -> bool {
        self.names.contains(key) || self.patterns.iter().any(|p| p.is_match(key))
    }
}

impl Validator for AllowedKeysValidator {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        match value.as_str() {
            Some(key) if self.allows(key) => Ok(()),
            Some(_) => Err(ValidationError::new(ValidationErrorKind::DisallowedKey)),
            None => Err(ValidationError::new(ValidationErrorKind::TypeMismatch {
                expected: vec![JsonType::String],
                actual: JsonType::of(value),
            })),
        }
    }
}

/// Validates the value of every key matching a pattern.
#[derive(Debug, Default)]
pub struct PatternPropertiesValidator {
    patterns: Vec<(Regex, Box<dyn Validator>)>,
}

impl PatternPropertiesValidator {
    pub fn new(patterns: Vec<(Regex, Box<dyn Validator>)>) -> Self {
        Self { patterns }
    }
}

impl Validator for PatternPropertiesValidator {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        let obj = value.as_object().ok_or_else(|| expected_object(value))?;
        let mut errors = Vec::new();

        for (key, value) in obj {
            for (pattern, validator) in &self.patterns {
                if pattern.is_match(key) {
                    if let Err(err) = validator.validate(value) {
                        errors.push(err.at(key.as_str()));
                    }
                }
            }
        }

        aggregate(errors)
    }
}

/// Validates the value of every key that is neither one of a set of names nor
/// matched by one of a set of patterns.
#[derive(Debug)]
pub struct AdditionalPropertiesValidator {
    known: AllowedKeysValidator,
    validator: Box<dyn Validator>,
}

impl AdditionalPropertiesValidator {
    pub fn new(known: AllowedKeysValidator, validator: Box<dyn Validator>) -> Self {
        Self { known, validator }
    }
}

impl Validator for AdditionalPropertiesValidator {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        let obj = value.as_object().ok_or_else(|| expected_object(value))?;
        let errors = obj
            .iter()
            .filter(|(key, _)| !self.known.allows(key))
            .filter_map(|(key, value)| {
                self.validator
                    .validate(value)
                    .err()
                    .map(|err| err.at(key.as_str()))
            })
            .collect();

        aggregate(errors)
    }
}

/// What the presence of a key implies about the rest of the object.
#[derive(Debug)]
pub enum Dependency {
    /// These keys must be present too.
    Keys(Vec<String>),
    /// The whole object must pass this validator.
    Validated(Box<dyn Validator>),
}

/// Validates the constraints implied by the presence of keys.
#[derive(Debug, Default)]
pub struct DependenciesValidator {
    dependencies: Vec<(String, Dependency)>,
}

impl DependenciesValidator {
    pub fn new(dependencies: Vec<(String, Dependency)>) -> Self {
        Self { dependencies }
    }
}

impl Validator for DependenciesValidator {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        let obj = value.as_object().ok_or_else(|| expected_object(value))?;
        let mut errors = Vec::new();

        for (key, dependency) in &self.dependencies {
            if !obj.contains_key(key) {
                continue;
            }

            let result = match dependency {
                Dependency::Keys(keys) => RequiredKeysValidator::new(keys.iter().cloned())
                    .validate(value),
                Dependency::Validated(validator) => validator.validate(value),
            };

            // The failure is about the whole object, so it stays untagged.
            if let Err(err) = result {
                errors.push(ValidationError::with_causes(
                    ValidationErrorKind::DependencyFailed { key: key.clone() },
                    vec![err],
                ));
            }
        }

        aggregate(errors)
    }
}

fn aggregate(errors: Vec<ValidationError>) -> Result<(), ValidationError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::with_causes(
            ValidationErrorKind::KeyedCollection {
                failures: errors.len(),
            },
            errors,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{KeyValuePairValidator, KeyedCollectionValidator, NumberValidator, TypeValidator};
    use serde_json::json;

    #[test]
    fn required_keys() {
        let validator = RequiredKeysValidator::new(vec!["a", "b"]);
        assert!(validator.validate(&json!({ "a": null, "b": 0 })).is_ok());
        assert_eq!(
            &ValidationErrorKind::MissingKeys {
                keys: vec!["b".to_owned()]
            },
            validator.validate(&json!({ "a": 1 })).unwrap_err().kind()
        );
        assert!(validator.validate(&json!([])).is_err());
    }

    #[test]
    fn allowed_keys_as_key_validator() {
        let allowed = AllowedKeysValidator::new(
            vec!["name".to_owned()],
            vec![Regex::new("^x-").unwrap()],
        );
        let validator = KeyedCollectionValidator::new().with_key_validator(allowed);

        assert!(validator
            .validate(&json!({ "name": 1, "x-custom": 2 }))
            .is_ok());

        let err = validator
            .validate(&json!({ "name": 1, "other": 2 }))
            .unwrap_err();
        assert_eq!(
            vec![("/other".to_owned(), "key is not allowed".to_owned())],
            err.leaves()
        );
    }

    #[test]
    fn pattern_properties() {
        let validator = PatternPropertiesValidator::new(vec![
            (
                Regex::new("^n_").unwrap(),
                Box::new(TypeValidator::new(vec![JsonType::Number])) as Box<dyn Validator>,
            ),
            (
                Regex::new("_pos$").unwrap(),
                Box::new(NumberValidator::new().with_minimum(0.0)) as Box<dyn Validator>,
            ),
        ]);

        assert!(validator
            .validate(&json!({ "n_a": 1, "n_pos": 2, "other": "x" }))
            .is_ok());

        let err = validator
            .validate(&json!({ "n_a": "1", "n_pos": -1 }))
            .unwrap_err();
        assert_eq!(2, err.causes().len());
    }

    #[test]
    fn additional_properties() {
        let validator = AdditionalPropertiesValidator::new(
            AllowedKeysValidator::new(vec!["a".to_owned()], vec![]),
            Box::new(TypeValidator::new(vec![JsonType::String])),
        );

        assert!(validator.validate(&json!({ "a": 1, "b": "s" })).is_ok());
        let err = validator.validate(&json!({ "a": 1, "b": 2 })).unwrap_err();
        assert_eq!("/b", err.leaves()[0].0);
    }

    #[test]
    fn dependencies() {
        let validator = DependenciesValidator::new(vec![
            (
                "card".to_owned(),
                Dependency::Keys(vec!["billing".to_owned()]),
            ),
            (
                "age".to_owned(),
                Dependency::Validated(Box::new(RequiredKeysValidator::new(vec!["birthday"]))),
            ),
        ]);

        assert!(validator.validate(&json!({})).is_ok());
        assert!(validator
            .validate(&json!({ "card": 1, "billing": 2 }))
            .is_ok());

        let err = validator
            .validate(&json!({ "card": 1, "age": 3 }))
            .unwrap_err();
        assert_eq!(
            vec![
                ("".to_owned(), "missing required key(s): billing".to_owned()),
                ("".to_owned(), "missing required key(s): birthday".to_owned()),
            ],
            err.leaves()
        );
        assert_eq!(
            &ValidationErrorKind::DependencyFailed {
                key: "card".to_owned()
            },
            err.causes()[0].kind()
        );
    }

    #[test]
    fn dependency_paths_stay_relative_to_the_object() {
        let nested = KeyedCollectionValidator::new().with_pair(KeyValuePairValidator::new(
            "b",
            TypeValidator::new(vec![JsonType::String]),
        ));
        let validator = DependenciesValidator::new(vec![(
            "a".to_owned(),
            Dependency::Validated(Box::new(nested)),
        )]);

        let err = validator.validate(&json!({ "a": 1, "b": 2 })).unwrap_err();
        assert_eq!(
            vec![("/b".to_owned(), "expected string, found number".to_owned())],
            err.leaves()
        );
    }
}
