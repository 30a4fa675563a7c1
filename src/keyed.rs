use crate::{JsonType, PathSegment, ValidationError, ValidationErrorKind, Validator};
use serde_json::{Map, Value};

/// Validates a JSON object's count, keys, values, and specific key-value
/// pairs.
///
/// Every part is optional; a missing part places no constraint on the object.
/// All parts are always evaluated, so a single failed validation reports every
/// violation, in the order: count, keys, values, pairs.
///
/// ```
/// use jsonval::{KeyedCollectionValidator, KeyValuePairValidator, NumberValidator};
/// use jsonval::Validator;
/// use serde_json::json;
///
/// let validator = KeyedCollectionValidator::new()
///     .with_count(NumberValidator::new().with_minimum(1.0))
///     .with_pair(KeyValuePairValidator::new("age", NumberValidator::new().with_minimum(0.0)));
///
/// assert!(validator.validate(&json!({ "age": 30 })).is_ok());
/// assert!(validator.validate(&json!({})).is_err());
/// assert!(validator.validate(&json!({ "age": -1 })).is_err());
/// ```
#[derive(Debug, Default)]
pub struct KeyedCollectionValidator {
    count: Option<Box<dyn Validator>>,
    keys: Vec<Box<dyn Validator>>,
    values: Vec<Box<dyn Validator>>,
    pairs: Vec<KeyValuePairValidator>,
}

impl KeyedCollectionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the number of entries, passed to `count` as a JSON number.
    pub fn with_count<V: Validator + 'static>(mut self, count: V) -> Self {
        self.count = Some(Box::new(count));
        self
    }

    /// Adds a validator every key must pass. Keys are passed as JSON strings.
    pub fn with_key_validator<V: Validator + 'static>(mut self, validator: V) -> Self {
        self.keys.push(Box::new(validator));
        self
    }

    /// Adds a validator every value must pass.
    pub fn with_value_validator<V: Validator + 'static>(mut self, validator: V) -> Self {
        self.values.push(Box::new(validator));
        self
    }

    pub fn with_pair(mut self, pair: KeyValuePairValidator) -> Self {
        self.pairs.push(pair);
        self
    }

    pub fn with_pairs<I: IntoIterator<Item = KeyValuePairValidator>>(mut self, pairs: I) -> Self {
        self.pairs.extend(pairs);
        self
    }

    pub fn count_validator(&self) -> Option<&dyn Validator> {
        self.count.as_deref()
    }

    pub fn key_validators(&self) -> &[Box<dyn Validator>] {
        &self.keys
    }

    pub fn value_validators(&self) -> &[Box<dyn Validator>] {
        &self.values
    }

    pub fn key_value_pair_validators(&self) -> &[KeyValuePairValidator] {
        &self.pairs
    }

    pub fn is_unconstrained(&self) -> bool {
        self.count.is_none()
            && self.keys.is_empty()
            && self.values.is_empty()
            && self.pairs.is_empty()
    }

    fn collect_errors(&self, obj: &Map<String, Value>) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if let Some(count) = &self.count {
            if let Err(err) = count.validate(&Value::from(obj.len())) {
                errors.push(err.at(PathSegment::Count));
            }
        }

        if !self.keys.is_empty() {
            for name in obj.keys() {
                let key = Value::String(name.clone());
                for validator in &self.keys {
                    if let Err(err) = validator.validate(&key) {
                        errors.push(err.at(name.as_str()));
                    }
                }
            }
        }

        for (name, value) in obj {
            for validator in &self.values {
                if let Err(err) = validator.validate(value) {
                    errors.push(err.at(name.as_str()));
                }
            }
        }

        for pair in &self.pairs {
            if let Err(err) = pair.validate_entry(obj) {
                errors.push(err);
            }
        }

        errors
    }
}

impl Validator for KeyedCollectionValidator {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        let obj = value.as_object().ok_or_else(|| expected_object(value))?;

        let errors = self.collect_errors(obj);
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
}

/// Validates the value at one key of a JSON object.
///
/// An object without the key passes: whether a key must be present is a
/// separate concern (see [`RequiredKeysValidator`](crate::RequiredKeysValidator)).
#[derive(Debug)]
pub struct KeyValuePairValidator {
    key: String,
    value: Box<dyn Validator>,
}

impl KeyValuePairValidator {
    pub fn new<K: Into<String>, V: Validator + 'static>(key: K, value: V) -> Self {
        Self::from_boxed(key, Box::new(value))
    }

    pub fn from_boxed<K: Into<String>>(key: K, value: Box<dyn Validator>) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value_validator(&self) -> &dyn Validator {
        self.value.as_ref()
    }

    fn validate_entry(&self, obj: &Map<String, Value>) -> Result<(), ValidationError> {
        match obj.get(&self.key) {
            Some(value) => self
                .value
                .validate(value)
                .map_err(|err| err.at(self.key.as_str())),
            None => Ok(()),
        }
    }
}

impl Validator for KeyValuePairValidator {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        match value.as_object() {
            Some(obj) => self.validate_entry(obj),
            None => Ok(()),
        }
    }
}

pub(crate) fn expected_object(value: &Value) -> ValidationError {
    ValidationError::new(ValidationErrorKind::TypeMismatch {
        expected: vec![JsonType::Object],
        actual: JsonType::of(value),
    })
}
