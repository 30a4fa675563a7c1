use crate::value_set::json_equal;
use crate::{JsonType, PathSegment, ValidationError, ValidationErrorKind, Validator};
use serde_json::Value;

/// Validates a JSON array's count and every one of its elements.
///
/// Like [`KeyedCollectionValidator`](crate::KeyedCollectionValidator), every
/// part is optional and every violation is reported.
#[derive(Debug, Default)]
pub struct CollectionValidator {
    count: Option<Box<dyn Validator>>,
    elements: Vec<Box<dyn Validator>>,
}

impl CollectionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the number of elements, passed to `count` as a JSON number.
    pub fn with_count<V: Validator + 'static>(mut self, count: V) -> Self {
        self.count = Some(Box::new(count));
        self
    }

    pub fn with_element_validator<V: Validator + 'static>(self, validator: V) -> Self {
        self.with_boxed_element_validator(Box::new(validator))
    }

    pub fn with_boxed_element_validator(mut self, validator: Box<dyn Validator>) -> Self {
        self.elements.push(validator);
        self
    }

    pub fn is_unconstrained(&self) -> bool {
        self.count.is_none() && self.elements.is_empty()
    }
}

impl Validator for CollectionValidator {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        let arr = value.as_array().ok_or_else(|| expected_array(value))?;
        let mut errors = Vec::new();

        if let Some(count) = &self.count {
            if let Err(err) = count.validate(&Value::from(arr.len())) {
                errors.push(err.at(PathSegment::Count));
            }
        }

        for (index, element) in arr.iter().enumerate() {
            for validator in &self.elements {
                if let Err(err) = validator.validate(element) {
                    errors.push(err.at(index));
                }
            }
        }

        aggregate(errors)
    }
}

/// What to do with elements past the positional validators of an
/// [`ItemsValidator`].
#[derive(Debug)]
pub enum AdditionalItems {
    Allowed,
    Forbidden,
    Validated(Box<dyn Validator>),
}

/// Validates a JSON array positionally: element `i` must pass validator `i`.
#[derive(Debug)]
pub struct ItemsValidator {
    items: Vec<Box<dyn Validator>>,
    additional: AdditionalItems,
}

impl ItemsValidator {
    pub fn new(items: Vec<Box<dyn Validator>>, additional: AdditionalItems) -> Self {
        Self { items, additional }
    }
}

impl Validator for ItemsValidator {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        let arr = value.as_array().ok_or_else(|| expected_array(value))?;
        let mut errors = Vec::new();

        for (index, element) in arr.iter().enumerate() {
            let result = match (self.items.get(index), &self.additional) {
                (Some(validator), _) => validator.validate(element),
                (None, AdditionalItems::Allowed) => Ok(()),
                (None, AdditionalItems::Forbidden) => Err(ValidationError::new(
                    ValidationErrorKind::UnexpectedElement,
                )),
                (None, AdditionalItems::Validated(validator)) => validator.validate(element),
            };

            if let Err(err) = result {
                errors.push(err.at(index));
            }
        }

        aggregate(errors)
    }
}

/// Validates that no two elements of a JSON array are equal.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniqueElementsValidator;

impl Validator for UniqueElementsValidator {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        let arr = value.as_array().ok_or_else(|| expected_array(value))?;
        let mut errors = Vec::new();

        for (index, element) in arr.iter().enumerate() {
            if let Some(first) = arr[..index].iter().position(|e| json_equal(e, element)) {
                errors.push(
                    ValidationError::new(ValidationErrorKind::DuplicateElement { first }).at(index),
                );
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
            ValidationErrorKind::Collection {
                failures: errors.len(),
            },
            errors,
        ))
    }
}

fn expected_array(value: &Value) -> ValidationError {
    ValidationError::new(ValidationErrorKind::TypeMismatch {
        expected: vec![JsonType::Array],
        actual: JsonType::of(value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NumberValidator, StringValidator, TypeValidator};
    use serde_json::json;

    #[test]
    fn count_and_elements() {
        let validator = CollectionValidator::new()
            .with_count(NumberValidator::new().with_maximum(2.0))
            .with_element_validator(TypeValidator::new(vec![JsonType::String]));

        assert!(validator.validate(&json!([])).is_ok());
        assert!(validator.validate(&json!(["a", "b"])).is_ok());

        let err = validator.validate(&json!(["a", 1, null])).unwrap_err();
        assert_eq!(
            vec![
                ("/#count".to_owned(), "number is greater than 2".to_owned()),
                ("/1".to_owned(), "expected string, found number".to_owned()),
                ("/2".to_owned(), "expected string, found null".to_owned()),
            ],
            err.leaves()
        );
    }

    #[test]
    fn items_with_additional_policy() {
        let items = || -> Vec<Box<dyn Validator>> {
            vec![
                Box::new(TypeValidator::new(vec![JsonType::String])),
                Box::new(TypeValidator::new(vec![JsonType::Number])),
            ]
        };

        let allowed = ItemsValidator::new(items(), AdditionalItems::Allowed);
        assert!(allowed.validate(&json!(["a", 1, null, {}])).is_ok());
        assert!(allowed.validate(&json!(["a"])).is_ok());
        assert!(allowed.validate(&json!([1])).is_err());

        let forbidden = ItemsValidator::new(items(), AdditionalItems::Forbidden);
        let err = forbidden.validate(&json!(["a", 1, null])).unwrap_err();
        assert_eq!(
            vec![("/2".to_owned(), "element is not allowed".to_owned())],
            err.leaves()
        );

        let validated = ItemsValidator::new(
            items(),
            AdditionalItems::Validated(Box::new(StringValidator::new().with_min_length(2))),
        );
        assert!(validated.validate(&json!(["a", 1, "bb"])).is_ok());
        assert!(validated.validate(&json!(["a", 1, "b"])).is_err());
    }

    #[test]
    fn unique_elements() {
        let validator = UniqueElementsValidator;
        assert!(validator.validate(&json!([1, "1", [1], { "a": 1 }])).is_ok());

        let err = validator.validate(&json!([1, 2, 1.0, 2])).unwrap_err();
        assert_eq!(
            vec![
                (
                    "/2".to_owned(),
                    "duplicates the element at index 0".to_owned()
                ),
                (
                    "/3".to_owned(),
                    "duplicates the element at index 1".to_owned()
                ),
            ],
            err.leaves()
        );
    }

    #[test]
    fn rejects_non_arrays() {
        assert!(CollectionValidator::new().validate(&json!({})).is_err());
        assert!(UniqueElementsValidator.validate(&json!("ab")).is_err());
    }
}
