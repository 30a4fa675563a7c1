use crate::{JsonType, TypeValidator, ValidationError, ValidationErrorKind, Validator};
use serde_json::Value;
use std::collections::BTreeSet;

/// A validator gated on the JSON type of the value it checks.
///
/// The common validator applies to every value. The type validator applies
/// only to values whose type matches this validator's declared type (or, for
/// [`JsonType::Ambiguous`], one of its candidate types). A value of any other
/// type fails outright if the type is required, and otherwise is checked by
/// the common validator alone.
///
/// Usually built by [`compile`](crate::compile()), but can be composed by hand:
///
/// ```
/// use jsonval::{JsonObjectValidator, JsonType, StringValidator, ValueSetValidator, Validator};
/// use serde_json::json;
///
/// let validator = JsonObjectValidator::new(
///     Some(Box::new(ValueSetValidator::new(vec![json!("ab"), json!("abc"), json!(1)]))),
///     Some(Box::new(StringValidator::new().with_max_length(2))),
///     JsonType::String,
///     false,
/// );
///
/// assert!(validator.validate(&json!("ab")).is_ok());
/// assert!(validator.validate(&json!(1)).is_ok());
/// assert!(validator.validate(&json!("abc")).is_err());
/// ```
#[derive(Debug)]
pub struct JsonObjectValidator {
    common: Option<Box<dyn Validator>>,
    type_validator: Option<Box<dyn Validator>>,
    json_type: JsonType,
    type_check: TypeValidator,
    requires_type: bool,
    schema: Option<Value>,
}

impl JsonObjectValidator {
    /// A validator for a single declared type.
    ///
    /// Declaring [`JsonType::Ambiguous`] here leaves no candidate types; use
    /// [`ambiguous`](Self::ambiguous) to list them.
    pub fn new(
        common: Option<Box<dyn Validator>>,
        type_validator: Option<Box<dyn Validator>>,
        json_type: JsonType,
        requires_type: bool,
    ) -> Self {
        let candidates = if json_type == JsonType::Ambiguous {
            vec![]
        } else {
            vec![json_type]
        };

        Self {
            common,
            type_validator,
            json_type,
            type_check: TypeValidator::new(candidates),
            requires_type,
            schema: None,
        }
    }

    /// A validator whose declared type is [`JsonType::Ambiguous`] over a set
    /// of candidate types.
    pub fn ambiguous<I: IntoIterator<Item = JsonType>>(
        common: Option<Box<dyn Validator>>,
        type_validator: Option<Box<dyn Validator>>,
        candidates: I,
        requires_type: bool,
    ) -> Self {
        Self {
            common,
            type_validator,
            json_type: JsonType::Ambiguous,
            type_check: TypeValidator::new(candidates),
            requires_type,
            schema: None,
        }
    }

    pub(crate) fn with_schema(mut self, schema: Value) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn json_type(&self) -> JsonType {
        self.json_type
    }

    /// The types whose values get the type-specific checks.
    pub fn candidate_types(&self) -> &BTreeSet<JsonType> {
        self.type_check.accepted()
    }

    pub fn requires_type(&self) -> bool {
        self.requires_type
    }

    pub fn common_validator(&self) -> Option<&dyn Validator> {
        self.common.as_deref()
    }

    pub fn type_validator(&self) -> Option<&dyn Validator> {
        self.type_validator.as_deref()
    }

    /// The schema this validator was compiled from. Only the root of a
    /// compiled tree keeps it.
    pub fn schema(&self) -> Option<&Value> {
        self.schema.as_ref()
    }
}

impl Validator for JsonObjectValidator {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        let actual = JsonType::of(value);

        if !self.type_check.accepts(actual) {
            if self.requires_type {
                return self.type_check.validate(value);
            }

            tracing::trace!(
                declared = %self.json_type,
                %actual,
                "type mismatch, skipping type-specific checks"
            );

            return match &self.common {
                Some(common) => common.validate(value),
                None => Ok(()),
            };
        }

        let mut errors: Vec<_> = self
            .common
            .iter()
            .chain(self.type_validator.iter())
            .filter_map(|v| v.validate(value).err())
            .collect();

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            count => Err(ValidationError::with_causes(
                ValidationErrorKind::Multiple { count },
                errors,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FnValidator, KeyedCollectionValidator, NumberValidator, StringValidator};
    use serde_json::json;

    fn accept_all() -> Box<dyn Validator> {
        Box::new(FnValidator::new("accept", |_: &Value| Ok(())))
    }

    fn reject_all() -> Box<dyn Validator> {
        Box::new(FnValidator::new("reject", |_: &Value| {
            Err(ValidationError::custom("rejected"))
        }))
    }

    #[test]
    fn mismatch_without_required_type_runs_common_only() {
        let validator = JsonObjectValidator::new(Some(accept_all()), None, JsonType::Object, false);
        assert!(validator.validate(&json!("a string")).is_ok());

        let validator = JsonObjectValidator::new(
            Some(accept_all()),
            Some(reject_all()),
            JsonType::Object,
            false,
        );
        assert!(validator.validate(&json!("a string")).is_ok());
        assert!(validator.validate(&json!({})).is_err());

        let validator = JsonObjectValidator::new(Some(reject_all()), None, JsonType::Object, false);
        assert!(validator.validate(&json!("a string")).is_err());
    }

    #[test]
    fn mismatch_with_required_type_fails() {
        let validator = JsonObjectValidator::new(Some(accept_all()), None, JsonType::Array, true);
        let err = validator.validate(&json!(3)).unwrap_err();
        assert_eq!(
            &ValidationErrorKind::TypeMismatch {
                expected: vec![JsonType::Array],
                actual: JsonType::Number,
            },
            err.kind()
        );

        assert!(validator.validate(&json!([])).is_ok());
    }

    #[test]
    fn matching_type_runs_both() {
        let validator = JsonObjectValidator::new(
            Some(Box::new(NumberValidator::new().with_maximum(1.0))),
            Some(Box::new(NumberValidator::new().with_integer())),
            JsonType::Number,
            true,
        );

        assert!(validator.validate(&json!(1)).is_ok());
        assert_eq!(
            &ValidationErrorKind::AboveMaximum {
                maximum: 1.0,
                exclusive: false
            },
            validator.validate(&json!(2)).unwrap_err().kind()
        );
        assert_eq!(
            &ValidationErrorKind::Multiple { count: 2 },
            validator.validate(&json!(2.5)).unwrap_err().kind()
        );
    }

    #[test]
    fn booleans_match_number() {
        let validator = JsonObjectValidator::new(None, None, JsonType::Number, true);
        assert!(validator.validate(&json!(true)).is_ok());
        assert!(validator.validate(&json!("true")).is_err());
    }

    #[test]
    fn any_always_matches() {
        let validator = JsonObjectValidator::new(None, Some(reject_all()), JsonType::Any, true);
        for value in &[json!(null), json!(1), json!({})] {
            assert!(validator.validate(value).is_err());
        }

        let validator = JsonObjectValidator::new(None, Some(accept_all()), JsonType::Any, true);
        for value in &[json!(null), json!(1), json!({})] {
            assert!(validator.validate(value).is_ok());
        }
    }

    #[test]
    fn ambiguous_matches_any_candidate() {
        let validator = JsonObjectValidator::ambiguous(
            None,
            Some(Box::new(StringValidator::new().with_min_length(1))),
            vec![JsonType::String, JsonType::Null],
            true,
        );

        assert_eq!(JsonType::Ambiguous, validator.json_type());
        assert!(validator.validate(&json!(null)).is_err());
        assert!(validator.validate(&json!("")).is_err());
        assert!(validator.validate(&json!("a")).is_ok());
        assert_eq!(
            &ValidationErrorKind::TypeMismatch {
                expected: vec![JsonType::String, JsonType::Null],
                actual: JsonType::Array,
            },
            validator.validate(&json!([])).unwrap_err().kind()
        );
    }

    #[test]
    fn ambiguous_without_required_type() {
        let validator = JsonObjectValidator::ambiguous(
            None,
            Some(Box::new(KeyedCollectionValidator::new())),
            vec![JsonType::Object],
            false,
        );
        assert!(validator.validate(&json!({})).is_ok());
        assert!(validator.validate(&json!(7)).is_ok());
    }
}
