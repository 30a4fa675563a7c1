use crate::{JsonType, ValidationError, ValidationErrorKind, Validator};
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Bound {
    value: f64,
    exclusive: bool,
}

/// Validates JSON numbers against bounds, a divisor, and integrality.
///
/// Booleans are numbers here: `false` is 0 and `true` is 1.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NumberValidator {
    minimum: Option<Bound>,
    maximum: Option<Bound>,
    multiple_of: Option<f64>,
    integer: bool,
}

impl NumberValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_minimum(mut self, minimum: f64) -> Self {
        self.minimum = Some(Bound {
            value: minimum,
            exclusive: false,
        });
        self
    }

    pub fn with_exclusive_minimum(mut self, minimum: f64) -> Self {
        self.minimum = Some(Bound {
            value: minimum,
            exclusive: true,
        });
        self
    }

    pub fn with_maximum(mut self, maximum: f64) -> Self {
        self.maximum = Some(Bound {
            value: maximum,
            exclusive: false,
        });
        self
    }

    pub fn with_exclusive_maximum(mut self, maximum: f64) -> Self {
        self.maximum = Some(Bound {
            value: maximum,
            exclusive: true,
        });
        self
    }

    pub fn with_multiple_of(mut self, divisor: f64) -> Self {
        self.multiple_of = Some(divisor);
        self
    }

    pub fn with_integer(mut self) -> Self {
        self.integer = true;
        self
    }

    pub fn is_unconstrained(&self) -> bool {
        *self == Self::default()
    }
}

impl Validator for NumberValidator {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        let n = match value {
            Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
            Value::Bool(b) => f64::from(u8::from(*b)),
            _ => {
                return Err(ValidationError::new(ValidationErrorKind::TypeMismatch {
                    expected: vec![JsonType::Number],
                    actual: JsonType::of(value),
                }))
            }
        };

        let mut errors = Vec::new();

        if let Some(Bound { value: min, exclusive }) = self.minimum {
            if n < min || (exclusive && n <= min) {
                errors.push(ValidationErrorKind::BelowMinimum {
                    minimum: min,
                    exclusive,
                });
            }
        }

        if let Some(Bound { value: max, exclusive }) = self.maximum {
            if n > max || (exclusive && n >= max) {
                errors.push(ValidationErrorKind::AboveMaximum {
                    maximum: max,
                    exclusive,
                });
            }
        }

        if let Some(divisor) = self.multiple_of {
            if !is_multiple(value, n, divisor) {
                errors.push(ValidationErrorKind::NotMultipleOf { divisor });
            }
        }

        if self.integer && n.fract() != 0.0 {
            errors.push(ValidationErrorKind::NotInteger);
        }

        combine(errors)
    }
}

fn is_multiple(value: &Value, n: f64, divisor: f64) -> bool {
    // Integers divided by an integral divisor are checked exactly.
    if divisor.fract() == 0.0 && divisor.abs() < i64::MAX as f64 {
        if let Some(n) = value.as_i64() {
            return n.checked_rem(divisor as i64) == Some(0);
        }
    }

    let quotient = n / divisor;
    quotient.is_finite()
        && (quotient - quotient.round()).abs() <= f64::EPSILON * quotient.abs().max(1.0) * 4.0
}

/// Turns the failures of a single leaf into one error.
pub(crate) fn combine(mut kinds: Vec<ValidationErrorKind>) -> Result<(), ValidationError> {
    match kinds.len() {
        0 => Ok(()),
        1 => Err(ValidationError::new(kinds.remove(0))),
        count => Err(ValidationError::with_causes(
            ValidationErrorKind::Multiple { count },
            kinds.into_iter().map(ValidationError::new).collect(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn inclusive_bounds() {
        let validator = NumberValidator::new().with_minimum(1.0).with_maximum(3.0);
        assert!(validator.validate(&json!(1)).is_ok());
        assert!(validator.validate(&json!(3.0)).is_ok());
        assert_eq!(
            &ValidationErrorKind::BelowMinimum {
                minimum: 1.0,
                exclusive: false
            },
            validator.validate(&json!(0.5)).unwrap_err().kind()
        );
        assert_eq!(
            &ValidationErrorKind::AboveMaximum {
                maximum: 3.0,
                exclusive: false
            },
            validator.validate(&json!(4)).unwrap_err().kind()
        );
    }

    #[test]
    fn exclusive_bounds() {
        let validator = NumberValidator::new()
            .with_exclusive_minimum(1.0)
            .with_exclusive_maximum(3.0);
        assert!(validator.validate(&json!(1)).is_err());
        assert!(validator.validate(&json!(2)).is_ok());
        assert!(validator.validate(&json!(3)).is_err());
    }

    #[test]
    fn booleans_are_zero_and_one() {
        let validator = NumberValidator::new().with_minimum(1.0);
        assert!(validator.validate(&json!(true)).is_ok());
        assert!(validator.validate(&json!(false)).is_err());
    }

    #[test]
    fn multiple_of_and_integer() {
        let validator = NumberValidator::new().with_multiple_of(0.5);
        assert!(validator.validate(&json!(2.5)).is_ok());
        assert!(validator.validate(&json!(2.25)).is_err());

        let validator = NumberValidator::new().with_integer();
        assert!(validator.validate(&json!(2)).is_ok());
        assert!(validator.validate(&json!(2.0)).is_ok());
        assert!(validator.validate(&json!(2.5)).is_err());
    }

    #[test]
    fn multiple_of_is_not_loose() {
        let validator = NumberValidator::new().with_multiple_of(1.0);
        assert!(validator.validate(&json!(1.0000000001)).is_err());
        assert!(validator.validate(&json!(9007199254740993u64)).is_ok());

        let validator = NumberValidator::new().with_multiple_of(0.01);
        assert!(validator.validate(&json!(1e-11)).is_err());
        assert!(validator.validate(&json!(19.99)).is_ok());
        assert!(validator.validate(&json!(0)).is_ok());

        let validator = NumberValidator::new().with_multiple_of(0.1);
        assert!(validator.validate(&json!(0.3)).is_ok());

        let validator = NumberValidator::new().with_multiple_of(3.0);
        assert!(validator.validate(&json!(i64::MIN + 2)).is_ok());
        assert!(validator.validate(&json!(10)).is_err());
        assert!(validator.validate(&json!(true)).is_err());
    }

    #[test]
    fn collects_every_failure() {
        let validator = NumberValidator::new()
            .with_maximum(1.0)
            .with_multiple_of(2.0)
            .with_integer();
        let err = validator.validate(&json!(2.5)).unwrap_err();
        assert_eq!(&ValidationErrorKind::Multiple { count: 3 }, err.kind());
    }

    #[test]
    fn rejects_non_numbers() {
        assert!(NumberValidator::new().validate(&json!("1")).is_err());
        assert!(NumberValidator::new().validate(&json!(null)).is_err());
        assert!(NumberValidator::new().is_unconstrained());
    }
}
