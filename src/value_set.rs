use crate::{ValidationError, ValidationErrorKind, Validator};
use serde_json::Value;

/// Validates that a value equals one of a fixed set of values.
///
/// Numbers compare by value, so `1` and `1.0` are equal. Booleans are not
/// equal to any number here.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueSetValidator {
    values: Vec<Value>,
}

impl ValueSetValidator {
    pub fn new<I: IntoIterator<Item = Value>>(values: I) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

impl Validator for ValueSetValidator {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        if self.values.iter().any(|allowed| json_equal(allowed, value)) {
            Ok(())
        } else {
            Err(ValidationError::new(ValidationErrorKind::NotInValueSet))
        }
    }
}

/// Structural equality of JSON values, comparing numbers by value.
pub(crate) fn json_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| json_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).map_or(false, |y| json_equal(x, y)))
        }
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn membership() {
        let validator = ValueSetValidator::new(vec![json!("a"), json!(1), json!(null)]);
        assert!(validator.validate(&json!("a")).is_ok());
        assert!(validator.validate(&json!(1.0)).is_ok());
        assert!(validator.validate(&json!(null)).is_ok());
        assert!(validator.validate(&json!("b")).is_err());
        assert!(validator.validate(&json!(true)).is_err());
    }

    #[test]
    fn structural_values() {
        let validator = ValueSetValidator::new(vec![json!({ "a": [1, 2] })]);
        assert!(validator.validate(&json!({ "a": [1.0, 2] })).is_ok());
        assert!(validator.validate(&json!({ "a": [2, 1] })).is_err());
        assert!(validator.validate(&json!({ "a": [1, 2], "b": 0 })).is_err());
    }

    #[test]
    fn empty_set_rejects_everything() {
        assert!(ValueSetValidator::new(vec![]).validate(&json!(null)).is_err());
    }
}
