use crate::ValidationError;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Something that can check a JSON value.
///
/// Implementations must be pure functions of the value and their own
/// configuration. They are shared freely across threads, so they hold no
/// per-call state.
pub trait Validator: fmt::Debug + Send + Sync {
    fn validate(&self, value: &Value) -> Result<(), ValidationError>;

    fn is_valid(&self, value: &Value) -> bool {
        self.validate(value).is_ok()
    }
}

impl<V: Validator + ?Sized> Validator for Box<V> {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        (**self).validate(value)
    }
}

impl<V: Validator + ?Sized> Validator for Arc<V> {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        (**self).validate(value)
    }
}

impl<V: Validator + ?Sized> Validator for &V {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        (**self).validate(value)
    }
}

/// A validator backed by a closure.
///
/// ```
/// use jsonval::{FnValidator, ValidationError, Validator};
/// use serde_json::{json, Value};
///
/// let even = FnValidator::new("even", |value: &Value| match value.as_u64() {
///     Some(n) if n % 2 == 0 => Ok(()),
///     _ => Err(ValidationError::custom("not an even number")),
/// });
///
/// assert!(even.validate(&json!(4)).is_ok());
/// assert!(even.validate(&json!(3)).is_err());
/// ```
pub struct FnValidator<F> {
    name: &'static str,
    check: F,
}

impl<F> FnValidator<F>
where
    F: Fn(&Value) -> Result<(), ValidationError> + Send + Sync,
{
    pub fn new(name: &'static str, check: F) -> Self {
        Self { name, check }
    }
}

impl<F> fmt::Debug for FnValidator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnValidator").field("name", &self.name).finish()
    }
}

impl<F> Validator for FnValidator<F>
where
    F: Fn(&Value) -> Result<(), ValidationError> + Send + Sync,
{
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        (self.check)(value)
    }
}
