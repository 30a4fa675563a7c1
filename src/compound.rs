use crate::{ValidationError, ValidationErrorKind, Validator};
use serde_json::Value;

/// How a [`CompoundValidator`] combines its sub-validators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompoundKind {
    /// Every sub-validator must pass.
    And,
    /// At least one sub-validator must pass.
    Or,
    /// The sub-validator must fail.
    Not,
    /// Exactly one sub-validator must pass.
    MutualExclusion,
}

/// Combines validators with a logical operator.
#[derive(Debug)]
pub struct CompoundValidator {
    kind: CompoundKind,
    validators: Vec<Box<dyn Validator>>,
}

impl CompoundValidator {
    pub fn new(kind: CompoundKind, validators: Vec<Box<dyn Validator>>) -> Self {
        Self { kind, validators }
    }

    pub fn and(validators: Vec<Box<dyn Validator>>) -> Self {
        Self::new(CompoundKind::And, validators)
    }

    pub fn or(validators: Vec<Box<dyn Validator>>) -> Self {
        Self::new(CompoundKind::Or, validators)
    }

    pub fn not<V: Validator + 'static>(validator: V) -> Self {
        Self::new(CompoundKind::Not, vec![Box::new(validator)])
    }

    pub fn mutual_exclusion(validators: Vec<Box<dyn Validator>>) -> Self {
        Self::new(CompoundKind::MutualExclusion, validators)
    }

    pub fn kind(&self) -> CompoundKind {
        self.kind
    }

    pub fn validators(&self) -> &[Box<dyn Validator>] {
        &self.validators
    }
}

impl Validator for CompoundValidator {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        let total = self.validators.len();
        let errors: Vec<_> = self
            .validators
            .iter()
            .filter_map(|v| v.validate(value).err())
            .collect();

        match self.kind {
            CompoundKind::And if errors.is_empty() => Ok(()),
            CompoundKind::And => Err(ValidationError::with_causes(
                ValidationErrorKind::AllOf {
                    failures: errors.len(),
                    total,
                },
                errors,
            )),
            CompoundKind::Or if errors.len() < total => Ok(()),
            CompoundKind::Or => Err(ValidationError::with_causes(
                ValidationErrorKind::NoneMatched,
                errors,
            )),
            // Not over several validators negates their conjunction.
            CompoundKind::Not if errors.is_empty() => {
                Err(ValidationError::new(ValidationErrorKind::NegationMatched))
            }
            CompoundKind::Not => Ok(()),
            CompoundKind::MutualExclusion if total - errors.len() == 1 => Ok(()),
            CompoundKind::MutualExclusion => {
                let matched = total - errors.len();
                let causes = if matched == 0 { errors } else { Vec::new() };
                Err(ValidationError::with_causes(
                    ValidationErrorKind::ExclusionViolated { matched },
                    causes,
                ))
            }
        }
    }
}

/// Collapses a list of validators into one that requires all of them.
pub(crate) fn conjoin(mut validators: Vec<Box<dyn Validator>>) -> Option<Box<dyn Validator>> {
    match validators.len() {
        0 => None,
        1 => validators.pop(),
        _ => Some(Box::new(CompoundValidator::and(validators))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{JsonType, NumberValidator, TypeValidator};
    use serde_json::json;

    fn number() -> Box<dyn Validator> {
        Box::new(TypeValidator::new(vec![JsonType::Number]))
    }

    fn positive() -> Box<dyn Validator> {
        Box::new(NumberValidator::new().with_exclusive_minimum(0.0))
    }

    fn string() -> Box<dyn Validator> {
        Box::new(TypeValidator::new(vec![JsonType::String]))
    }

    #[test]
    fn and_reports_every_failure() {
        let validator = CompoundValidator::and(vec![string(), positive()]);
        let err = validator.validate(&json!(-1)).unwrap_err();
        assert_eq!(
            &ValidationErrorKind::AllOf {
                failures: 2,
                total: 2
            },
            err.kind()
        );
        assert_eq!(2, err.causes().len());
        assert!(CompoundValidator::and(vec![]).validate(&json!(1)).is_ok());
    }

    #[test]
    fn or_needs_one() {
        let validator = CompoundValidator::or(vec![string(), positive()]);
        assert!(validator.validate(&json!("a")).is_ok());
        assert!(validator.validate(&json!(2)).is_ok());
        assert_eq!(
            &ValidationErrorKind::NoneMatched,
            validator.validate(&json!(-2)).unwrap_err().kind()
        );
        assert!(CompoundValidator::or(vec![]).validate(&json!(1)).is_err());
    }

    #[test]
    fn not_inverts() {
        let validator = CompoundValidator::not(TypeValidator::new(vec![JsonType::String]));
        assert!(validator.validate(&json!(1)).is_ok());
        assert!(validator.validate(&json!("a")).is_err());
    }

    #[test]
    fn mutual_exclusion_needs_exactly_one() {
        let validator = CompoundValidator::mutual_exclusion(vec![number(), positive()]);
        assert!(validator.validate(&json!(-1)).is_ok());
        assert_eq!(
            &ValidationErrorKind::ExclusionViolated { matched: 2 },
            validator.validate(&json!(1)).unwrap_err().kind()
        );
        assert_eq!(
            &ValidationErrorKind::ExclusionViolated { matched: 0 },
            validator.validate(&json!("a")).unwrap_err().kind()
        );
    }

    #[test]
    fn conjoin_collapses() {
        assert!(conjoin(vec![]).is_none());
        assert!(conjoin(vec![string()]).is_some());
        let both = conjoin(vec![string(), number()]).unwrap();
        assert!(both.validate(&json!("a")).is_err());
    }
}
