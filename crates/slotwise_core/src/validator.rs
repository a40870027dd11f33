//! Slot answer validators.

use slotwise_error::{ValidationError, ValidationErrorKind, ValidationResult};
use std::fmt::Debug;

/// Checks a raw answer and produces the value to store for a slot.
///
/// Validators must be pure: the dialog engine calls them while holding the
/// session store lock.
pub trait Validator: Send + Sync + Debug {
    /// Validate `input`, returning the normalized value on success.
    fn validate(&self, input: &str) -> ValidationResult<String>;
}

/// Accepts every answer; the stored value is trimmed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FreeText;

impl Validator for FreeText {
    fn validate(&self, input: &str) -> ValidationResult<String> {
        Ok(input.trim().to_string())
    }
}

/// Numeric answer with optional inclusive bounds.
///
/// # Examples
///
/// ```
/// use slotwise_core::{Numeric, Validator};
///
/// let age = Numeric::integer().with_min(10.0).with_max(120.0);
/// assert_eq!(age.validate(" 25 ").unwrap(), "25");
/// assert!(age.validate("xyz").is_err());
/// assert!(age.validate("7").is_err());
///
/// let weight = Numeric::decimal();
/// assert_eq!(weight.validate("72.5").unwrap(), "72.5");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Numeric {
    integer: bool,
    min: Option<f64>,
    max: Option<f64>,
}

impl Numeric {
    /// Whole numbers only.
    pub fn integer() -> Self {
        Self {
            integer: true,
            min: None,
            max: None,
        }
    }

    /// Any finite decimal number.
    pub fn decimal() -> Self {
        Self {
            integer: false,
            min: None,
            max: None,
        }
    }

    /// Set the inclusive lower bound.
    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Set the inclusive upper bound.
    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    fn expectation(&self) -> String {
        let noun = if self.integer {
            "a whole number"
        } else {
            "a number"
        };
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("Please enter {} between {} and {}.", noun, min, max),
            (Some(min), None) => format!("Please enter {} of at least {}.", noun, min),
            (None, Some(max)) => format!("Please enter {} no greater than {}.", noun, max),
            (None, None) => format!("Please enter {}.", noun),
        }
    }
}

impl Validator for Numeric {
    fn validate(&self, input: &str) -> ValidationResult<String> {
        let trimmed = input.trim();
        let value = if self.integer {
            trimmed.parse::<i64>().ok().map(|v| v as f64)
        } else {
            trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
        };

        let Some(value) = value else {
            return Err(ValidationError::format(self.expectation()));
        };

        let below = self.min.is_some_and(|min| value < min);
        let above = self.max.is_some_and(|max| value > max);
        if below || above {
            return Err(ValidationError::format(self.expectation()));
        }

        Ok(trimmed.to_string())
    }
}

/// Answer must match one of a fixed set of tokens (case-insensitive).
///
/// The stored value uses the configured spelling.
///
/// # Examples
///
/// ```
/// use slotwise_core::{OneOf, Validator};
///
/// let activity = OneOf::new(["low", "moderate", "high"]);
/// assert_eq!(activity.validate("Moderate").unwrap(), "moderate");
/// assert!(activity.validate("extreme").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneOf {
    choices: Vec<String>,
}

impl OneOf {
    /// Create an enumeration validator.
    pub fn new<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }

    /// Accepted spellings.
    pub fn choices(&self) -> &[String] {
        &self.choices
    }
}

impl Validator for OneOf {
    fn validate(&self, input: &str) -> ValidationResult<String> {
        let trimmed = input.trim();
        self.choices
            .iter()
            .find(|choice| choice.eq_ignore_ascii_case(trimmed))
            .cloned()
            .ok_or_else(|| {
                ValidationError::new(ValidationErrorKind::InvalidEnum {
                    accepted: self.choices.clone(),
                })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_text_accepts_anything() {
        assert_eq!(FreeText.validate("  lose weight ").unwrap(), "lose weight");
        assert_eq!(FreeText.validate("").unwrap(), "");
    }

    #[test]
    fn integer_rejects_decimals() {
        let err = Numeric::integer().validate("25.5").unwrap_err();
        assert_eq!(
            err.kind,
            ValidationErrorKind::InvalidFormat("Please enter a whole number.".to_string())
        );
    }

    #[test]
    fn decimal_rejects_non_finite() {
        assert!(Numeric::decimal().validate("NaN").is_err());
        assert!(Numeric::decimal().validate("inf").is_err());
    }

    #[test]
    fn bounds_are_inclusive() {
        let height = Numeric::decimal().with_min(50.0).with_max(250.0);
        assert!(height.validate("50").is_ok());
        assert!(height.validate("250").is_ok());
        assert!(height.validate("250.1").is_err());
    }

    #[test]
    fn one_of_lists_accepted_values() {
        let err = OneOf::new(["a", "b"]).validate("c").unwrap_err();
        assert_eq!(
            err.kind,
            ValidationErrorKind::InvalidEnum {
                accepted: vec!["a".to_string(), "b".to_string()]
            }
        );
    }
}
