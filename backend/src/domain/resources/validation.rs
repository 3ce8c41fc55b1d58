//! Field-level validation shared by resource drafts, patches and filters.

use std::fmt;

use serde_json::json;

use crate::domain::Error;

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub code: &'static str,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &'static str, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for FieldViolation {}

impl From<FieldViolation> for Error {
    fn from(violation: FieldViolation) -> Self {
        Error::invalid_request(violation.message)
            .with_details(json!({ "field": violation.field, "code": violation.code }))
    }
}

/// Input checked before it reaches a store.
pub trait Validate {
    fn validate(&self) -> Result<(), FieldViolation>;
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), FieldViolation> {
    if value.trim().is_empty() {
        return Err(FieldViolation::new(
            field,
            "required",
            format!("{field} must not be empty"),
        ));
    }
    Ok(())
}

pub(crate) fn optional_text(field: &'static str, value: Option<&str>) -> Result<(), FieldViolation> {
    value.map_or(Ok(()), |text| require_text(field, text))
}

pub(crate) fn non_negative_int(field: &'static str, value: i32) -> Result<(), FieldViolation> {
    if value < 0 {
        return Err(FieldViolation::new(
            field,
            "negative",
            format!("{field} must not be negative"),
        ));
    }
    Ok(())
}

pub(crate) fn positive_int(field: &'static str, value: i32) -> Result<(), FieldViolation> {
    if value <= 0 {
        return Err(FieldViolation::new(
            field,
            "not_positive",
            format!("{field} must be greater than zero"),
        ));
    }
    Ok(())
}

/// Rejects negative amounts as well as NaN and infinities.
pub(crate) fn non_negative_amount(field: &'static str, value: f64) -> Result<(), FieldViolation> {
    if !value.is_finite() || value < 0.0 {
        return Err(FieldViolation::new(
            field,
            "negative",
            format!("{field} must be a non-negative number"),
        ));
    }
    Ok(())
}

pub(crate) fn within(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), FieldViolation> {
    if !value.is_finite() || value < min || value > max {
        return Err(FieldViolation::new(
            field,
            "out_of_range",
            format!("{field} must be between {min} and {max}"),
        ));
    }
    Ok(())
}

pub(crate) fn ordered<T: PartialOrd>(
    field: &'static str,
    min: Option<T>,
    max: Option<T>,
) -> Result<(), FieldViolation> {
    match (min, max) {
        (Some(low), Some(high)) if low > high => Err(FieldViolation::new(
            field,
            "invalid_range",
            format!("min_{field} must not exceed max_{field}"),
        )),
        _ => Ok(()),
    }
}

pub(crate) fn require_changes(any: bool) -> Result<(), FieldViolation> {
    if any {
        Ok(())
    } else {
        Err(FieldViolation::new(
            "body",
            "empty_patch",
            "at least one field must be provided",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("  \t")]
    fn blank_text_is_required(#[case] value: &str) {
        let err = require_text("name", value).expect_err("blank text rejected");
        assert_eq!((err.field, err.code), ("name", "required"));
    }

    #[rstest]
    #[case(-0.01)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn amounts_must_be_finite_and_non_negative(#[case] value: f64) {
        assert!(non_negative_amount("price", value).is_err());
    }

    #[rstest]
    #[case(Some(5), Some(1), false)]
    #[case(Some(1), Some(5), true)]
    #[case(Some(3), Some(3), true)]
    #[case(None, Some(1), true)]
    fn ranges_require_min_not_above_max(
        #[case] min: Option<i32>,
        #[case] max: Option<i32>,
        #[case] ok: bool,
    ) {
        assert_eq!(ordered("quantity", min, max).is_ok(), ok);
    }

    #[rstest]
    fn range_violation_names_both_bounds() {
        let err = ordered("price", Some(9.0), Some(1.0)).expect_err("inverted range");
        assert_eq!(err.code, "invalid_range");
        assert_eq!(err.message, "min_price must not exceed max_price");
    }

    #[rstest]
    fn zero_is_not_positive() {
        assert!(positive_int("quantity", 0).is_err());
        assert!(positive_int("quantity", 1).is_ok());
    }
}
