//! Set validation against an exercise's classification.
//!
//! Input arrives as raw form text. Every rule is evaluated and all failures are
//! returned together so they can be shown at once.

use crate::calories::is_valid_met;
use crate::{ExerciseFlags, Field, FieldError};
use serde::{Deserialize, Deserializer, Serialize};

/// Unit the user entered a duration in
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DurationUnit {
    #[default]
    Seconds,
    Minutes,
}

impl DurationUnit {
    fn factor(self) -> f64 {
        match self {
            DurationUnit::Seconds => 1.0,
            DurationUnit::Minutes => 60.0,
        }
    }

    /// Normalize an amount in this unit to whole seconds
    ///
    /// `None` when the rounded value does not fit in a `u32`.
    pub fn to_seconds(self, amount: f64) -> Option<u32> {
        let seconds = (amount * self.factor()).round();
        (0.0..=f64::from(u32::MAX))
            .contains(&seconds)
            .then_some(seconds as u32)
    }
}

/// Immutable snapshot of the set form
///
/// `None` means the field was not shown; `Some("")` means it was left blank.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SetInput {
    #[serde(default, deserialize_with = "text_or_number")]
    pub reps: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub weight: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub duration: Option<String>,
}

/// Form fields may arrive as typed text or as plain JSON numbers
fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(f64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    }))
}

impl SetInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reps(mut self, reps: impl ToString) -> Self {
        self.reps = Some(reps.to_string());
        self
    }

    pub fn weight(mut self, weight: impl ToString) -> Self {
        self.weight = Some(weight.to_string());
        self
    }

    pub fn duration(mut self, duration: impl ToString) -> Self {
        self.duration = Some(duration.to_string());
        self
    }
}

/// Values of a set that passed validation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValidSet {
    pub reps: u32,
    pub weight: f64,
    /// Seconds, present only when a duration field was supplied
    pub duration: Option<u32>,
}

/// Collect every field error for `input`; empty means the set is acceptable
pub fn validate(flags: ExerciseFlags, input: &SetInput) -> Vec<FieldError> {
    check(flags, input, DurationUnit::Seconds, false)
        .err()
        .unwrap_or_default()
}

/// Validate and parse a set
///
/// `require_duration` is set for historical and one-tap logging, where there is
/// no live timer and the duration must be typed in.
pub fn check(
    flags: ExerciseFlags,
    input: &SetInput,
    unit: DurationUnit,
    require_duration: bool,
) -> Result<ValidSet, Vec<FieldError>> {
    let mut errors = Vec::new();

    let (reps, weight) = if flags.is_muscle_group {
        let reps = match positive(Field::Reps, input.reps.as_deref()) {
            Ok(value) => whole(Field::Reps, value).unwrap_or_else(|e| {
                errors.push(e);
                0
            }),
            Err(e) => {
                errors.push(e);
                0
            }
        };

        let weight = if flags.is_body_weight {
            lenient(input.weight.as_deref())
        } else {
            positive(Field::Weight, input.weight.as_deref()).unwrap_or_else(|e| {
                errors.push(e);
                0.0
            })
        };
        (reps, weight)
    } else if flags.is_cardio {
        (0, 0.0)
    } else {
        (
            lenient(input.reps.as_deref()).trunc() as u32,
            lenient(input.weight.as_deref()),
        )
    };

    let duration = match (input.duration.as_deref(), require_duration) {
        (Some(raw), _) => match positive(Field::Duration, Some(raw)) {
            Ok(amount) => match unit.to_seconds(amount) {
                Some(seconds) if seconds > 0 => Some(seconds),
                Some(_) => {
                    errors.push(FieldError::new(Field::Duration, "must be at least 1 second"));
                    None
                }
                None => {
                    errors.push(FieldError::new(Field::Duration, "is too large"));
                    None
                }
            },
            Err(e) => {
                errors.push(e);
                None
            }
        },
        (None, true) => {
            errors.push(FieldError::new(Field::Duration, "is required"));
            None
        }
        (None, false) => None,
    };

    if errors.is_empty() {
        Ok(ValidSet {
            reps,
            weight,
            duration,
        })
    } else {
        Err(errors)
    }
}

/// Error for a MET value the engine cannot use
pub fn check_met(met: f64) -> Option<FieldError> {
    (!is_valid_met(met)).then(|| FieldError::new(Field::Met, "must be a positive number"))
}

fn positive(field: Field, raw: Option<&str>) -> Result<f64, FieldError> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(FieldError::new(field, "is required"));
    }
    let value = raw
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| FieldError::new(field, "must be a number"))?;
    if value <= 0.0 {
        return Err(FieldError::new(field, "must be greater than 0"));
    }
    Ok(value)
}

fn whole(field: Field, value: f64) -> Result<u32, FieldError> {
    if value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return Err(FieldError::new(field, "must be a whole number"));
    }
    Ok(value as u32)
}

/// Optional numeric field: anything unusable counts as zero
fn lenient(raw: Option<&str>) -> f64 {
    raw.and_then(|r| r.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(errors: &[FieldError]) -> Vec<Field> {
        errors.iter().map(|e| e.field).collect()
    }

    #[test]
    fn test_strength_set_needs_reps_and_weight() {
        let errors = validate(ExerciseFlags::STRENGTH, &SetInput::new());
        assert_eq!(fields(&errors), vec![Field::Reps, Field::Weight]);
        assert!(errors.iter().all(|e| e.message == "is required"));
    }

    #[test]
    fn test_bodyweight_zero_reps_single_error() {
        let input = SetInput::new().reps(0);
        let errors = validate(ExerciseFlags::BODY_WEIGHT, &input);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, Field::Reps);
        assert_eq!(errors[0].message, "must be greater than 0");
    }

    #[test]
    fn test_bodyweight_keeps_optional_added_load() {
        let input = SetInput::new().reps(8).weight("10");
        let set = check(ExerciseFlags::BODY_WEIGHT, &input, DurationUnit::Seconds, false).unwrap();
        assert_eq!(set.reps, 8);
        assert_eq!(set.weight, 10.0);
    }

    #[test]
    fn test_non_numeric_values_rejected() {
        let input = SetInput::new().reps("ten").weight("heavy");
        let errors = validate(ExerciseFlags::STRENGTH, &input);
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.message == "must be a number"));
    }

    #[test]
    fn test_fractional_reps_rejected() {
        let input = SetInput::new().reps("7.5").weight("20");
        let errors = validate(ExerciseFlags::STRENGTH, &input);
        assert_eq!(fields(&errors), vec![Field::Reps]);
    }

    #[test]
    fn test_cardio_skips_reps_and_weight() {
        let input = SetInput::new().reps("junk").weight("-3");
        assert!(validate(ExerciseFlags::CARDIO, &input).is_empty());
    }

    #[test]
    fn test_supplied_duration_must_be_positive() {
        let input = SetInput::new().duration("0");
        let errors = validate(ExerciseFlags::CARDIO, &input);
        assert_eq!(fields(&errors), vec![Field::Duration]);
    }

    #[test]
    fn test_required_duration_reported_with_other_errors() {
        let input = SetInput::new().weight("40");
        let errors =
            check(ExerciseFlags::STRENGTH, &input, DurationUnit::Seconds, true).unwrap_err();
        assert_eq!(fields(&errors), vec![Field::Reps, Field::Duration]);
    }

    #[test]
    fn test_minutes_normalized_to_seconds() {
        let input = SetInput::new().duration("1.5");
        let set = check(ExerciseFlags::CARDIO, &input, DurationUnit::Minutes, true).unwrap();
        assert_eq!(set.duration, Some(90));
    }

    #[test]
    fn test_unclassified_exercise_is_permissive() {
        let input = SetInput::new().reps("abc");
        let set = check(ExerciseFlags::default(), &input, DurationUnit::Seconds, false).unwrap();
        assert_eq!(set.reps, 0);
        assert_eq!(set.weight, 0.0);
    }

    #[test]
    fn test_form_accepts_numbers_or_text() {
        let input: SetInput = serde_json::from_str(r#"{"reps": 10, "weight": "22.5"}"#).unwrap();
        assert_eq!(input, SetInput::new().reps(10).weight("22.5"));
    }

    #[test]
    fn test_met_check() {
        assert!(check_met(6.0).is_none());
        assert_eq!(check_met(0.0).map(|e| e.field), Some(Field::Met));
    }

    #[test]
    fn test_duration_checked_after_rounding() {
        let input = SetInput::new().reps(5).weight(10).duration("0.4");
        let errors =
            check(ExerciseFlags::STRENGTH, &input, DurationUnit::Seconds, true).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, Field::Duration);
        assert_eq!(errors[0].message, "must be at least 1 second");

        let input = SetInput::new().duration("1e12");
        let errors = check(ExerciseFlags::CARDIO, &input, DurationUnit::Minutes, true).unwrap_err();
        assert_eq!(errors[0].message, "is too large");

        let input = SetInput::new().duration("0.6");
        let set = check(ExerciseFlags::CARDIO, &input, DurationUnit::Seconds, true).unwrap();
        assert_eq!(set.duration, Some(1));
    }
}
