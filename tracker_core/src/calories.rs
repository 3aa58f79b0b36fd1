//! Energy expenditure from MET, body weight and duration.
//!
//! kcal = MET × body weight (kg) × hours, rounded to 2 decimal places.

use crate::ExerciseFlags;

/// MET used for cardio sets when the user did not choose one
pub const CARDIO_DEFAULT_MET: f64 = 8.0;

/// MET used for muscle-group and unclassified sets when the user did not choose one
pub const STRENGTH_DEFAULT_MET: f64 = 6.0;

/// Intensity picker choices offered for muscle-group exercises
pub const MUSCLE_GROUP_MET_PRESETS: [f64; 3] = [4.0, 6.0, 8.0];

/// Intensity picker choices offered for everything else
pub const OTHER_MET_PRESETS: [f64; 3] = [8.0, 10.0, 12.0];

/// Round half-up on the scaled integer
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Kilocalories burned for a set
///
/// Monotonically non-decreasing in every argument for non-negative inputs.
pub fn calories(met: f64, duration_seconds: u32, body_weight_kg: f64) -> f64 {
    let hours = f64::from(duration_seconds) / 3600.0;
    round2(met * body_weight_kg * hours)
}

/// MET applied when none was supplied
pub fn default_met(flags: ExerciseFlags) -> f64 {
    if flags.is_cardio {
        CARDIO_DEFAULT_MET
    } else {
        STRENGTH_DEFAULT_MET
    }
}

/// A caller-supplied MET wins over the classification default
pub fn resolve_met(chosen: Option<f64>, flags: ExerciseFlags) -> f64 {
    chosen.unwrap_or_else(|| default_met(flags))
}

/// Picker presets for the historical-log intensity selector
pub fn met_presets(flags: ExerciseFlags) -> &'static [f64] {
    if flags.is_muscle_group {
        &MUSCLE_GROUP_MET_PRESETS
    } else {
        &OTHER_MET_PRESETS
    }
}

/// A MET value the engine accepts: finite and strictly positive
pub fn is_valid_met(met: f64) -> bool {
    met.is_finite() && met > 0.0
}
