//! Core domain types for the session tracking engine.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercises and their classification flags
//! - Recorded sets and per-exercise session state
//! - The grouped submission document handed to the backend
//! - Profile fields read from external storage

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Exercise Types
// ============================================================================

/// Classification flags that drive validation and MET defaults
///
/// An exercise missing from every catalog source resolves to all-false,
/// which callers treat as the most permissive path.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseFlags {
    #[serde(default)]
    pub is_cardio: bool,
    #[serde(default)]
    pub is_muscle_group: bool,
    #[serde(default)]
    pub is_body_weight: bool,
}

impl ExerciseFlags {
    pub const CARDIO: ExerciseFlags = ExerciseFlags {
        is_cardio: true,
        is_muscle_group: false,
        is_body_weight: false,
    };

    pub const STRENGTH: ExerciseFlags = ExerciseFlags {
        is_cardio: false,
        is_muscle_group: true,
        is_body_weight: false,
    };

    pub const BODY_WEIGHT: ExerciseFlags = ExerciseFlags {
        is_cardio: false,
        is_muscle_group: true,
        is_body_weight: true,
    };
}

/// An exercise as resolved from a catalog source
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub name: String,
    pub muscle_group: String,
    #[serde(flatten)]
    pub flags: ExerciseFlags,
}

// ============================================================================
// Set and Session State Types
// ============================================================================

/// One completed block of an exercise
///
/// Sets are never mutated in place; edits replace them and deletes remove them.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Set {
    pub set_number: u32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub reps: u32,
    pub weight: f64,
    /// Seconds
    pub duration: u32,
    #[serde(rename = "MET")]
    pub met: f64,
    pub calories: f64,
}

/// Timing captured when a non-cardio exercise is stopped, waiting for reps/weight
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PendingSet {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration: u32,
}

/// In-progress and completed state of a single exercise within a session
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActiveExerciseState {
    pub start_time: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub sets: Vec<Set>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending: Option<PendingSet>,
}

impl ActiveExerciseState {
    /// Set number for the next appended set
    pub fn next_set_number(&self) -> u32 {
        self.sets.len() as u32 + 1
    }

    pub fn total_calories(&self) -> f64 {
        crate::calories::round2(self.sets.iter().map(|s| s.calories).sum())
    }
}

// ============================================================================
// Submission Types
// ============================================================================

/// One exercise and its sets inside a category bucket
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseEntry {
    pub name: String,
    pub sets: Vec<Set>,
}

/// Category key to the exercises filed under it
pub type CategoryBuckets = BTreeMap<String, Vec<ExerciseEntry>>;

/// The grouped workout document expected by the backend
///
/// `workout_details` always holds exactly one mapping; the array wrapper is
/// part of the wire format.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSubmissionDocument {
    pub client_id: i64,
    pub date: NaiveDate,
    pub workout_details: Vec<CategoryBuckets>,
    pub live_status: bool,
    pub gym_id: Option<i64>,
}

impl WorkoutSubmissionDocument {
    /// The category mapping wrapped by `workout_details`
    pub fn categories(&self) -> Option<&CategoryBuckets> {
        self.workout_details.first()
    }

    pub fn set_count(&self) -> usize {
        self.categories()
            .map(|c| c.values().flatten().map(|e| e.sets.len()).sum())
            .unwrap_or(0)
    }
}

// ============================================================================
// Profile Types
// ============================================================================

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// Profile fields read from external storage once per session
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub client_id: Option<i64>,
    #[serde(default)]
    pub gym_id: Option<i64>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub body_weight_kg: Option<f64>,
    /// Gym presence at the time the profile was read
    #[serde(default)]
    pub live_status: bool,
}
