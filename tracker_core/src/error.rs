//! Error types for the tracker_core library.

use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Form field a validation message refers to
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Reps,
    Weight,
    Duration,
    Met,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Reps => "reps",
            Field::Weight => "weight",
            Field::Duration => "duration",
            Field::Met => "MET",
        };
        f.write_str(name)
    }
}

/// A single field-level validation message
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Core error type for tracker_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// One or more set fields were rejected; the set was not recorded
    #[error("Invalid set: {}", join_field_errors(.0))]
    Validation(Vec<FieldError>),

    /// Another exercise is already being timed
    #[error("Exercise '{active}' is already active")]
    Conflict { active: String },

    /// The operation cannot run in the current state
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// The submission sink rejected the workout
    #[error("Submission failed: {0}")]
    Submission(String),

    /// No entry exists for the exercise
    #[error("No recorded sets for exercise '{0}'")]
    UnknownExercise(String),

    /// Set index out of range for the exercise
    #[error("Set {index} does not exist for '{exercise}' ({len} sets recorded)")]
    SetIndex {
        exercise: String,
        index: usize,
        len: usize,
    },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Only sink failures are worth another save attempt with the same state.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Submission(_))
    }

    /// Field errors carried by a validation failure, empty otherwise
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Error::Validation(errors) => errors,
            _ => &[],
        }
    }
}
