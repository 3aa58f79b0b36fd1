#![forbid(unsafe_code)]

//! Core session tracking engine for Liftlog.
//!
//! This crate provides:
//! - Domain types (exercises, sets, per-exercise session state, submission documents)
//! - Catalog lookup across the supported workout sources
//! - Calorie and MET calculation, set validation
//! - The session clock and the active session store
//! - Aggregation of recorded sets into submission documents
//! - Profile, equipment history and submission outbox I/O

pub mod types;
pub mod error;
pub mod catalog;
pub mod calories;
pub mod validate;
pub mod clock;
pub mod store;
pub mod aggregate;
pub mod history;
pub mod submission;
pub mod profile;
pub mod schedule;
pub mod session;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Field, FieldError, Result};
pub use types::*;
pub use catalog::{CatalogContext, SourceKind, GENERAL_CATEGORY};
pub use calories::{calories, default_met, met_presets};
pub use validate::{DurationUnit, SetInput};
pub use clock::SessionClock;
pub use store::{ActiveSessionStore, HistoricalSetInput, StopOutcome};
pub use aggregate::{build_one_tap_submission, build_submission, today_local};
pub use history::{load_equipment_history, HistoricalExercise, OneTapSelection};
pub use submission::{OutboxSink, SubmissionReceipt, SubmissionSink};
pub use schedule::{Scheduler, TaskHandle};
pub use session::{FollowUp, WorkoutSession};
pub use config::Config;
