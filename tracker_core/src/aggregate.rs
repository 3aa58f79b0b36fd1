//! Folding recorded sets into the grouped submission document.
//!
//! Exercises are filed under their category key using the same source
//! precedence as the catalog lookup. Anything no source knows about goes
//! under "General".

use crate::catalog::{CatalogContext, GENERAL_CATEGORY};
use crate::history::{HistoricalExercise, OneTapSelection};
use crate::store::ActiveSessionStore;
use crate::validate::check_met;
use crate::{
    CategoryBuckets, Error, ExerciseEntry, Field, FieldError, Result, Set,
    WorkoutSubmissionDocument,
};
use chrono::NaiveDate;

/// The local calendar day, as submitted in the `date` field
pub fn today_local() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Build the submission document from the live session store
///
/// Fails with [`Error::Precondition`] when no client id is available.
/// Exercises without sets are left out.
pub fn build_submission(
    store: &ActiveSessionStore,
    catalog: &CatalogContext,
    client_id: Option<i64>,
    gym_id: Option<i64>,
    date: NaiveDate,
    live_status: bool,
) -> Result<WorkoutSubmissionDocument> {
    let client_id = require_client_id(client_id)?;

    let mut buckets = CategoryBuckets::new();
    for (name, entry) in store.iter().filter(|(_, e)| !e.sets.is_empty()) {
        let category = catalog
            .category_for(name)
            .unwrap_or_else(|| fallback_category(name));
        buckets.entry(category).or_default().push(ExerciseEntry {
            name: name.clone(),
            sets: entry.sets.clone(),
        });
    }

    Ok(document(client_id, gym_id, date, live_status, buckets))
}

/// Build the submission document from sets picked out of equipment history
///
/// Exercises the catalog cannot place fall back to the muscle group recorded
/// in history, then to "General". Selected indices past the end of an
/// exercise's history are ignored. Every selected set needs a positive
/// duration and MET; otherwise the whole build fails with
/// [`Error::Validation`].
pub fn build_one_tap_submission(
    history: &[HistoricalExercise],
    selection: &OneTapSelection,
    catalog: &CatalogContext,
    client_id: Option<i64>,
    gym_id: Option<i64>,
    date: NaiveDate,
    live_status: bool,
) -> Result<WorkoutSubmissionDocument> {
    let client_id = require_client_id(client_id)?;

    let mut buckets = CategoryBuckets::new();
    let mut errors = Vec::new();
    for exercise in history {
        let sets: Vec<_> = selection
            .indices(&exercise.name)
            .filter_map(|i| {
                let set = exercise.sets.get(i);
                if set.is_none() {
                    tracing::warn!(
                        "Ignoring selected set {} of '{}': only {} recorded",
                        i,
                        exercise.name,
                        exercise.sets.len()
                    );
                }
                set.cloned()
            })
            .collect();
        if sets.is_empty() {
            continue;
        }
        errors.extend(sets.iter().flat_map(|set| one_tap_errors(&exercise.name, set)));

        let category = catalog
            .category_for(&exercise.name)
            .or_else(|| exercise.muscle_group.clone())
            .unwrap_or_else(|| fallback_category(&exercise.name));
        buckets.entry(category).or_default().push(ExerciseEntry {
            name: exercise.name.clone(),
            sets,
        });
    }

    if !errors.is_empty() {
        return Err(Error::Validation(errors));
    }
    Ok(document(client_id, gym_id, date, live_status, buckets))
}

/// Problems that keep a history set from being logged again
fn one_tap_errors(name: &str, set: &Set) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if set.duration == 0 {
        errors.push(FieldError::new(Field::Duration, "must be greater than 0"));
    }
    errors.extend(check_met(set.met));
    errors
        .into_iter()
        .map(|e| {
            let message = format!("{} set {}: {}", name, set.set_number, e.message);
            FieldError::new(e.field, message)
        })
        .collect()
}

fn require_client_id(client_id: Option<i64>) -> Result<i64> {
    client_id.ok_or_else(|| {
        Error::Precondition("client id is unavailable; workout cannot be submitted".into())
    })
}

fn fallback_category(name: &str) -> String {
    tracing::debug!("Filing '{}' under {}", name, GENERAL_CATEGORY);
    GENERAL_CATEGORY.to_string()
}

fn document(
    client_id: i64,
    gym_id: Option<i64>,
    date: NaiveDate,
    live_status: bool,
    buckets: CategoryBuckets,
) -> WorkoutSubmissionDocument {
    tracing::info!(
        "Built submission for client {} with {} categories",
        client_id,
        buckets.len()
    );
    WorkoutSubmissionDocument {
        client_id,
        date,
        workout_details: vec![buckets],
        live_status,
        gym_id,
    }
}
