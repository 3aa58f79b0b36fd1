//! Equipment history used for one-tap logging.
//!
//! History is exported as CSV, one row per previously recorded set. Rows are
//! grouped per exercise in the order the exercises first appear.

use crate::{Result, Set};
use chrono::{DateTime, Utc};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// CSV row format of the equipment history export
#[derive(Debug, Deserialize)]
struct HistoryRow {
    exercise: String,
    muscle_group: Option<String>,
    set_number: u32,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    reps: u32,
    weight: f64,
    duration: u32,
    met: f64,
    calories: f64,
}

impl From<HistoryRow> for Set {
    fn from(row: HistoryRow) -> Self {
        Set {
            set_number: row.set_number,
            start_time: row.start_time,
            end_time: row.end_time,
            reps: row.reps,
            weight: row.weight,
            duration: row.duration,
            met: row.met,
            calories: row.calories,
        }
    }
}

/// A previously seen exercise and its recorded sets
#[derive(Clone, Debug, PartialEq)]
pub struct HistoricalExercise {
    pub name: String,
    pub muscle_group: Option<String>,
    pub sets: Vec<Set>,
}

/// Load equipment history from a CSV file
///
/// Returns an empty history if the file doesn't exist. Rows that fail to
/// parse are logged and skipped.
pub fn load_equipment_history(path: &Path) -> Result<Vec<HistoricalExercise>> {
    if !path.exists() {
        tracing::debug!("No equipment history at {:?}", path);
        return Ok(Vec::new());
    }

    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut exercises: Vec<HistoricalExercise> = Vec::new();

    for (line, result) in reader.deserialize::<HistoryRow>().enumerate() {
        let mut row = match result {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!("Skipping history row {}: {}", line + 2, e);
                continue;
            }
        };

        let muscle_group = row.muscle_group.take().filter(|g| !g.trim().is_empty());
        let name = std::mem::take(&mut row.exercise);
        match exercises.iter_mut().find(|e| e.name == name) {
            Some(existing) => {
                if existing.muscle_group.is_none() {
                    existing.muscle_group = muscle_group;
                }
                existing.sets.push(row.into());
            }
            None => exercises.push(HistoricalExercise {
                name,
                muscle_group,
                sets: vec![row.into()],
            }),
        }
    }

    tracing::info!("Loaded history for {} exercises", exercises.len());
    Ok(exercises)
}

/// Sets picked for one-tap submission, by exercise name and set index
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OneTapSelection {
    selected: BTreeMap<String, BTreeSet<usize>>,
}

impl OneTapSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, exercise: &str, index: usize) {
        self.selected
            .entry(exercise.to_string())
            .or_default()
            .insert(index);
    }

    /// Flip a set in or out of the selection; returns whether it is now selected
    pub fn toggle(&mut self, exercise: &str, index: usize) -> bool {
        let indices = self.selected.entry(exercise.to_string()).or_default();
        let now_selected = if indices.remove(&index) {
            false
        } else {
            indices.insert(index);
            true
        };
        if indices.is_empty() {
            self.selected.remove(exercise);
        }
        now_selected
    }

    pub fn is_selected(&self, exercise: &str, index: usize) -> bool {
        self.selected
            .get(exercise)
            .is_some_and(|indices| indices.contains(&index))
    }

    /// Selected indices for an exercise, ascending
    pub fn indices(&self, exercise: &str) -> impl Iterator<Item = usize> + '_ {
        self.selected.get(exercise).into_iter().flatten().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }
}
