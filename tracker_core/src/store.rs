//! In-memory store of the exercises recorded during one workout screen visit.
//!
//! Entries are keyed by exercise name and created lazily on the first start
//! or historical log. An entry disappears once it holds no sets and is not
//! being timed. At most one exercise is active store-wide; a non-cardio
//! exercise stays active after stop until its set details are completed or
//! abandoned.

use crate::calories::{calories, resolve_met};
use crate::clock::SessionClock;
use crate::validate::{check, check_met, DurationUnit, SetInput};
use crate::{
    ActiveExerciseState, Error, ExerciseEntry, ExerciseFlags, FieldError, PendingSet, Result, Set,
};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One set typed in without a live timer
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HistoricalSetInput {
    #[serde(flatten)]
    pub input: SetInput,
    #[serde(default)]
    pub unit: DurationUnit,
    pub met: f64,
}

/// What stopping an exercise produced
#[derive(Clone, Debug, PartialEq)]
pub enum StopOutcome {
    /// Cardio: the set was recorded immediately
    Recorded(Set),
    /// Non-cardio: timing captured, reps/weight still to be entered
    AwaitingDetails { duration: u32 },
}

#[derive(Debug)]
pub struct ActiveSessionStore {
    entries: BTreeMap<String, ActiveExerciseState>,
    active: Option<String>,
    clock: SessionClock,
    body_weight_kg: f64,
}

impl ActiveSessionStore {
    pub fn new(body_weight_kg: f64) -> Self {
        Self {
            entries: BTreeMap::new(),
            active: None,
            clock: SessionClock::new(),
            body_weight_kg,
        }
    }

    pub fn body_weight_kg(&self) -> f64 {
        self.body_weight_kg
    }

    pub fn get(&self, name: &str) -> Option<&ActiveExerciseState> {
        self.entries.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ActiveExerciseState)> {
        self.entries.iter()
    }

    /// Recorded sets of an exercise, empty when absent
    pub fn sets_for(&self, name: &str) -> &[Set] {
        self.entries
            .get(name)
            .map(|e| e.sets.as_slice())
            .unwrap_or_default()
    }

    /// Name of the exercise currently being timed or awaiting details
    pub fn active_exercise(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    pub fn tick(&mut self) -> u64 {
        self.clock.tick()
    }

    pub fn suspend(&mut self, now: DateTime<Utc>) {
        self.clock.suspend(now);
    }

    pub fn resume(&mut self, now: DateTime<Utc>) -> u64 {
        self.clock.resume(now)
    }

    pub fn total_calories(&self) -> f64 {
        crate::calories::round2(self.entries.values().map(|e| e.total_calories()).sum())
    }

    /// Begin timing an exercise
    ///
    /// Rejected with [`Error::Conflict`] while any exercise is active; the
    /// store is left unchanged in that case. Existing sets are preserved.
    pub fn start_exercise(&mut self, name: &str, now: DateTime<Utc>) -> Result<()> {
        if let Some(active) = &self.active {
            tracing::info!("Cannot start '{}': '{}' is active", name, active);
            return Err(Error::Conflict {
                active: active.clone(),
            });
        }

        self.clock.start(now)?;

        let entry = self.entries.entry(name.to_string()).or_default();
        entry.start_time = Some(now);
        entry.is_active = true;
        entry.pending = None;
        self.active = Some(name.to_string());

        tracing::info!("Started '{}'", name);
        Ok(())
    }

    /// Stop timing an exercise
    ///
    /// Cardio exercises record their set here with `met` or the cardio default.
    /// Other exercises only capture the timing for [`Self::complete_set`].
    pub fn stop_exercise(
        &mut self,
        name: &str,
        flags: ExerciseFlags,
        met: Option<f64>,
        now: DateTime<Utc>,
    ) -> Result<StopOutcome> {
        self.require_running(name)?;
        if let Some(err) = met.and_then(check_met) {
            return Err(Error::Validation(vec![err]));
        }

        let duration = self.clock.stop(now)?;
        let body_weight_kg = self.body_weight_kg;
        let entry = self
            .entries
            .get_mut(name)
            .ok_or_else(|| Error::UnknownExercise(name.to_string()))?;
        let start_time = entry
            .start_time
            .unwrap_or_else(|| now - Duration::seconds(i64::from(duration)));

        if !flags.is_cardio {
            entry.pending = Some(PendingSet {
                start_time,
                end_time: now,
                duration,
            });
            tracing::info!("Stopped '{}' after {}s, awaiting set details", name, duration);
            return Ok(StopOutcome::AwaitingDetails { duration });
        }

        let met = resolve_met(met, flags);
        let set = Set {
            set_number: entry.next_set_number(),
            start_time,
            end_time: now,
            reps: 0,
            weight: 0.0,
            duration,
            met,
            calories: calories(met, duration, body_weight_kg),
        };
        entry.sets.push(set.clone());
        entry.is_active = false;
        self.active = None;

        tracing::info!(
            "Recorded cardio set {} of '{}': {}s, {} kcal",
            set.set_number,
            name,
            set.duration,
            set.calories
        );
        Ok(StopOutcome::Recorded(set))
    }

    /// Record the set captured by the last stop of a non-cardio exercise
    ///
    /// On validation failure nothing changes and the caller re-prompts.
    pub fn complete_set(
        &mut self,
        name: &str,
        flags: ExerciseFlags,
        input: &SetInput,
        met: Option<f64>,
    ) -> Result<Set> {
        let body_weight_kg = self.body_weight_kg;
        let entry = self
            .entries
            .get_mut(name)
            .ok_or_else(|| Error::UnknownExercise(name.to_string()))?;
        let pending = entry.pending.clone().ok_or_else(|| {
            Error::Precondition(format!("'{}' has no stopped set awaiting details", name))
        })?;

        let valid = match (
            check(flags, input, DurationUnit::Seconds, false),
            met.and_then(check_met),
        ) {
            (Ok(valid), None) => valid,
            (checked, met_error) => {
                let mut errors = checked.err().unwrap_or_default();
                errors.extend(met_error);
                tracing::debug!("Rejected set for '{}': {} field errors", name, errors.len());
                return Err(Error::Validation(errors));
            }
        };

        let met = resolve_met(met, flags);
        let set = Set {
            set_number: entry.next_set_number(),
            start_time: pending.start_time,
            end_time: pending.end_time,
            reps: valid.reps,
            weight: valid.weight,
            duration: pending.duration,
            met,
            calories: calories(met, pending.duration, body_weight_kg),
        };
        entry.sets.push(set.clone());
        entry.pending = None;
        entry.is_active = false;
        self.active = None;

        tracing::info!(
            "Recorded set {} of '{}': {} reps × {} kg, {} kcal",
            set.set_number,
            name,
            set.reps,
            set.weight,
            set.calories
        );
        Ok(set)
    }

    /// Drop the running or stopped-but-unfinished set of the active exercise
    pub fn abandon_pending(&mut self, name: &str) -> Result<()> {
        if self.active.as_deref() != Some(name) {
            return Err(Error::Precondition(format!("'{}' is not active", name)));
        }
        self.clock.reset();
        self.active = None;
        if let Some(entry) = self.entries.get_mut(name) {
            entry.is_active = false;
            entry.pending = None;
        }
        self.remove_if_empty(name);
        tracing::info!("Abandoned in-progress set of '{}'", name);
        Ok(())
    }

    /// Log sets performed earlier without a live timer
    ///
    /// The whole batch is validated first; if any set fails, none is appended.
    /// Timestamps start at midnight (UTC) of `date` and advance by each set's
    /// duration.
    pub fn log_historical_sets(
        &mut self,
        name: &str,
        flags: ExerciseFlags,
        inputs: &[HistoricalSetInput],
        date: NaiveDate,
    ) -> Result<Vec<Set>> {
        let first_number = self.entries.get(name).map_or(1, |e| e.next_set_number());
        let anchor = date.and_time(NaiveTime::MIN).and_utc();
        let sets = build_sets(flags, inputs, anchor, first_number, self.body_weight_kg)?;
        if sets.is_empty() {
            return Ok(sets);
        }

        let entry = self.entries.entry(name.to_string()).or_default();
        entry.sets.extend(sets.iter().cloned());

        tracing::info!("Logged {} historical sets of '{}' on {}", sets.len(), name, date);
        Ok(sets)
    }

    /// Remove one set; set numbers of the others are left as they were
    pub fn delete_set(&mut self, name: &str, index: usize) -> Result<Set> {
        let entry = self
            .entries
            .get_mut(name)
            .ok_or_else(|| Error::UnknownExercise(name.to_string()))?;
        if index >= entry.sets.len() {
            return Err(Error::SetIndex {
                exercise: name.to_string(),
                index,
                len: entry.sets.len(),
            });
        }

        let removed = entry.sets.remove(index);
        self.remove_if_empty(name);
        tracing::info!("Deleted set {} of '{}'", removed.set_number, name);
        Ok(removed)
    }

    /// Replace every set of an exercise, validated as one batch
    ///
    /// The replacement keeps the original first start time and renumbers from 1.
    pub fn edit_sets(
        &mut self,
        name: &str,
        flags: ExerciseFlags,
        inputs: &[HistoricalSetInput],
    ) -> Result<Vec<Set>> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| Error::UnknownExercise(name.to_string()))?;
        let anchor = entry
            .sets
            .first()
            .map(|s| s.start_time)
            .or(entry.start_time)
            .ok_or_else(|| Error::UnknownExercise(name.to_string()))?;

        let sets = build_sets(flags, inputs, anchor, 1, self.body_weight_kg)?;
        if let Some(entry) = self.entries.get_mut(name) {
            entry.sets = sets.clone();
        }
        self.remove_if_empty(name);

        tracing::info!("Replaced sets of '{}' ({} sets)", name, sets.len());
        Ok(sets)
    }

    /// Discard everything recorded in this session
    pub fn clear(&mut self) {
        let dropped = self.entries.len();
        self.entries.clear();
        self.active = None;
        self.clock.reset();
        tracing::info!("Cleared session store ({} exercises)", dropped);
    }

    /// Drop the sets a backend acknowledged, keeping anything recorded since
    ///
    /// Sets logged, completed or edited while the save was in flight are not
    /// part of `submitted` and stay in the store. The clock is reset only once
    /// nothing is left to time.
    pub fn remove_submitted(&mut self, submitted: &[ExerciseEntry]) -> usize {
        let mut removed = 0;
        for entry in submitted {
            if let Some(state) = self.entries.get_mut(&entry.name) {
                let before = state.sets.len();
                state.sets.retain(|set| !entry.sets.contains(set));
                removed += before - state.sets.len();
            }
            self.remove_if_empty(&entry.name);
        }

        if self.entries.is_empty() && self.active.is_none() {
            self.clock.reset();
        }
        tracing::info!(
            "Removed {} submitted sets, {} exercises remain",
            removed,
            self.entries.len()
        );
        removed
    }

    fn require_running(&self, name: &str) -> Result<()> {
        let running = self.active.as_deref() == Some(name)
            && self
                .entries
                .get(name)
                .is_some_and(|e| e.is_active && e.pending.is_none());
        if running {
            Ok(())
        } else {
            Err(Error::Precondition(format!("'{}' is not being timed", name)))
        }
    }

    fn remove_if_empty(&mut self, name: &str) {
        let empty = self
            .entries
            .get(name)
            .is_some_and(|e| e.sets.is_empty() && !e.is_active);
        if empty {
            self.entries.remove(name);
            tracing::debug!("Removed empty entry '{}'", name);
        }
    }
}

/// Validate a batch and turn it into sets laid out back to back from `anchor`
fn build_sets(
    flags: ExerciseFlags,
    inputs: &[HistoricalSetInput],
    anchor: DateTime<Utc>,
    first_number: u32,
    body_weight_kg: f64,
) -> Result<Vec<Set>> {
    let mut errors: Vec<FieldError> = Vec::new();
    let mut valid = Vec::with_capacity(inputs.len());

    for (i, item) in inputs.iter().enumerate() {
        let mut item_errors = match check(flags, &item.input, item.unit, true) {
            Ok(v) => {
                valid.push((v, item.met));
                Vec::new()
            }
            Err(e) => e,
        };
        item_errors.extend(check_met(item.met));
        errors.extend(
            item_errors
                .into_iter()
                .map(|e| FieldError::new(e.field, format!("set {}: {}", i + 1, e.message))),
        );
    }

    if !errors.is_empty() {
        return Err(Error::Validation(errors));
    }

    let mut cursor = anchor;
    let sets = valid
        .into_iter()
        .zip(first_number..)
        .map(|((v, met), set_number)| {
            let duration = v.duration.unwrap_or_default();
            let start_time = cursor;
            let end_time = start_time + Duration::seconds(i64::from(duration));
            cursor = end_time;
            Set {
                set_number,
                start_time,
                end_time,
                reps: v.reps,
                weight: v.weight,
                duration,
                met,
                calories: calories(met, duration, body_weight_kg),
            }
        })
        .collect();
    Ok(sets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Field;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap()
    }

    fn at(seconds: i64) -> DateTime<Utc> {
        t0() + Duration::seconds(seconds)
    }

    fn hist(reps: u32, weight: f64, duration: u32, met: f64) -> HistoricalSetInput {
        HistoricalSetInput {
            input: SetInput::new().reps(reps).weight(weight).duration(duration),
            unit: DurationUnit::Seconds,
            met,
        }
    }

    fn store_with_sets(name: &str, count: u32) -> ActiveSessionStore {
        let mut store = ActiveSessionStore::new(70.0);
        let inputs: Vec<_> = (1..=count).map(|i| hist(i, 20.0, 30, 6.0)).collect();
        store
            .log_historical_sets(
                name,
                ExerciseFlags::STRENGTH,
                &inputs,
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            )
            .unwrap();
        store
    }

    #[test]
    fn test_cardio_stop_records_set() {
        let mut store = ActiveSessionStore::new(70.0);
        store.start_exercise("Bench Press", t0()).unwrap();

        let outcome = store
            .stop_exercise("Bench Press", ExerciseFlags::CARDIO, None, at(65))
            .unwrap();

        let StopOutcome::Recorded(set) = outcome else {
            panic!("cardio stop should record a set");
        };
        assert_eq!(set.set_number, 1);
        assert_eq!(set.duration, 65);
        assert_eq!(set.met, 8.0);
        assert_eq!(set.calories, 10.11);
        assert_eq!(store.sets_for("Bench Press").len(), 1);
        assert!(store.active_exercise().is_none());
        assert!(!store.get("Bench Press").unwrap().is_active);
    }

    #[test]
    fn test_cardio_stop_uses_chosen_met() {
        let mut store = ActiveSessionStore::new(70.0);
        store.start_exercise("Bike", t0()).unwrap();
        let outcome = store
            .stop_exercise("Bike", ExerciseFlags::CARDIO, Some(10.0), at(360))
            .unwrap();
        assert!(matches!(
            outcome,
            StopOutcome::Recorded(ref s) if s.met == 10.0 && s.calories == 70.0
        ));
    }

    #[test]
    fn test_start_rejected_while_other_active() {
        let mut store = ActiveSessionStore::new(70.0);
        store.start_exercise("Squat", t0()).unwrap();
        let before = store.get("Squat").cloned();

        let err = store.start_exercise("Deadlift", at(5)).unwrap_err();

        assert!(matches!(err, Error::Conflict { ref active } if active == "Squat"));
        assert!(!store.has("Deadlift"));
        assert_eq!(store.get("Squat").cloned(), before);
        assert_eq!(store.active_exercise(), Some("Squat"));
    }

    #[test]
    fn test_non_cardio_stop_then_complete() {
        let mut store = ActiveSessionStore::new(70.0);
        store.start_exercise("Curl", t0()).unwrap();

        let outcome = store
            .stop_exercise("Curl", ExerciseFlags::STRENGTH, None, at(30))
            .unwrap();
        assert_eq!(outcome, StopOutcome::AwaitingDetails { duration: 30 });
        assert!(store.sets_for("Curl").is_empty());
        // Still blocks other exercises until details are entered
        assert!(store.start_exercise("Row", at(31)).is_err());

        let input = SetInput::new().reps(10).weight(20);
        let set = store
            .complete_set("Curl", ExerciseFlags::STRENGTH, &input, None)
            .unwrap();

        assert_eq!(set.reps, 10);
        assert_eq!(set.weight, 20.0);
        assert_eq!(set.duration, 30);
        assert_eq!(set.met, 6.0);
        assert_eq!(set.calories, 3.5);
        assert!(store.active_exercise().is_none());
        assert!(store.start_exercise("Row", at(40)).is_ok());
    }

    #[test]
    fn test_complete_rejected_keeps_pending() {
        let mut store = ActiveSessionStore::new(70.0);
        store.start_exercise("Curl", t0()).unwrap();
        store
            .stop_exercise("Curl", ExerciseFlags::STRENGTH, None, at(30))
            .unwrap();

        let err = store
            .complete_set("Curl", ExerciseFlags::STRENGTH, &SetInput::new().reps(0), Some(-1.0))
            .unwrap_err();

        assert_eq!(err.field_errors().len(), 3);
        assert!(store.sets_for("Curl").is_empty());
        assert!(store.get("Curl").unwrap().pending.is_some());

        let input = SetInput::new().reps(5).weight(15);
        assert!(store
            .complete_set("Curl", ExerciseFlags::STRENGTH, &input, Some(4.0))
            .is_ok());
    }

    #[test]
    fn test_stop_without_active_entry() {
        let mut store = ActiveSessionStore::new(70.0);
        let err = store
            .stop_exercise("Ghost", ExerciseFlags::CARDIO, None, t0())
            .unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
    }

    #[test]
    fn test_stop_twice_is_precondition_failure() {
        let mut store = ActiveSessionStore::new(70.0);
        store.start_exercise("Curl", t0()).unwrap();
        store
            .stop_exercise("Curl", ExerciseFlags::STRENGTH, None, at(30))
            .unwrap();
        assert!(matches!(
            store.stop_exercise("Curl", ExerciseFlags::STRENGTH, None, at(31)),
            Err(Error::Precondition(_))
        ));
    }

    #[test]
    fn test_restart_preserves_existing_sets() {
        let mut store = ActiveSessionStore::new(70.0);
        store.start_exercise("Rower", t0()).unwrap();
        store
            .stop_exercise("Rower", ExerciseFlags::CARDIO, None, at(60))
            .unwrap();
        store.start_exercise("Rower", at(120)).unwrap();
        let outcome = store
            .stop_exercise("Rower", ExerciseFlags::CARDIO, None, at(180))
            .unwrap();

        assert!(matches!(outcome, StopOutcome::Recorded(ref s) if s.set_number == 2));
        assert_eq!(store.sets_for("Rower").len(), 2);
    }

    #[test]
    fn test_abandon_removes_entry_without_sets() {
        let mut store = ActiveSessionStore::new(70.0);
        store.start_exercise("Curl", t0()).unwrap();
        store
            .stop_exercise("Curl", ExerciseFlags::STRENGTH, None, at(30))
            .unwrap();

        store.abandon_pending("Curl").unwrap();
        assert!(!store.has("Curl"));
        assert!(store.active_exercise().is_none());
        assert!(!store.clock().is_running());
    }

    #[test]
    fn test_delete_last_set_removes_entry() {
        let mut store = store_with_sets("Press", 1);
        store.delete_set("Press", 0).unwrap();
        assert!(!store.has("Press"));
    }

    #[test]
    fn test_delete_preserves_order() {
        let mut store = store_with_sets("Press", 3);

        let removed = store.delete_set("Press", 1).unwrap();

        assert_eq!(removed.reps, 2);
        let reps: Vec<_> = store.sets_for("Press").iter().map(|s| s.reps).collect();
        assert_eq!(reps, vec![1, 3]);
        let numbers: Vec<_> = store.sets_for("Press").iter().map(|s| s.set_number).collect();
        assert_eq!(numbers, vec![1, 3]);
    }

    #[test]
    fn test_delete_out_of_range() {
        let mut store = store_with_sets("Press", 1);
        assert!(matches!(
            store.delete_set("Press", 4),
            Err(Error::SetIndex { len: 1, .. })
        ));
        assert!(matches!(
            store.delete_set("Nope", 0),
            Err(Error::UnknownExercise(_))
        ));
    }

    #[test]
    fn test_historical_batch_is_atomic() {
        let mut store = ActiveSessionStore::new(70.0);
        let inputs = vec![
            hist(10, 20.0, 30, 6.0),
            HistoricalSetInput {
                input: SetInput::new().reps(10).weight(20),
                unit: DurationUnit::Seconds,
                met: 6.0,
            },
        ];

        let err = store
            .log_historical_sets(
                "Press",
                ExerciseFlags::STRENGTH,
                &inputs,
                NaiveDate::from_ymd_opt(2024, 2, 28).unwrap(),
            )
            .unwrap_err();

        assert_eq!(err.field_errors().len(), 1);
        assert!(err.field_errors()[0].message.starts_with("set 2:"));
        assert!(!store.has("Press"));
    }

    #[test]
    fn test_historical_timestamps_and_units() {
        let mut store = ActiveSessionStore::new(80.0);
        let date = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        let inputs = vec![
            HistoricalSetInput {
                input: SetInput::new().duration(2),
                unit: DurationUnit::Minutes,
                met: 10.0,
            },
            HistoricalSetInput {
                input: SetInput::new().duration(45),
                unit: DurationUnit::Seconds,
                met: 12.0,
            },
        ];

        let sets = store
            .log_historical_sets("Treadmill", ExerciseFlags::CARDIO, &inputs, date)
            .unwrap();

        let midnight = Utc.with_ymd_and_hms(2024, 2, 28, 0, 0, 0).unwrap();
        assert_eq!(sets[0].duration, 120);
        assert_eq!(sets[0].start_time, midnight);
        assert_eq!(sets[0].end_time, midnight + Duration::seconds(120));
        assert_eq!(sets[1].start_time, midnight + Duration::seconds(120));
        assert_eq!(sets[1].set_number, 2);
        // 10 × 80 × 120/3600
        assert_eq!(sets[0].calories, 26.67);
    }

    #[test]
    fn test_edit_replaces_and_renumbers() {
        let mut store = store_with_sets("Press", 3);
        let first_start = store.sets_for("Press")[0].start_time;

        let sets = store
            .edit_sets(
                "Press",
                ExerciseFlags::STRENGTH,
                &[hist(12, 25.0, 40, 8.0), hist(6, 30.0, 20, 8.0)],
            )
            .unwrap();

        assert_eq!(sets.len(), 2);
        assert_eq!(store.sets_for("Press"), sets.as_slice());
        assert_eq!(sets[0].set_number, 1);
        assert_eq!(sets[0].start_time, first_start);
        assert_eq!(sets[1].reps, 6);
    }

    #[test]
    fn test_edit_rejected_leaves_sets() {
        let mut store = store_with_sets("Press", 2);
        let before = store.sets_for("Press").to_vec();

        let result = store.edit_sets("Press", ExerciseFlags::STRENGTH, &[hist(0, 25.0, 40, 8.0)]);

        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(store.sets_for("Press"), before.as_slice());
    }

    #[test]
    fn test_edit_to_nothing_removes_entry() {
        let mut store = store_with_sets("Press", 2);
        store.edit_sets("Press", ExerciseFlags::STRENGTH, &[]).unwrap();
        assert!(!store.has("Press"));
    }

    #[test]
    fn test_background_resume_then_stop() {
        let mut store = ActiveSessionStore::new(70.0);
        store.start_exercise("Rower", t0()).unwrap();
        store.tick();
        store.suspend(at(1));

        assert_eq!(store.resume(at(121)), 120);
        assert_eq!(store.clock().display_seconds(), 121);

        let outcome = store
            .stop_exercise("Rower", ExerciseFlags::CARDIO, None, at(121))
            .unwrap();
        assert!(matches!(outcome, StopOutcome::Recorded(ref s) if s.duration == 121));
    }

    #[test]
    fn test_clear_discards_everything() {
        let mut store = store_with_sets("Press", 2);
        store.start_exercise("Rower", t0()).unwrap();

        store.clear();

        assert!(store.is_empty());
        assert!(store.active_exercise().is_none());
        assert!(store.start_exercise("Rower", at(10)).is_ok());
    }

    #[test]
    fn test_remove_submitted_keeps_later_sets() {
        let mut store = store_with_sets("Press", 2);
        let submitted = vec![ExerciseEntry {
            name: "Press".into(),
            sets: store.sets_for("Press").to_vec(),
        }];

        store.start_exercise("Rower", t0()).unwrap();
        store
            .stop_exercise("Rower", ExerciseFlags::CARDIO, None, at(60))
            .unwrap();

        assert_eq!(store.remove_submitted(&submitted), 2);
        assert!(!store.has("Press"));
        assert_eq!(store.sets_for("Rower").len(), 1);
    }

    #[test]
    fn test_remove_submitted_leaves_active_exercise() {
        let mut store = store_with_sets("Press", 1);
        let submitted = vec![ExerciseEntry {
            name: "Press".into(),
            sets: store.sets_for("Press").to_vec(),
        }];
        store.start_exercise("Squat", t0()).unwrap();

        store.remove_submitted(&submitted);

        assert!(store.has("Squat"));
        assert_eq!(store.active_exercise(), Some("Squat"));
        assert!(store.clock().is_running());
    }

    #[test]
    fn test_historical_duration_rounding_to_zero_rejected() {
        let mut store = ActiveSessionStore::new(70.0);
        let inputs = vec![HistoricalSetInput {
            input: SetInput::new().reps(8).weight(30).duration("0.4"),
            unit: DurationUnit::Seconds,
            met: 6.0,
        }];

        let err = store
            .log_historical_sets(
                "Press",
                ExerciseFlags::STRENGTH,
                &inputs,
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            )
            .unwrap_err();

        assert_eq!(err.field_errors()[0].field, Field::Duration);
        assert!(!store.has("Press"));
    }
}
