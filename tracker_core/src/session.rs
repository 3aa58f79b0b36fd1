//! One workout screen visit: store, catalog, profile and save lifecycle.
//!
//! Every operation resolves the exercise classification through the catalog
//! lookup before touching the store, so callers never branch on source shape.
//! Saving is split around the network boundary: [`WorkoutSession::begin_save`]
//! builds the document and marks a save as in flight, and
//! [`WorkoutSession::finish_save`] applies the sink's answer.

use crate::aggregate::{build_one_tap_submission, build_submission};
use crate::catalog::CatalogContext;
use crate::config::MAX_POST_SAVE_DELAY_MS;
use crate::history::{HistoricalExercise, OneTapSelection};
use crate::schedule::{Scheduler, TaskHandle};
use crate::store::{ActiveSessionStore, HistoricalSetInput, StopOutcome};
use crate::submission::{SubmissionReceipt, SubmissionSink};
use crate::validate::SetInput;
use crate::{
    Config, Error, Exercise, ExerciseEntry, Profile, Result, Set, WorkoutSubmissionDocument,
};
use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Deferred action after a successful save
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FollowUp {
    /// Leave the summary and return to the start screen
    CloseSummary,
}

/// What the in-flight save will do once acknowledged
#[derive(Clone, Debug, PartialEq)]
enum SaveKind {
    /// Live store save, holding the entries that went into the document
    Live(Vec<ExerciseEntry>),
    OneTap,
}

#[derive(Debug)]
pub struct WorkoutSession {
    store: ActiveSessionStore,
    catalog: CatalogContext,
    profile: Profile,
    in_flight: Option<SaveKind>,
    follow_ups: Scheduler<FollowUp>,
    follow_up: Option<TaskHandle>,
    post_save_delay: Duration,
}

impl WorkoutSession {
    pub fn new(catalog: CatalogContext, profile: Profile, config: &Config) -> Self {
        let body_weight_kg = profile.body_weight_or(config.profile.default_body_weight_kg);
        tracing::info!(
            "Session opened (client {:?}, {} kg)",
            profile.client_id,
            body_weight_kg
        );
        Self {
            store: ActiveSessionStore::new(body_weight_kg),
            catalog,
            profile,
            in_flight: None,
            follow_ups: Scheduler::new(),
            follow_up: None,
            post_save_delay: Duration::milliseconds(
                i64::try_from(config.session.post_save_delay_ms.min(MAX_POST_SAVE_DELAY_MS))
                    .unwrap_or_default(),
            ),
        }
    }

    pub fn store(&self) -> &ActiveSessionStore {
        &self.store
    }

    pub fn catalog(&self) -> &CatalogContext {
        &self.catalog
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn exercise(&self, name: &str) -> Exercise {
        self.catalog.exercise(name)
    }

    pub fn is_saving(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn start(&mut self, name: &str, now: DateTime<Utc>) -> Result<()> {
        self.store.start_exercise(name, now)
    }

    pub fn stop(
        &mut self,
        name: &str,
        met: Option<f64>,
        now: DateTime<Utc>,
    ) -> Result<StopOutcome> {
        let flags = self.catalog.flags_for(name);
        self.store.stop_exercise(name, flags, met, now)
    }

    pub fn complete(&mut self, name: &str, input: &SetInput, met: Option<f64>) -> Result<Set> {
        let flags = self.catalog.flags_for(name);
        self.store.complete_set(name, flags, input, met)
    }

    pub fn abandon(&mut self, name: &str) -> Result<()> {
        self.store.abandon_pending(name)
    }

    pub fn log_historical(
        &mut self,
        name: &str,
        inputs: &[HistoricalSetInput],
        date: NaiveDate,
    ) -> Result<Vec<Set>> {
        let flags = self.catalog.flags_for(name);
        self.store.log_historical_sets(name, flags, inputs, date)
    }

    pub fn delete_set(&mut self, name: &str, index: usize) -> Result<Set> {
        self.store.delete_set(name, index)
    }

    pub fn edit_sets(&mut self, name: &str, inputs: &[HistoricalSetInput]) -> Result<Vec<Set>> {
        let flags = self.catalog.flags_for(name);
        self.store.edit_sets(name, flags, inputs)
    }

    pub fn tick(&mut self) -> u64 {
        self.store.tick()
    }

    pub fn suspend(&mut self, now: DateTime<Utc>) {
        self.store.suspend(now);
    }

    pub fn resume(&mut self, now: DateTime<Utc>) -> u64 {
        self.store.resume(now)
    }

    /// Back navigation with discard: drop everything unconditionally
    pub fn discard(&mut self) {
        self.store.clear();
        self.cancel_follow_up();
    }

    /// Build the document for the live store and mark a save in flight
    pub fn begin_save(&mut self, date: NaiveDate) -> Result<WorkoutSubmissionDocument> {
        self.require_idle()?;
        let document = build_submission(
            &self.store,
            &self.catalog,
            self.profile.client_id,
            self.profile.gym_id,
            date,
            self.profile.live_status,
        )?;
        let submitted = document
            .workout_details
            .iter()
            .flat_map(|buckets| buckets.values().flatten())
            .cloned()
            .collect();
        self.in_flight = Some(SaveKind::Live(submitted));
        Ok(document)
    }

    /// Build a one-tap document from equipment history and mark a save in flight
    pub fn begin_one_tap_save(
        &mut self,
        history: &[HistoricalExercise],
        selection: &OneTapSelection,
        date: NaiveDate,
    ) -> Result<WorkoutSubmissionDocument> {
        self.require_idle()?;
        let document = build_one_tap_submission(
            history,
            selection,
            &self.catalog,
            self.profile.client_id,
            self.profile.gym_id,
            date,
            self.profile.live_status,
        )?;
        self.in_flight = Some(SaveKind::OneTap);
        Ok(document)
    }

    /// Apply the sink's answer to the in-flight save
    ///
    /// On success a live save removes the submitted sets from the store and the
    /// post-save follow-up is (re)scheduled. Sets recorded while the save was in
    /// flight are kept. On failure the store is untouched so the same sets can
    /// be submitted again.
    pub fn finish_save(
        &mut self,
        outcome: Result<SubmissionReceipt>,
        now: DateTime<Utc>,
    ) -> Result<SubmissionReceipt> {
        let kind = self
            .in_flight
            .take()
            .ok_or_else(|| Error::Precondition("no save is in progress".into()))?;

        let receipt = match outcome {
            Ok(receipt) => receipt,
            Err(e) => {
                tracing::warn!("Workout submission failed: {}", e);
                return Err(e);
            }
        };

        if let SaveKind::Live(submitted) = kind {
            self.store.remove_submitted(&submitted);
        }
        self.cancel_follow_up();
        let due = now.checked_add_signed(self.post_save_delay).unwrap_or_else(|| {
            tracing::warn!("Post-save delay out of range, closing summary immediately");
            now
        });
        self.follow_up = Some(self.follow_ups.schedule(due, FollowUp::CloseSummary));

        tracing::info!(
            "Workout saved{}",
            receipt
                .reward_points
                .map(|p| format!(", earned {} points", p))
                .unwrap_or_default()
        );
        Ok(receipt)
    }

    /// Build, submit and settle a live save in one call
    pub fn save<S: SubmissionSink + ?Sized>(
        &mut self,
        sink: &mut S,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<SubmissionReceipt> {
        let document = self.begin_save(date)?;
        let outcome = sink.submit(&document);
        self.finish_save(outcome, now)
    }

    /// Build, submit and settle a one-tap save; the selection is cleared on success
    pub fn save_one_tap<S: SubmissionSink + ?Sized>(
        &mut self,
        sink: &mut S,
        history: &[HistoricalExercise],
        selection: &mut OneTapSelection,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<SubmissionReceipt> {
        let document = self.begin_one_tap_save(history, selection, date)?;
        let outcome = sink.submit(&document);
        let receipt = self.finish_save(outcome, now)?;
        selection.clear();
        Ok(receipt)
    }

    pub fn pending_follow_up(&self) -> Option<TaskHandle> {
        self.follow_up.filter(|handle| self.follow_ups.is_pending(*handle))
    }

    /// Follow-ups whose delay has elapsed; each fires once
    pub fn take_due_follow_ups(&mut self, now: DateTime<Utc>) -> Vec<FollowUp> {
        let due = self.follow_ups.take_due(now);
        if !due.is_empty() {
            self.follow_up = None;
        }
        due
    }

    fn cancel_follow_up(&mut self) {
        if let Some(handle) = self.follow_up.take() {
            self.follow_ups.cancel(handle);
        }
    }

    fn require_idle(&self) -> Result<()> {
        if self.is_saving() {
            return Err(Error::Precondition("a save is already in progress".into()));
        }
        Ok(())
    }
}
