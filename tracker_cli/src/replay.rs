//! Replaying a session event script.
//!
//! Each line of the script is one UI event. Recoverable engine errors are
//! reported and the replay moves on, the same way the app re-prompts.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracker_core::*;

/// One line of an event script
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    Start {
        exercise: String,
        at: DateTime<Utc>,
    },
    Stop {
        exercise: String,
        at: DateTime<Utc>,
        #[serde(default)]
        met: Option<f64>,
    },
    Complete {
        exercise: String,
        #[serde(flatten)]
        input: SetInput,
        #[serde(default)]
        met: Option<f64>,
    },
    Abandon {
        exercise: String,
    },
    Tick {
        #[serde(default = "one")]
        count: u32,
    },
    Suspend {
        at: DateTime<Utc>,
    },
    Resume {
        at: DateTime<Utc>,
    },
    LogHistorical {
        exercise: String,
        date: NaiveDate,
        sets: Vec<HistoricalSetInput>,
    },
    Delete {
        exercise: String,
        index: usize,
    },
    Edit {
        exercise: String,
        sets: Vec<HistoricalSetInput>,
    },
    Discard,
    Save {
        at: DateTime<Utc>,
        #[serde(default)]
        date: Option<NaiveDate>,
    },
}

fn one() -> u32 {
    1
}

impl Event {
    /// Wall-clock time carried by the event, if any
    fn at(&self) -> Option<DateTime<Utc>> {
        match self {
            Event::Start { at, .. }
            | Event::Stop { at, .. }
            | Event::Suspend { at }
            | Event::Resume { at }
            | Event::Save { at, .. } => Some(*at),
            _ => None,
        }
    }
}

/// Read an event script; blank lines are skipped, malformed lines are fatal
pub fn read_events(path: &Path) -> Result<Vec<Event>> {
    let file = std::fs::File::open(path)?;
    let reader = BufReader::new(file);
    let mut events = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event = serde_json::from_str::<Event>(&line)
            .map_err(|e| Error::Other(format!("event line {}: {}", line_num + 1, e)))?;
        events.push(event);
    }

    tracing::debug!("Read {} events from {:?}", events.len(), path);
    Ok(events)
}

#[derive(Debug, Default)]
pub struct ReplaySummary {
    pub rejected: usize,
    pub saved: usize,
}

pub struct Replayer<'a, S: SubmissionSink> {
    session: &'a mut WorkoutSession,
    sink: &'a mut S,
    default_date: NaiveDate,
    summary: ReplaySummary,
}

impl<'a, S: SubmissionSink> Replayer<'a, S> {
    pub fn new(session: &'a mut WorkoutSession, sink: &'a mut S, default_date: NaiveDate) -> Self {
        Self {
            session,
            sink,
            default_date,
            summary: ReplaySummary::default(),
        }
    }

    pub fn apply(&mut self, event: &Event) {
        if let Some(at) = event.at() {
            for follow_up in self.session.take_due_follow_ups(at) {
                println!("→ {:?}", follow_up);
            }
        }

        if let Err(e) = self.dispatch(event) {
            self.summary.rejected += 1;
            println!("✗ {}", e);
            for field_error in e.field_errors() {
                println!("    {}", field_error);
            }
        }
    }

    pub fn finish(self) -> ReplaySummary {
        self.summary
    }

    fn dispatch(&mut self, event: &Event) -> Result<()> {
        match event {
            Event::Start { exercise, at } => {
                self.session.start(exercise, *at)?;
                println!("✓ Started {}", exercise);
            }
            Event::Stop { exercise, at, met } => match self.session.stop(exercise, *met, *at)? {
                StopOutcome::Recorded(set) => print_set(exercise, &set),
                StopOutcome::AwaitingDetails { duration } => {
                    println!("✓ Stopped {} after {}s, awaiting set details", exercise, duration)
                }
            },
            Event::Complete {
                exercise,
                input,
                met,
            } => {
                let set = self.session.complete(exercise, input, *met)?;
                print_set(exercise, &set);
            }
            Event::Abandon { exercise } => {
                self.session.abandon(exercise)?;
                println!("✓ Abandoned {}", exercise);
            }
            Event::Tick { count } => {
                for _ in 0..*count {
                    self.session.tick();
                }
            }
            Event::Suspend { at } => self.session.suspend(*at),
            Event::Resume { at } => {
                let added = self.session.resume(*at);
                println!(
                    "✓ Resumed (+{}s, showing {}s)",
                    added,
                    self.session.store().clock().display_seconds()
                );
            }
            Event::LogHistorical {
                exercise,
                date,
                sets,
            } => {
                let logged = self.session.log_historical(exercise, sets, *date)?;
                println!("✓ Logged {} sets of {} on {}", logged.len(), exercise, date);
            }
            Event::Delete { exercise, index } => {
                let removed = self.session.delete_set(exercise, *index)?;
                println!("✓ Deleted set {} of {}", removed.set_number, exercise);
            }
            Event::Edit { exercise, sets } => {
                let replaced = self.session.edit_sets(exercise, sets)?;
                println!("✓ {} now has {} sets", exercise, replaced.len());
            }
            Event::Discard => {
                self.session.discard();
                println!("✓ Session discarded");
            }
            Event::Save { at, date } => {
                let date = date.unwrap_or(self.default_date);
                let receipt = self.session.save(&mut *self.sink, date, *at)?;
                self.summary.saved += 1;
                match receipt.reward_points {
                    Some(points) => println!("✓ Workout saved ({} points)", points),
                    None => println!("✓ Workout saved"),
                }
            }
        }
        Ok(())
    }
}

fn print_set(exercise: &str, set: &Set) {
    println!(
        "✓ {} set {}: {}s, {} reps × {} kg, MET {}, {:.2} kcal",
        exercise, set.set_number, set.duration, set.reps, set.weight, set.met, set.calories
    );
}
