//! Deferred follow-up actions with explicit handles.
//!
//! Whoever schedules a task owns its handle and can cancel it. Due tasks are
//! taken out exactly once, so a cancelled or already-fired task never runs
//! again.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Handle to a scheduled task
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskHandle(Uuid);

#[derive(Debug)]
struct ScheduledTask<T> {
    handle: TaskHandle,
    due: DateTime<Utc>,
    payload: T,
}

#[derive(Debug)]
pub struct Scheduler<T> {
    tasks: Vec<ScheduledTask<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self { tasks: Vec::new() }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: DateTime<Utc>, payload: T) -> TaskHandle {
        let handle = TaskHandle(Uuid::new_v4());
        self.tasks.push(ScheduledTask {
            handle,
            due,
            payload,
        });
        handle
    }

    /// Returns false if the task already fired or was cancelled
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.handle != handle);
        before != self.tasks.len()
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.tasks.iter().any(|t| t.handle == handle)
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Remove and return every task due at `now`, earliest first
    pub fn take_due(&mut self, now: DateTime<Utc>) -> Vec<T> {
        let (mut due, waiting): (Vec<_>, Vec<_>) =
            self.tasks.drain(..).partition(|t| t.due <= now);
        self.tasks = waiting;
        due.sort_by_key(|t| t.due);
        due.into_iter().map(|t| t.payload).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_due_tasks_fire_once_in_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(t0() + Duration::seconds(5), "b");
        scheduler.schedule(t0() + Duration::seconds(1), "a");
        scheduler.schedule(t0() + Duration::seconds(60), "c");

        assert_eq!(scheduler.take_due(t0() + Duration::seconds(10)), vec!["a", "b"]);
        assert!(scheduler.take_due(t0() + Duration::seconds(10)).is_empty());
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn test_cancelled_task_never_fires() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler.schedule(t0(), 1);

        assert!(scheduler.cancel(handle));
        assert!(!scheduler.cancel(handle));
        assert!(scheduler.take_due(t0()).is_empty());
    }
}
