//! Delayed work, behind a trait so the controller never touches a real clock.

use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

/// Work the controller asks to have done later.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScheduledTask {
    /// Turn a mismatched pair back over.
    HideMismatch { game_id: u64 },
}

pub trait Scheduler {
    /// Runs `task` once after `delay`. Must not block.
    fn schedule(&mut self, delay: Duration, task: ScheduledTask) -> TaskId;

    /// Drops a task that has not fired yet. Unknown ids are ignored.
    fn cancel(&mut self, id: TaskId);
}

/// Virtual-time scheduler. Nothing fires until [`ManualScheduler::advance`].
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    next_id: u64,
    pending: Vec<(TaskId, Duration, ScheduledTask)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Moves the clock forward and hands back every task that came due, in
    /// due order (ties keep scheduling order).
    pub fn advance(&mut self, by: Duration) -> Vec<ScheduledTask> {
        self.now += by;
        let now = self.now;
        let mut due: Vec<(TaskId, Duration, ScheduledTask)> = Vec::new();
        self.pending.retain(|entry| {
            if entry.1 <= now {
                due.push(*entry);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|(id, at, _)| (*at, *id));
        due.into_iter().map(|(_, _, task)| task).collect()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration, task: ScheduledTask) -> TaskId {
        self.next_id += 1;
        let id = TaskId(self.next_id);
        self.pending.push((id, self.now + delay, task));
        id
    }

    fn cancel(&mut self, id: TaskId) {
        self.pending.retain(|(pending_id, _, _)| *pending_id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TASK: ScheduledTask = ScheduledTask::HideMismatch { game_id: 1 };

    #[test]
    fn nothing_fires_before_its_delay() {
        let mut scheduler = ManualScheduler::new();
        scheduler.schedule(Duration::from_millis(1000), TASK);
        assert!(scheduler.advance(Duration::from_millis(999)).is_empty());
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.advance(Duration::from_millis(1)), vec![TASK]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn due_tasks_come_back_in_due_order() {
        let mut scheduler = ManualScheduler::new();
        let late = ScheduledTask::HideMismatch { game_id: 2 };
        scheduler.schedule(Duration::from_millis(500), late);
        scheduler.schedule(Duration::from_millis(100), TASK);
        assert_eq!(scheduler.advance(Duration::from_secs(1)), vec![TASK, late]);
        assert_eq!(scheduler.now(), Duration::from_secs(1));
    }

    #[test]
    fn cancelled_tasks_never_fire() {
        let mut scheduler = ManualScheduler::new();
        let id = scheduler.schedule(Duration::from_millis(10), TASK);
        scheduler.cancel(id);
        scheduler.cancel(TaskId(999));
        assert!(scheduler.advance(Duration::from_secs(5)).is_empty());
    }
}
