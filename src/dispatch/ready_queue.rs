use std::collections::BTreeMap;

use crate::priority::Rank;
use crate::task::TaskIndex;
use crate::time::{Duration, Instant};

/// A single job of a task: released at `released_at`, still needing
/// `remaining` ticks of processor service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Job {
    pub task: TaskIndex,
    pub released_at: Instant,
    pub remaining: Duration,
}

/// Pending jobs, ordered by priority rank and, within a rank, by
/// release time.
///
/// Ranks are unique per task, so two jobs can only share a rank if they
/// belong to the same task; those are served oldest first. A job that
/// is preempted and put back keeps its original release time, and thus
/// its place relative to younger jobs of the same task.
#[derive(Debug, Clone, Default)]
pub struct ReadyQueue {
    jobs: BTreeMap<(Rank, Instant), Job>,
}

impl ReadyQueue {
    pub fn new() -> ReadyQueue {
        ReadyQueue {
            jobs: BTreeMap::new(),
        }
    }

    /// Enqueue `job` at the position given by `rank`.
    pub fn insert(&mut self, rank: Rank, job: Job) {
        let previous = self.jobs.insert((rank, job.released_at), job);
        // a task never releases two jobs at the same tick
        debug_assert!(previous.is_none());
    }

    /// Remove and return the highest-priority job.
    pub fn pop(&mut self) -> Option<Job> {
        self.jobs.pop_first().map(|(_, job)| job)
    }

    pub fn peek(&self) -> Option<&Job> {
        self.jobs.values().next()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Pending jobs, highest priority first.
    pub fn iter(&self) -> impl Iterator<Item = &Job> + '_ {
        self.jobs.values()
    }
}
