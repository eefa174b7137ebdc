/*! The table of job releases within one hyperperiod.

Every task releases its first job at time zero; those jobs are queued
when the dispatcher starts and do not appear here. Each further release,
at every positive multiple of the task's period up to and including the
horizon, is recorded under its tick. Releases sharing a tick are kept
together in priority order so that the dispatcher can process them as a
single batch.
*/

use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};

use crate::priority::Priority;
use crate::task::{TaskIndex, TickTask};
use crate::time::{Duration, Instant};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseSchedule {
    releases: BTreeMap<Instant, Vec<TaskIndex>>,
}

impl ReleaseSchedule {
    /// Precompute all releases in `(0, horizon]`. `tasks` must be in
    /// index order and ranked by `priority`.
    pub fn build(tasks: &[TickTask], priority: &Priority, horizon: Duration) -> ReleaseSchedule {
        let mut releases: BTreeMap<Instant, Vec<TaskIndex>> = BTreeMap::new();
        // visiting tasks in priority order keeps every batch sorted
        for &task in priority.order() {
            let period = tasks[task.get()].period;
            if period.is_zero() {
                continue;
            }
            let mut at = Instant::zero() + period;
            while at.since_time_zero() <= horizon {
                releases.entry(at).or_default().push(task);
                at = at + period;
            }
        }
        ReleaseSchedule { releases }
    }

    /// The tasks releasing a new job at `tick`, highest priority first.
    pub fn releases_at(&self, tick: Instant) -> &[TaskIndex] {
        self.releases.get(&tick).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The first tick after `tick` with at least one release.
    pub fn next_after(&self, tick: Instant) -> Option<Instant> {
        self.releases
            .range((Excluded(tick), Unbounded))
            .next()
            .map(|(at, _)| *at)
    }

    /// All ticks with at least one release, in increasing order.
    pub fn iter(&self) -> impl Iterator<Item = (Instant, &[TaskIndex])> + '_ {
        self.releases.iter().map(|(at, tasks)| (*at, tasks.as_slice()))
    }

    /// Number of ticks with at least one release.
    pub fn len(&self) -> usize {
        self.releases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }

    /// Total number of releases, counting each task separately.
    pub fn job_count(&self) -> usize {
        self.releases.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Granularity;
    use crate::rational::Rational;
    use crate::task::{TaskSet, TickTask};
    use crate::tests::{d, iv, q, t, task_set};

    fn setup(ts: &TaskSet, granularity: Granularity) -> (Vec<TickTask>, Priority) {
        let ticks = ts.to_ticks(&granularity).unwrap();
        (ticks, Priority::rate_monotonic(ts))
    }

    #[test]
    fn reference_example_releases() {
        let ts = task_set(&[(1, 3, 3), (2, 4, 5)]);
        let (tasks, prio) = setup(&ts, Granularity::decimal(0).unwrap());
        let rs = ReleaseSchedule::build(&tasks, &prio, d(12));

        let expected = vec![
            (t(3), iv(&[0])),
            (t(4), iv(&[1])),
            (t(6), iv(&[0])),
            (t(8), iv(&[1])),
            (t(9), iv(&[0])),
            (t(12), iv(&[0, 1])),
        ];
        let actual: Vec<_> = rs.iter().map(|(at, ts)| (at, ts.to_vec())).collect();
        assert_eq!(actual, expected);
        assert_eq!(rs.job_count(), 7);
        assert!(rs.releases_at(t(0)).is_empty());
        assert!(rs.releases_at(t(5)).is_empty());

        assert_eq!(rs.next_after(t(0)), Some(t(3)));
        assert_eq!(rs.next_after(t(3)), Some(t(4)));
        assert_eq!(rs.next_after(t(10)), Some(t(12)));
        assert_eq!(rs.next_after(t(12)), None);
    }

    #[test]
    fn batches_follow_priority_not_input_order() {
        let ts = task_set(&[(1, 4, 4), (1, 4, 4), (1, 2, 2)]);
        let (tasks, prio) = setup(&ts, Granularity::default());
        let rs = ReleaseSchedule::build(&tasks, &prio, d(4000));
        assert_eq!(rs.releases_at(t(2000)), &iv(&[2])[..]);
        assert_eq!(rs.releases_at(t(4000)), &iv(&[2, 0, 1])[..]);
        assert_eq!(rs.len(), 2);
    }

    #[test]
    fn fractional_periods_use_integer_ticks() {
        let ts = TaskSet::from_params(vec![
            (q(100), q(500), q(500)),
            (q(100), q(750), q(750)),
        ]);
        let (tasks, prio) = setup(&ts, Granularity::default());
        let rs = ReleaseSchedule::build(&tasks, &prio, d(1500));
        let ticks: Vec<_> = rs.iter().map(|(at, _)| at.tick()).collect();
        assert_eq!(ticks, vec![500, 750, 1000, 1500]);
        assert_eq!(rs.releases_at(t(1500)), &iv(&[0, 1])[..]);
    }

    #[test]
    fn single_task_releases_once_at_horizon() {
        let ts = TaskSet::from_params(vec![(
            Rational::integer(5),
            Rational::integer(5),
            Rational::integer(5),
        )]);
        let (tasks, prio) = setup(&ts, Granularity::default());
        let rs = ReleaseSchedule::build(&tasks, &prio, d(5000));
        assert_eq!(rs.job_count(), 1);
        assert_eq!(rs.releases_at(t(5000)), &iv(&[0])[..]);
    }
}
