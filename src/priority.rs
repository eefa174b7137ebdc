/*! Rate-monotonic priority assignment.

RM is a static-priority policy: the shorter a task's period, the higher
its priority. Tasks with equal periods are ordered by input position so
that the ranking is total and reproducible. The resulting [Priority] is
computed once and read by every later stage.
*/

use derive_more::{Display, From, Into};
use itertools::Itertools;

use crate::task::{TaskIndex, TaskSet};

/// A priority rank: `1` is the highest priority, larger is lower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into, Display)]
pub struct Rank(usize);

impl Rank {
    pub const HIGHEST: Rank = Rank(1);

    pub const fn get(self) -> usize {
        self.0
    }

    /// Whether `self` denotes a strictly higher priority than `other`.
    pub fn is_higher_than(self, other: Rank) -> bool {
        self.0 < other.0
    }
}

/// A strict total order over the tasks of a task set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Priority {
    /// rank of each task, indexed by task index
    ranks: Vec<Rank>,
    /// task indices from highest to lowest priority
    order: Vec<TaskIndex>,
}

impl Priority {
    /// Rank the tasks of `tasks` by ascending period.
    pub fn rate_monotonic(tasks: &TaskSet) -> Priority {
        Priority::by_key(tasks.periods())
    }

    /// Rank tasks by ascending `key`; task `i` has the `i`-th key.
    /// Equal keys are ordered by ascending index.
    pub fn by_key<K, I>(keys: I) -> Priority
    where
        K: Ord,
        I: IntoIterator<Item = K>,
    {
        // stable sort: ties keep input order
        let order: Vec<TaskIndex> = keys
            .into_iter()
            .enumerate()
            .sorted_by(|(_, a), (_, b)| a.cmp(b))
            .map(|(i, _)| TaskIndex::new(i))
            .collect();
        let mut ranks = vec![Rank::HIGHEST; order.len()];
        for (pos, task) in order.iter().enumerate() {
            ranks[task.get()] = Rank(pos + 1);
        }
        Priority { ranks, order }
    }

    pub fn rank(&self, task: TaskIndex) -> Rank {
        self.ranks[task.get()]
    }

    /// All ranks, indexed by task index.
    pub fn ranks(&self) -> &[Rank] {
        &self.ranks
    }

    /// Task indices from highest to lowest priority.
    pub fn order(&self) -> &[TaskIndex] {
        &self.order
    }

    /// Whether task `a` has strictly higher priority than task `b`.
    pub fn is_higher(&self, a: TaskIndex, b: TaskIndex) -> bool {
        self.rank(a).is_higher_than(self.rank(b))
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{i, iv, q, task_set};
    use crate::task::TaskSet;

    fn ranks(p: &Priority) -> Vec<usize> {
        p.ranks().iter().map(|r| r.get()).collect()
    }

    #[test]
    fn shorter_period_ranks_higher() {
        let p = Priority::rate_monotonic(&task_set(&[(1, 3, 3), (2, 4, 5)]));
        assert_eq!(ranks(&p), vec![1, 2]);
        assert!(p.is_higher(i(0), i(1)));
        assert!(!p.is_higher(i(1), i(0)));
        assert!(!p.is_higher(i(0), i(0)));
    }

    #[test]
    fn ties_are_broken_by_index() {
        let p = Priority::rate_monotonic(&task_set(&[(1, 4, 4), (1, 4, 4), (1, 2, 2)]));
        assert_eq!(p.order(), &iv(&[2, 0, 1])[..]);
        assert_eq!(ranks(&p), vec![2, 3, 1]);
        assert_eq!(p.rank(i(2)), Rank::HIGHEST);
    }

    #[test]
    fn fractional_periods() {
        let ts = TaskSet::from_params(vec![
            (q(100), q(750), q(750)),
            (q(100), q(500), q(500)),
            (q(100), q(751), q(751)),
        ]);
        let p = Priority::rate_monotonic(&ts);
        assert_eq!(p.order(), &iv(&[1, 0, 2])[..]);
    }

    #[test]
    fn ranking_is_a_permutation() {
        let p = Priority::by_key(vec![7, 3, 3, 9, 1, 3]);
        let mut seen: Vec<usize> = ranks(&p);
        seen.sort_unstable();
        assert_eq!(seen, (1..=6).collect::<Vec<_>>());
        assert_eq!(p.order(), &iv(&[4, 1, 2, 5, 0, 3])[..]);
    }

    #[test]
    fn empty() {
        let p = Priority::by_key(Vec::<u64>::new());
        assert!(p.is_empty());
        assert!(p.order().is_empty());
    }
}
