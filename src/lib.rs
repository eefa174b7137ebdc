/*! Rate-monotonic scheduling of periodic tasks on a uniprocessor.

This crate decides whether a set of periodic tasks is schedulable under
preemptive rate-monotonic (RM) scheduling and, if it passes the
utilization screen, simulates one hyperperiod tick by tick to count how
often each task is preempted.

The pipeline, leaves first:

- [task]: the task model and its validation,
- [feasibility]: the utilization screen `U ≤ 1`,
- [hyperperiod]: the exact LCM of all periods,
- [priority]: RM priority assignment,
- [release]: the precomputed table of job releases,
- [dispatch]: the discrete-time simulation kernel,
- [analysis]: glue that runs all of the above.

The [parse] and [report] modules provide the textual input and output
formats used by the command-line front end.
*/

pub mod analysis;
pub mod config;
pub mod dispatch;
pub mod feasibility;
pub mod hyperperiod;
pub mod parse;
pub mod priority;
pub mod rational;
pub mod release;
pub mod report;
pub mod task;
pub mod time;

#[cfg(test)]
mod tests {
    use crate::rational::Rational;
    use crate::task::{TaskIndex, TaskSet};
    use crate::time::{Duration, Instant};

    pub fn d(ticks: u64) -> Duration {
        Duration::from_ticks(ticks)
    }

    pub fn t(tick: u64) -> Instant {
        Instant::from_ticks(tick)
    }

    pub fn i(index: usize) -> TaskIndex {
        TaskIndex::new(index)
    }

    pub fn iv(indices: &[usize]) -> Vec<TaskIndex> {
        indices.iter().copied().map(i).collect()
    }

    /// Exact value with three fractional digits, e.g. `q(750) == 0.75`.
    pub fn q(thousandths: u64) -> Rational {
        Rational::new(thousandths, 1000).unwrap()
    }

    /// A task set from integral `(execution, period, deadline)` triples.
    pub fn task_set(params: &[(u64, u64, u64)]) -> TaskSet {
        TaskSet::from_params(params.iter().map(|(e, p, d)| {
            (Rational::integer(*e), Rational::integer(*p), Rational::integer(*d))
        }))
    }
}
