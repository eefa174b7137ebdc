/*! The periodic task model.

A [TaskSet] is an ordered, read-only collection of [Task]s as they
appear in the input. Each task keeps its parameters as exact
[Rational] time values; before any analysis, a task set is validated
and converted to integral tick counts ([TickTask]) with
[TaskSet::to_ticks].
*/

use derive_more::{Display, From, Into};
use thiserror::Error;

use crate::config::Granularity;
use crate::rational::Rational;
use crate::time::Duration;

/// The 0-based position of a task in its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into, Display)]
pub struct TaskIndex(usize);

impl TaskIndex {
    pub const fn new(index: usize) -> TaskIndex {
        TaskIndex(index)
    }

    pub const fn get(self) -> usize {
        self.0
    }
}

/// Names one of the three numeric parameters of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Field {
    #[display(fmt = "execution time")]
    ExecutionTime,
    #[display(fmt = "period")]
    Period,
    #[display(fmt = "deadline")]
    Deadline,
}

/// Error type returned when a task set cannot be analyzed at all.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A task parameter is zero.
    #[error("task {task}: {field} must be positive")]
    NonPositive { task: TaskIndex, field: Field },

    /// A task needs more processor time per job than its period provides.
    #[error("task {task}: execution time {execution} exceeds period {period}")]
    ExecutionExceedsPeriod {
        task: TaskIndex,
        execution: Rational,
        period: Rational,
    },

    /// A task parameter is not a whole number of ticks.
    #[error("task {task}: {field} {value} is not a multiple of the tick length")]
    NotRepresentable {
        task: TaskIndex,
        field: Field,
        value: Rational,
    },

    /// Exact arithmetic exceeded 64 bits.
    #[error("arithmetic overflow while computing {what}")]
    Overflow { what: &'static str },

    /// The hyperperiod is longer than the configured simulation limit.
    #[error("hyperperiod of {horizon} ticks exceeds the limit of {limit} ticks")]
    HorizonTooLong { horizon: Duration, limit: Duration },

    /// The per-tick time chart for this horizon does not fit in memory.
    #[error("cannot record a time chart of {horizon} ticks")]
    TimeChartTooLong { horizon: Duration },

    /// A hyperperiod was requested for zero periods.
    #[error("cannot compute a hyperperiod without any periods")]
    NoPeriods,
}

/// A periodic task with implicit release offset zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Task {
    index: TaskIndex,
    /// Worst-case execution time of each job.
    pub execution_time: Rational,
    /// Exact separation between two job releases.
    pub period: Rational,
    /// Relative deadline. Carried along but not used to take any
    /// scheduling decision: the simulator treats deadlines as implicit.
    pub deadline: Rational,
}

impl Task {
    pub fn index(&self) -> TaskIndex {
        self.index
    }

    /// Fraction of the processor this task requires. `None` if the
    /// period is zero.
    pub fn utilization(&self) -> Option<Rational> {
        self.execution_time.checked_div(self.period)
    }

    /// Check the parameter invariants and express the task in ticks.
    pub fn to_ticks(&self, granularity: &Granularity) -> Result<TickTask, ConfigurationError> {
        let task = self.index;
        for (field, value) in [
            (Field::ExecutionTime, self.execution_time),
            (Field::Period, self.period),
            (Field::Deadline, self.deadline),
        ] {
            if value.is_zero() {
                return Err(ConfigurationError::NonPositive { task, field });
            }
        }
        if self.execution_time > self.period {
            return Err(ConfigurationError::ExecutionExceedsPeriod {
                task,
                execution: self.execution_time,
                period: self.period,
            });
        }
        Ok(TickTask {
            index: task,
            execution: granularity.task_ticks(task, Field::ExecutionTime, self.execution_time)?,
            period: granularity.task_ticks(task, Field::Period, self.period)?,
            deadline: granularity.task_ticks(task, Field::Deadline, self.deadline)?,
        })
    }
}

/// A validated task, with all parameters expressed as tick counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickTask {
    pub index: TaskIndex,
    pub execution: Duration,
    pub period: Duration,
    pub deadline: Duration,
}

/// An ordered collection of tasks. Task indices are assigned in
/// insertion order and never reused.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskSet {
    tasks: Vec<Task>,
}

impl TaskSet {
    pub fn new() -> TaskSet {
        TaskSet { tasks: Vec::new() }
    }

    /// Build a task set from `(execution_time, period, deadline)`
    /// triples, indexed in iteration order.
    pub fn from_params<I>(params: I) -> TaskSet
    where
        I: IntoIterator<Item = (Rational, Rational, Rational)>,
    {
        let mut ts = TaskSet::new();
        for (execution_time, period, deadline) in params {
            ts.push(execution_time, period, deadline);
        }
        ts
    }

    /// Append a task and return its index.
    pub fn push(&mut self, execution_time: Rational, period: Rational, deadline: Rational) -> TaskIndex {
        let index = TaskIndex(self.tasks.len());
        self.tasks.push(Task {
            index,
            execution_time,
            period,
            deadline,
        });
        index
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, index: TaskIndex) -> Option<&Task> {
        self.tasks.get(index.0)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    pub fn periods(&self) -> impl Iterator<Item = Rational> + '_ {
        self.tasks.iter().map(|t| t.period)
    }

    /// Validate every task and convert the whole set to ticks. The
    /// first offending task, in input order, is reported.
    pub fn to_ticks(&self, granularity: &Granularity) -> Result<Vec<TickTask>, ConfigurationError> {
        self.tasks.iter().map(|t| t.to_ticks(granularity)).collect()
    }
}

impl<'a> IntoIterator for &'a TaskSet {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}

#[cfg(test)]
mod tests;
