/*! The discrete-time dispatcher.

This is the simulation kernel. It advances over the closed horizon
`[0, H]` one tick at a time and, at each tick `t`, in this order:

1. processes the batch of job releases scheduled for `t`, highest
   priority first: a released job whose task has strictly higher
   priority than the running job's task preempts it (the preempted job
   goes back to the ready queue with its remaining service and its task's
   preemption counter is incremented); otherwise the released job runs
   immediately if the processor is idle, or waits in the ready queue;
2. lets the running job (if any) consume tick `t`; a job whose remaining
   service drops to zero completes at the end of `t`, and the next
   ready job, if any, is dispatched from `t + 1`.

A completing job hands over the processor at the end of its last tick.
A release at the following tick therefore never counts as a preemption
of the completed job.

At time zero, the first job of every task is pending and the
highest-priority one is dispatched. The loop covers exactly `H + 1`
ticks. [Dispatcher::run] steps through every tick at which a job is
released or completes; in between, the running job (or the idle
processor) just keeps the processor, so those spans are accounted for
in bulk.
*/

use log::trace;

use crate::priority::Priority;
use crate::release::ReleaseSchedule;
use crate::task::{ConfigurationError, TaskIndex, TickTask};
use crate::time::{Duration, Instant};

mod ready_queue;

pub use ready_queue::{Job, ReadyQueue};

/// The job currently holding the processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunningJob {
    pub job: Job,
    /// The tick at which the job (re)gained the processor.
    pub started_at: Instant,
}

/// Processor state between two ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Processor {
    Idle,
    Running(RunningJob),
}

impl Processor {
    pub fn running_task(&self) -> Option<TaskIndex> {
        match self {
            Processor::Idle => None,
            Processor::Running(r) => Some(r.job.task),
        }
    }
}

/// Which task (if any) occupied the processor at each tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeChart {
    ticks: Vec<Option<TaskIndex>>,
}

impl TimeChart {
    /// Reserve one entry per tick of `[0, horizon]` up front, or fail if
    /// that much memory is not available.
    fn for_horizon(horizon: Duration) -> Result<TimeChart, ConfigurationError> {
        let too_long = || ConfigurationError::TimeChartTooLong { horizon };
        let len = usize::try_from(horizon.ticks())
            .ok()
            .and_then(|n| n.checked_add(1))
            .ok_or_else(too_long)?;
        let mut ticks = Vec::new();
        ticks.try_reserve_exact(len).map_err(|_| too_long())?;
        Ok(TimeChart { ticks })
    }

    fn record(&mut self, occupant: Option<TaskIndex>) {
        self.ticks.push(occupant);
    }

    fn record_span(&mut self, occupant: Option<TaskIndex>, span: Duration) {
        self.ticks
            .extend(std::iter::repeat(occupant).take(span.ticks() as usize));
    }

    /// The task that ran at `tick`, or `None` if the processor was idle.
    /// Also `None` for ticks beyond the horizon.
    pub fn at(&self, tick: Instant) -> Option<TaskIndex> {
        self.ticks.get(tick.tick() as usize).copied().flatten()
    }

    pub fn as_slice(&self) -> &[Option<TaskIndex>] {
        &self.ticks
    }

    /// Number of recorded ticks.
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    /// Number of ticks during which `task` ran.
    pub fn busy_ticks(&self, task: TaskIndex) -> usize {
        self.ticks.iter().filter(|t| **t == Some(task)).count()
    }
}

/// Mutable simulation state, owned exclusively by the [Dispatcher].
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub processor: Processor,
    pub ready: ReadyQueue,
    pub preemptions: Vec<u64>,
    pub completions: Vec<u64>,
    pub time_chart: Option<TimeChart>,
}

/// The frozen result of one simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Simulation {
    /// Simulated horizon `H`; ticks `0..=H` were simulated.
    pub horizon: Duration,
    /// Number of times each task's running job was displaced before
    /// completing, indexed by task index.
    pub preemptions: Vec<u64>,
    /// Number of jobs of each task that finished within the horizon.
    pub completions: Vec<u64>,
    /// Per-tick record of the running task, if requested.
    pub time_chart: Option<TimeChart>,
}

/// Simulates preemptive fixed-priority scheduling of `tasks` over
/// `[0, horizon]`. All inputs are read-only.
pub struct Dispatcher<'a> {
    tasks: &'a [TickTask],
    priority: &'a Priority,
    releases: &'a ReleaseSchedule,
    horizon: Duration,
    state: SimulationState,
}

impl<'a> Dispatcher<'a> {
    /// Set up the dispatcher with the first job of every task pending
    /// and the highest-priority one running. `tasks` must be in index
    /// order and ranked by `priority`. Fails only if a requested time
    /// chart cannot be allocated.
    pub fn new(
        tasks: &'a [TickTask],
        priority: &'a Priority,
        releases: &'a ReleaseSchedule,
        horizon: Duration,
        record_time_chart: bool,
    ) -> Result<Dispatcher<'a>, ConfigurationError> {
        let n = tasks.len();
        let state = SimulationState {
            processor: Processor::Idle,
            ready: ReadyQueue::new(),
            preemptions: vec![0; n],
            completions: vec![0; n],
            time_chart: if record_time_chart {
                Some(TimeChart::for_horizon(horizon)?)
            } else {
                None
            },
        };
        let mut dispatcher = Dispatcher {
            tasks,
            priority,
            releases,
            horizon,
            state,
        };
        let start = Instant::zero();
        for task in tasks {
            let job = dispatcher.release(task.index, start);
            dispatcher.enqueue(job);
        }
        dispatcher.dispatch_next(start);
        Ok(dispatcher)
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Run the whole horizon and return the final counters.
    pub fn run(mut self) -> Simulation {
        let last = Instant::from_time_zero(self.horizon);
        let mut now = Instant::zero();
        loop {
            self.step(now);
            if now >= last {
                break;
            }
            let next = self.next_event(now, last);
            self.coast(next - now.next());
            now = next;
        }
        Simulation {
            horizon: self.horizon,
            preemptions: self.state.preemptions,
            completions: self.state.completions,
            time_chart: self.state.time_chart,
        }
    }

    /// Simulate tick `now`.
    pub fn step(&mut self, now: Instant) {
        self.process_releases(now);
        self.execute(now);
    }

    /// The first tick after `now` at which a job is released or the
    /// running job completes, capped at `last`.
    fn next_event(&self, now: Instant, last: Instant) -> Instant {
        let mut next = last;
        if let Some(at) = self.releases.next_after(now) {
            next = next.min(at);
        }
        if let Processor::Running(current) = self.state.processor {
            // the job needs ticks now+1 ..= now+remaining
            next = next.min(now + current.job.remaining);
        }
        next
    }

    /// Let the current occupant keep the processor for `span` ticks in
    /// which nothing is released and nothing completes.
    fn coast(&mut self, span: Duration) {
        if span.is_zero() {
            return;
        }
        let occupant = self.state.processor.running_task();
        if let Some(chart) = self.state.time_chart.as_mut() {
            chart.record_span(occupant, span);
        }
        if let Processor::Running(ref mut current) = self.state.processor {
            debug_assert!(span < current.job.remaining);
            current.job.remaining -= span;
        }
    }

    fn release(&self, task: TaskIndex, now: Instant) -> Job {
        Job {
            task,
            released_at: now,
            remaining: self.tasks[task.get()].execution,
        }
    }

    fn enqueue(&mut self, job: Job) {
        self.state.ready.insert(self.priority.rank(job.task), job);
    }

    fn process_releases(&mut self, now: Instant) {
        let releases = self.releases;
        for &task in releases.releases_at(now) {
            let job = self.release(task, now);
            match self.state.processor {
                Processor::Idle => self.start(job, now),
                Processor::Running(current) if self.priority.is_higher(task, current.job.task) => {
                    trace!(
                        "t={}: task {} preempts task {} ({} ticks left)",
                        now,
                        task,
                        current.job.task,
                        current.job.remaining
                    );
                    self.state.preemptions[current.job.task.get()] += 1;
                    self.enqueue(current.job);
                    self.start(job, now);
                }
                Processor::Running(_) => self.enqueue(job),
            }
        }
    }

    fn execute(&mut self, now: Instant) {
        let occupant = self.state.processor.running_task();
        if let Some(chart) = self.state.time_chart.as_mut() {
            chart.record(occupant);
        }
        if let Processor::Running(ref mut current) = self.state.processor {
            current.job.remaining -= Duration::epsilon();
            if current.job.remaining.is_zero() {
                let task = current.job.task;
                trace!(
                    "t={}: task {} completes job released at {} (ran since {})",
                    now,
                    task,
                    current.job.released_at,
                    current.started_at
                );
                self.state.completions[task.get()] += 1;
                self.dispatch_next(now.next());
            }
        }
    }

    fn start(&mut self, job: Job, now: Instant) {
        self.state.processor = Processor::Running(RunningJob {
            job,
            started_at: now,
        });
    }

    /// Hand the processor to the highest-priority ready job, from `now` on.
    fn dispatch_next(&mut self, now: Instant) {
        match self.state.ready.pop() {
            Some(job) => {
                trace!("t={}: dispatching task {}", now, job.task);
                self.start(job, now);
            }
            None => self.state.processor = Processor::Idle,
        }
    }
}

/// Convenience wrapper: build a dispatcher and run it to completion.
pub fn simulate(
    tasks: &[TickTask],
    priority: &Priority,
    releases: &ReleaseSchedule,
    horizon: Duration,
    record_time_chart: bool,
) -> Result<Simulation, ConfigurationError> {
    Ok(Dispatcher::new(tasks, priority, releases, horizon, record_time_chart)?.run())
}
