/*! End-to-end schedulability analysis of a task set.

[analyze] runs the full pipeline: validation, the utilization screen,
hyperperiod and priority computation, release precomputation, and the
tick-by-tick simulation. Structural problems with the input are
reported as [ConfigurationError]s before any computation happens. An
empty or overloaded task set is not an error, just a negative verdict.
*/

use log::{debug, info};

use crate::config::SimulationConfig;
use crate::dispatch::{self, Simulation};
use crate::feasibility::{self, Feasibility};
use crate::hyperperiod::hyperperiod;
use crate::priority::Priority;
use crate::rational::Rational;
use crate::release::ReleaseSchedule;
use crate::task::{ConfigurationError, TaskSet};

/// Why a task set was declared not schedulable without simulating it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    EmptyTaskSet,
    Infeasible { utilization: Rational },
}

/// The result of a successful analysis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Analysis {
    Schedulable {
        utilization: Rational,
        /// The simulated horizon in time units.
        hyperperiod: Rational,
        simulation: Simulation,
    },
    NotSchedulable(Rejection),
}

/// The externally visible result: a verdict plus, for schedulable task
/// sets, the number of preemptions of each task in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub schedulable: bool,
    pub preemptions: Option<Vec<u64>>,
}

impl Outcome {
    pub fn not_schedulable() -> Outcome {
        Outcome {
            schedulable: false,
            preemptions: None,
        }
    }
}

impl Analysis {
    pub fn is_schedulable(&self) -> bool {
        matches!(self, Analysis::Schedulable { .. })
    }

    pub fn simulation(&self) -> Option<&Simulation> {
        match self {
            Analysis::Schedulable { simulation, .. } => Some(simulation),
            Analysis::NotSchedulable(_) => None,
        }
    }

    pub fn outcome(&self) -> Outcome {
        match self {
            Analysis::Schedulable { simulation, .. } => Outcome {
                schedulable: true,
                preemptions: Some(simulation.preemptions.clone()),
            },
            Analysis::NotSchedulable(_) => Outcome::not_schedulable(),
        }
    }
}

impl From<Analysis> for Outcome {
    fn from(a: Analysis) -> Outcome {
        match a {
            Analysis::Schedulable { simulation, .. } => Outcome {
                schedulable: true,
                preemptions: Some(simulation.preemptions),
            },
            Analysis::NotSchedulable(_) => Outcome::not_schedulable(),
        }
    }
}

/// Analyze one task set under preemptive rate-monotonic scheduling.
pub fn analyze(tasks: &TaskSet, config: &SimulationConfig) -> Result<Analysis, ConfigurationError> {
    if tasks.is_empty() {
        info!("empty task set: not schedulable");
        return Ok(Analysis::NotSchedulable(Rejection::EmptyTaskSet));
    }

    let granularity = &config.granularity;
    let tick_tasks = tasks.to_ticks(granularity)?;

    let utilization = match feasibility::check(&tick_tasks)? {
        Feasibility::Candidate { utilization } => utilization,
        Feasibility::Infeasible { utilization } => {
            info!("utilization {} exceeds one: not schedulable", utilization);
            return Ok(Analysis::NotSchedulable(Rejection::Infeasible { utilization }));
        }
    };

    let h = hyperperiod(tasks.periods())?;
    let horizon = granularity.to_ticks(h).ok_or(ConfigurationError::Overflow {
        what: "hyperperiod in ticks",
    })?;
    if let Some(limit) = config.max_horizon {
        if horizon > limit {
            return Err(ConfigurationError::HorizonTooLong { horizon, limit });
        }
    }
    debug!("hyperperiod {} = {} ticks", h, horizon);

    let priority = Priority::rate_monotonic(tasks);
    let releases = ReleaseSchedule::build(&tick_tasks, &priority, horizon);
    debug!(
        "{} jobs released at {} distinct ticks after time zero",
        releases.job_count(),
        releases.len()
    );

    let simulation = dispatch::simulate(
        &tick_tasks,
        &priority,
        &releases,
        horizon,
        config.record_time_chart,
    )?;
    info!("schedulable; preemptions per task: {:?}", simulation.preemptions);

    Ok(Analysis::Schedulable {
        utilization,
        hyperperiod: h,
        simulation,
    })
}

/// Analyze several independent task sets in parallel. Results are
/// returned in input order; each run has its own simulation state.
pub fn analyze_all(
    task_sets: &[TaskSet],
    config: &SimulationConfig,
) -> Vec<Result<Analysis, ConfigurationError>> {
    std::thread::scope(|s| {
        let handles: Vec<_> = task_sets
            .iter()
            .map(|ts| s.spawn(move || analyze(ts, config)))
            .collect();
        handles
            .into_iter()
            .map(|h| match h.join() {
                Ok(result) => result,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    })
}
