/*! The utilization screen.

A task set whose total utilization `U = Σ Cᵢ/Tᵢ` exceeds one cannot be
scheduled on a single processor by any policy, so it is rejected
without simulation. Passing the screen is necessary but not sufficient
for RM schedulability: the sufficient Liu & Layland bound
`n(2^(1/n) - 1)` is computed for reference only and never gates the
verdict.
*/

use log::debug;

use crate::rational::Rational;
use crate::task::{ConfigurationError, Field, TickTask};

/// Outcome of the utilization screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feasibility {
    /// `U ≤ 1`: the task set proceeds to simulation.
    Candidate { utilization: Rational },
    /// `U > 1`: no simulation is run.
    Infeasible { utilization: Rational },
}

impl Feasibility {
    pub fn utilization(&self) -> Rational {
        match self {
            Feasibility::Candidate { utilization } | Feasibility::Infeasible { utilization } => {
                *utilization
            }
        }
    }

    pub fn utilization_f64(&self) -> f64 {
        self.utilization().to_f64()
    }

    pub fn is_candidate(&self) -> bool {
        matches!(self, Feasibility::Candidate { .. })
    }
}

/// Exact total utilization of the given tasks.
pub fn utilization(tasks: &[TickTask]) -> Result<Rational, ConfigurationError> {
    tasks.iter().try_fold(Rational::ZERO, |total, task| {
        if task.period.is_zero() {
            return Err(ConfigurationError::NonPositive {
                task: task.index,
                field: Field::Period,
            });
        }
        let share = Rational::new(task.execution.ticks(), task.period.ticks())
            .ok_or(ConfigurationError::Overflow { what: "utilization" })?;
        total
            .checked_add(share)
            .ok_or(ConfigurationError::Overflow { what: "utilization" })
    })
}

/// Apply the `U ≤ 1` screen.
pub fn check(tasks: &[TickTask]) -> Result<Feasibility, ConfigurationError> {
    let utilization = utilization(tasks)?;
    debug!(
        "utilization of {} tasks: {} ≈ {:.4} (Liu & Layland bound {:.4})",
        tasks.len(),
        utilization,
        utilization.to_f64(),
        liu_layland_bound(tasks.len())
    );
    if utilization <= Rational::ONE {
        Ok(Feasibility::Candidate { utilization })
    } else {
        Ok(Feasibility::Infeasible { utilization })
    }
}

/// The Liu & Layland utilization bound `n(2^(1/n) - 1)` for `n` tasks;
/// zero for an empty task set.
pub fn liu_layland_bound(n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    n * (2f64.powf(1.0 / n) - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Granularity;
    use crate::task::TickTask;
    use crate::tests::{d, i, task_set};

    use assert_approx_eq::assert_approx_eq;

    fn ticks(params: &[(u64, u64, u64)]) -> Vec<TickTask> {
        task_set(params).to_ticks(&Granularity::default()).unwrap()
    }

    #[test]
    fn reference_example_is_candidate() {
        let f = check(&ticks(&[(1, 3, 3), (2, 4, 5)])).unwrap();
        assert!(f.is_candidate());
        assert_eq!(f.utilization(), Rational::new(5, 6).unwrap());
        assert_approx_eq!(f.utilization_f64(), 0.833, 0.001);
    }

    #[test]
    fn full_utilization_is_candidate() {
        let f = check(&ticks(&[(5, 5, 5)])).unwrap();
        assert_eq!(f, Feasibility::Candidate { utilization: Rational::ONE });

        // exact arithmetic: 1/3 + 2/3 is exactly one
        let f = check(&ticks(&[(1, 3, 3), (2, 3, 3)])).unwrap();
        assert!(f.is_candidate());
    }

    #[test]
    fn overload_is_infeasible() {
        let f = check(&ticks(&[(4, 5, 5), (3, 5, 5)])).unwrap();
        assert_eq!(
            f,
            Feasibility::Infeasible {
                utilization: Rational::new(7, 5).unwrap()
            }
        );
        assert_approx_eq!(f.utilization_f64(), 1.4, 1e-9);
    }

    #[test]
    fn zero_period_is_reported_not_divided() {
        let tasks = vec![TickTask {
            index: i(0),
            execution: d(1),
            period: d(0),
            deadline: d(1),
        }];
        assert_eq!(
            utilization(&tasks),
            Err(ConfigurationError::NonPositive {
                task: i(0),
                field: Field::Period
            })
        );
    }

    #[test]
    fn empty_utilization_is_zero() {
        assert_eq!(utilization(&[]), Ok(Rational::ZERO));
    }

    #[test]
    fn liu_layland() {
        assert_eq!(liu_layland_bound(0), 0.0);
        assert_approx_eq!(liu_layland_bound(1), 1.0, 1e-12);
        assert_approx_eq!(liu_layland_bound(2), 0.8284, 1e-4);
        assert_approx_eq!(liu_layland_bound(1000), 2f64.ln(), 1e-3);
    }
}
