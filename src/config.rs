//! Simulation parameters.

use crate::rational::Rational;
use crate::task::{ConfigurationError, Field, TaskIndex};
use crate::time::Duration;

/// The amount of real time represented by a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Granularity {
    tick: Rational,
}

impl Granularity {
    /// One thousandth of a time unit, matching three fractional digits
    /// of input precision.
    pub const MILLI: Granularity = Granularity {
        tick: Rational::unit_fraction(1000),
    };

    /// A granularity of `1 / 10^digits` time units.
    pub fn decimal(digits: u32) -> Option<Granularity> {
        let den = 10u64.checked_pow(digits)?;
        Some(Granularity {
            tick: Rational::new(1, den)?,
        })
    }

    /// A granularity of an arbitrary (positive) length.
    pub fn new(tick: Rational) -> Option<Granularity> {
        if tick.is_zero() {
            None
        } else {
            Some(Granularity { tick })
        }
    }

    pub fn tick_length(&self) -> Rational {
        self.tick
    }

    /// Express `value` as a whole number of ticks. Fails if `value`
    /// is not an integral multiple of the tick length.
    pub fn to_ticks(&self, value: Rational) -> Option<Duration> {
        value
            .checked_div(self.tick)
            .and_then(|ticks| ticks.to_integer())
            .map(Duration::from_ticks)
    }

    /// Like [Granularity::to_ticks], but reports failures against the
    /// given task parameter.
    pub(crate) fn task_ticks(
        &self,
        task: TaskIndex,
        field: Field,
        value: Rational,
    ) -> Result<Duration, ConfigurationError> {
        self.to_ticks(value)
            .ok_or(ConfigurationError::NotRepresentable { task, field, value })
    }

    /// Convert a tick count back into time units.
    pub fn to_time(&self, ticks: Duration) -> Option<Rational> {
        Rational::integer(ticks.ticks()).checked_mul(self.tick)
    }
}

impl Default for Granularity {
    fn default() -> Self {
        Granularity::MILLI
    }
}

/// Everything that parameterizes a single simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Real-time length of one tick.
    pub granularity: Granularity,
    /// Whether the dispatcher keeps a per-tick record of which task ran.
    pub record_time_chart: bool,
    /// Refuse to simulate hyperperiods longer than this many ticks.
    pub max_horizon: Option<Duration>,
}

impl SimulationConfig {
    pub fn with_granularity(self, granularity: Granularity) -> Self {
        SimulationConfig {
            granularity,
            ..self
        }
    }

    pub fn with_time_chart(self, record_time_chart: bool) -> Self {
        SimulationConfig {
            record_time_chart,
            ..self
        }
    }

    pub fn with_max_horizon(self, limit: Duration) -> Self {
        SimulationConfig {
            max_horizon: Some(limit),
            ..self
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            granularity: Granularity::default(),
            record_time_chart: false,
            max_horizon: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_one_thousandth() {
        let g = Granularity::default();
        assert_eq!(g.tick_length(), Rational::new(1, 1000).unwrap());
        assert_eq!(Granularity::decimal(3), Some(g));
        assert_eq!(Granularity::MILLI, g);
    }

    #[test]
    fn time_chart_is_opt_in() {
        let c = SimulationConfig::default();
        assert!(!c.record_time_chart);
        assert!(c.with_time_chart(true).record_time_chart);
    }

    #[test]
    fn tick_conversion() {
        let g = Granularity::default();
        let p = Rational::new(3, 4).unwrap();
        assert_eq!(g.to_ticks(p), Some(Duration::from_ticks(750)));
        assert_eq!(g.to_ticks(Rational::integer(12)), Some(Duration::from_ticks(12_000)));
        assert_eq!(g.to_ticks(Rational::new(1, 3).unwrap()), None);
        assert_eq!(g.to_time(Duration::from_ticks(1500)), Rational::new(3, 2));
    }

    #[test]
    fn coarse_granularity() {
        let g = Granularity::decimal(0).unwrap();
        assert_eq!(g.to_ticks(Rational::integer(5)), Some(Duration::from_ticks(5)));
        assert_eq!(g.to_ticks(Rational::new(1, 2).unwrap()), None);
        assert_eq!(Granularity::new(Rational::ZERO), None);
    }
}
