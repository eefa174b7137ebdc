/*! Hyperperiod computation over exact rational periods.

For reduced periods `aᵢ/bᵢ`, the least common multiple is
`lcm(a₁, …, aₙ) / gcd(b₁, …, bₙ)`. All arithmetic is on integers, so
the result is exact and converts to ticks without rounding.
*/

use crate::config::Granularity;
use crate::rational::{gcd, lcm, Rational};
use crate::task::ConfigurationError;
use crate::time::Duration;

/// The exact hyperperiod of the given periods.
pub fn hyperperiod<I>(periods: I) -> Result<Rational, ConfigurationError>
where
    I: IntoIterator<Item = Rational>,
{
    let mut periods = periods.into_iter().peekable();
    if periods.peek().is_none() {
        return Err(ConfigurationError::NoPeriods);
    }
    let (num, den) = periods.try_fold((1u64, 0u64), |(num, den), p| {
        let num = lcm(num, p.numer()).ok_or(ConfigurationError::Overflow {
            what: "hyperperiod",
        })?;
        Ok((num, gcd(den, p.denom())))
    })?;
    Rational::new(num, den).ok_or(ConfigurationError::Overflow {
        what: "hyperperiod",
    })
}

/// The hyperperiod expressed in ticks of the given granularity.
pub fn hyperperiod_ticks<I>(periods: I, granularity: &Granularity) -> Result<Duration, ConfigurationError>
where
    I: IntoIterator<Item = Rational>,
{
    let h = hyperperiod(periods)?;
    granularity.to_ticks(h).ok_or(ConfigurationError::Overflow {
        what: "hyperperiod in ticks",
    })
}
