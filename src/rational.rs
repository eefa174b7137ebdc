/*! Exact non-negative rational numbers.

Task parameters are given in (decimal) time units, but all scheduling
decisions are made on integral tick counts. To get from the former to
the latter without floating-point drift, every parameter is held as a
reduced fraction and all arithmetic on it is exact.
*/

use std::cmp::Ordering;
use std::fmt;

/// Greatest common divisor (Euclid). `gcd(0, b) == b`.
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// Least common multiple, or `None` on overflow. `lcm(0, _) == 0`.
pub fn lcm(a: u64, b: u64) -> Option<u64> {
    if a == 0 || b == 0 {
        return Some(0);
    }
    (a / gcd(a, b)).checked_mul(b)
}

fn gcd128(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// A non-negative fraction `num / den`, always in lowest terms.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    num: u64,
    den: u64,
}

impl Rational {
    pub const ZERO: Rational = Rational { num: 0, den: 1 };
    pub const ONE: Rational = Rational { num: 1, den: 1 };

    /// Construct the reduced fraction `num / den`. Returns `None` if
    /// `den` is zero.
    pub fn new(num: u64, den: u64) -> Option<Rational> {
        if den == 0 {
            return None;
        }
        let g = gcd(num, den).max(1);
        Some(Rational {
            num: num / g,
            den: den / g,
        })
    }

    /// The integer `n` as a fraction.
    pub const fn integer(n: u64) -> Rational {
        Rational { num: n, den: 1 }
    }

    /// The fraction `1 / n`; `n` must be positive.
    pub const fn unit_fraction(n: u64) -> Rational {
        assert!(n > 0);
        Rational { num: 1, den: n }
    }

    /// Round `value` to the nearest multiple of `1 / max_den` and
    /// reduce. This is how decimal input with a bounded number of
    /// fractional digits becomes an exact value: `0.75` with
    /// `max_den = 1000` yields `3/4`.
    ///
    /// Returns `None` for negative, non-finite, or out-of-range values.
    pub fn approximate(value: f64, max_den: u64) -> Option<Rational> {
        if !value.is_finite() || value < 0.0 || max_den == 0 {
            return None;
        }
        let scaled = (value * max_den as f64).round();
        if scaled >= u64::MAX as f64 {
            return None;
        }
        Rational::new(scaled as u64, max_den)
    }

    pub fn numer(&self) -> u64 {
        self.num
    }

    pub fn denom(&self) -> u64 {
        self.den
    }

    pub fn is_zero(&self) -> bool {
        self.num == 0
    }

    /// Exact sum, or `None` if the reduced result does not fit.
    pub fn checked_add(self, rhs: Rational) -> Option<Rational> {
        let (a, b) = (self.num as u128, self.den as u128);
        let (c, d) = (rhs.num as u128, rhs.den as u128);
        let den = b * d;
        let num = a.checked_mul(d)?.checked_add(c * b)?;
        Self::reduce128(num, den)
    }

    /// Exact product, or `None` if the reduced result does not fit.
    pub fn checked_mul(self, rhs: Rational) -> Option<Rational> {
        let num = self.num as u128 * rhs.num as u128;
        let den = self.den as u128 * rhs.den as u128;
        Self::reduce128(num, den)
    }

    /// Exact quotient. `None` on division by zero or overflow.
    pub fn checked_div(self, rhs: Rational) -> Option<Rational> {
        if rhs.is_zero() {
            return None;
        }
        let num = self.num as u128 * rhs.den as u128;
        let den = self.den as u128 * rhs.num as u128;
        Self::reduce128(num, den)
    }

    /// The value as an integer, if it is one.
    pub fn to_integer(&self) -> Option<u64> {
        if self.den == 1 {
            Some(self.num)
        } else {
            None
        }
    }

    /// Lossy conversion for display and logging only.
    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    fn reduce128(num: u128, den: u128) -> Option<Rational> {
        let g = gcd128(num, den).max(1);
        Some(Rational {
            num: u64::try_from(num / g).ok()?,
            den: u64::try_from(den / g).ok()?,
        })
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.num as u128 * other.den as u128;
        let rhs = other.num as u128 * self.den as u128;
        lhs.cmp(&rhs)
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<u64> for Rational {
    fn from(n: u64) -> Self {
        Rational::integer(n)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
