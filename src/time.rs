/*! The discrete time model used by the simulator.

All scheduling decisions are made on integral *ticks*. A tick is the
smallest time quantum the simulator resolves; how much real time it
represents is configured via [Granularity][crate::config::Granularity].

Two newtypes keep points in time and interval lengths apart:
[Instant] is the index of a tick, [Duration] is a number of ticks.
*/

use derive_more::{Add, AddAssign, Display, From, Into, Sub, SubAssign, Sum};

/// A number of ticks, i.e., the length of an interval or an amount of
/// processor service.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Add,
    Sub,
    AddAssign,
    SubAssign,
    Sum,
    From,
    Into,
    Display,
)]
pub struct Duration(u64);

impl Duration {
    pub const fn from_ticks(ticks: u64) -> Duration {
        Duration(ticks)
    }

    pub const fn zero() -> Duration {
        Duration(0)
    }

    /// A single tick.
    pub const fn epsilon() -> Duration {
        Duration(1)
    }

    pub const fn ticks(self) -> u64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_non_zero(self) -> bool {
        self.0 > 0
    }
}

/// The index of a tick, counted from time zero.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, From, Into, Display,
)]
pub struct Instant(u64);

impl Instant {
    pub const fn from_ticks(tick: u64) -> Instant {
        Instant(tick)
    }

    pub const fn zero() -> Instant {
        Instant(0)
    }

    pub const fn tick(self) -> u64 {
        self.0
    }

    /// The instant `delta` ticks after time zero.
    pub const fn from_time_zero(delta: Duration) -> Instant {
        Instant(delta.0)
    }

    pub const fn since_time_zero(self) -> Duration {
        Duration(self.0)
    }

    /// The tick right after this one.
    pub const fn next(self) -> Instant {
        Instant(self.0 + 1)
    }

    /// Iterate over all ticks in the closed range `[self, last]`.
    pub fn through(self, last: Instant) -> impl Iterator<Item = Instant> {
        (self.0..=last.0).map(Instant)
    }
}

impl std::ops::Add<Duration> for Instant {
    type Output = Instant;

    fn add(self, delta: Duration) -> Instant {
        Instant(self.0 + delta.0)
    }
}

impl std::ops::Sub<Instant> for Instant {
    type Output = Duration;

    fn sub(self, earlier: Instant) -> Duration {
        Duration(self.0 - earlier.0)
    }
}
