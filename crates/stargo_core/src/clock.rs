//! Simulation time.
//!
//! [`GameClock`] is the single authoritative tick counter for a session.
//! It only moves forward, one tick per [`GameClock::advance`] call, whether
//! the caller is the real-time server loop or a test stepping by hand.
//!
//! [`Countdown`] is the separate session display timer. It shares nothing
//! with the tick counter and never gates simulation state.

use serde::{Deserialize, Serialize};

/// A discrete unit of simulated time.
pub type Tick = u64;

/// Ticks per real-world second when driven by the server.
pub const TICKS_PER_SECOND: Tick = 1;

/// Ticks per in-game hour. Production rates are expressed per hour.
pub const TICKS_PER_HOUR: Tick = 3600 * TICKS_PER_SECOND;

/// Ticks per in-game day.
pub const TICKS_PER_DAY: Tick = 24 * TICKS_PER_HOUR;

/// Default period of the session countdown, in seconds.
pub const COUNTDOWN_PERIOD: u32 = 30;

/// Monotonic tick counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GameClock {
    tick: Tick,
}

impl GameClock {
    /// Create a clock at tick 0.
    #[must_use]
    pub const fn new() -> Self {
        Self { tick: 0 }
    }

    /// Create a clock resuming from a saved tick.
    #[must_use]
    pub const fn starting_at(tick: Tick) -> Self {
        Self { tick }
    }

    /// Current tick.
    #[must_use]
    pub const fn current_tick(&self) -> Tick {
        self.tick
    }

    /// Advance by exactly one tick and return the new tick.
    pub fn advance(&mut self) -> Tick {
        self.tick += 1;
        self.tick
    }
}

/// Repeating countdown shown to the player.
///
/// Counts down one step per second and wraps back to its period after
/// reaching zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Countdown {
    remaining: u32,
    period: u32,
}

impl Countdown {
    /// Create a countdown with the given period, starting full.
    #[must_use]
    pub const fn new(period: u32) -> Self {
        Self {
            remaining: period,
            period,
        }
    }

    /// Seconds left before the countdown wraps.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Length of one cycle.
    #[must_use]
    pub const fn period(&self) -> u32 {
        self.period
    }

    /// Step the countdown by one second.
    ///
    /// Returns `true` when this step wrapped from zero back to the period.
    pub fn step(&mut self) -> bool {
        if self.remaining > 0 {
            self.remaining -= 1;
            false
        } else {
            self.remaining = self.period;
            true
        }
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(COUNTDOWN_PERIOD)
    }
}
