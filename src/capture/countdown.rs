//! Per-answer countdown timer.
//!
//! The candidate gets a fixed number of seconds per answer (150 by default).
//! The countdown is advanced by discrete [`tick`](Countdown::tick) events —
//! one per second, delivered through the same queue as every other session
//! event — and reports expiry so the controller can stop capture
//! automatically.

// ---------------------------------------------------------------------------
// CountdownStatus
// ---------------------------------------------------------------------------

/// Result of advancing the countdown by one second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStatus {
    /// Still counting; `remaining` seconds left.
    Running { remaining: u32 },
    /// The countdown just reached zero — capture must stop now.
    Expired,
    /// The countdown is not armed; the tick was ignored.
    Idle,
}

// ---------------------------------------------------------------------------
// Countdown
// ---------------------------------------------------------------------------

/// Fixed-length countdown armed once per capture.
///
/// # Example
///
/// ```rust
/// use interview_coach::capture::{Countdown, CountdownStatus};
///
/// let mut timer = Countdown::new(3);
/// timer.arm();
/// assert_eq!(timer.tick(), CountdownStatus::Running { remaining: 2 });
/// assert_eq!(timer.tick(), CountdownStatus::Running { remaining: 1 });
/// assert_eq!(timer.tick(), CountdownStatus::Expired);
/// assert_eq!(timer.tick(), CountdownStatus::Idle);
/// ```
#[derive(Debug)]
pub struct Countdown {
    initial: u32,
    remaining: u32,
    running: bool,
}

impl Countdown {
    /// Create an unarmed countdown of `initial` seconds.
    pub fn new(initial: u32) -> Self {
        Self {
            initial,
            remaining: initial,
            running: false,
        }
    }

    /// Start (or restart) the countdown from its initial value.
    pub fn arm(&mut self) {
        self.remaining = self.initial;
        self.running = true;
    }

    /// Stop without resetting the remaining value.
    pub fn halt(&mut self) {
        self.running = false;
    }

    /// Re-arm to the initial value without starting.
    pub fn reset(&mut self) {
        self.remaining = self.initial;
        self.running = false;
    }

    /// Advance by one second.
    ///
    /// Ticks received while unarmed are ignored ([`CountdownStatus::Idle`]).
    /// The tick that reaches zero returns [`CountdownStatus::Expired`] and
    /// halts the countdown, so expiry is reported exactly once.
    pub fn tick(&mut self) -> CountdownStatus {
        if !self.running {
            return CountdownStatus::Idle;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.running = false;
            CountdownStatus::Expired
        } else {
            CountdownStatus::Running {
                remaining: self.remaining,
            }
        }
    }

    /// Seconds left on the clock.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Returns `true` while the countdown is armed and ticking.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// `MM:SS` display label for the remaining time.
    pub fn label(&self) -> String {
        format!("{:02}:{:02}", self.remaining / 60, self.remaining % 60)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
