use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HoldState {
    Idle,
    Holding(Instant),
    /// Fired during the current hold; waits for the chord to be released.
    Fired,
}

/// Hold-triggered chord: fires once after the chord is held long enough.
#[derive(Debug)]
pub(crate) struct HoldCombo {
    threshold: Duration,
    state: HoldState,
}

impl HoldCombo {
    pub(crate) fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            state: HoldState::Idle,
        }
    }

    /// Feed the chord state of one poll. Returns `true` when the hold fires.
    pub(crate) fn update(&mut self, held: bool, now: Instant) -> bool {
        if !held {
            self.state = HoldState::Idle;
            return false;
        }
        let since = match self.state {
            HoldState::Fired => return false,
            HoldState::Idle => {
                self.state = HoldState::Holding(now);
                now
            }
            HoldState::Holding(since) => since,
        };
        if now.saturating_duration_since(since) >= self.threshold {
            self.state = HoldState::Fired;
            return true;
        }
        false
    }

    pub(crate) fn reset(&mut self) {
        self.state = HoldState::Idle;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TapState {
    Idle,
    Holding { since: Instant },
    /// The tap was judged when the cancel button joined the chord; waits for
    /// the bumpers to be released.
    Spent,
}

/// Release-triggered chord: fires when a short hold of the chord ends.
///
/// The hold ends when the chord is released or the cancel button (Start)
/// joins it, whichever comes first. Either way it is judged exactly once.
#[derive(Debug)]
pub(crate) struct TapCombo {
    threshold: Duration,
    state: TapState,
}

impl TapCombo {
    pub(crate) fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            state: TapState::Idle,
        }
    }

    /// Feed the chord and cancel-button state of one poll. Returns `true`
    /// when a quick tap completes.
    pub(crate) fn update(&mut self, chord: bool, cancel: bool, now: Instant) -> bool {
        match self.state {
            TapState::Idle => {
                if chord && !cancel {
                    self.state = TapState::Holding { since: now };
                }
                false
            }
            TapState::Holding { since } => {
                if chord && !cancel {
                    return false;
                }
                // Leaving `Holding` is the only way to fire, so one
                // press/release cycle fires at most once.
                self.state = if chord {
                    TapState::Spent
                } else {
                    TapState::Idle
                };
                now.saturating_duration_since(since) < self.threshold
            }
            TapState::Spent => {
                if !chord {
                    self.state = TapState::Idle;
                }
                false
            }
        }
    }

    pub(crate) fn reset(&mut self) {
        self.state = TapState::Idle;
    }
}
