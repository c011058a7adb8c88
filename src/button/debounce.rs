/// Two-phase hysteresis filter for one raw level.
///
/// The timer snaps to the window `W` on the first sample that disagrees with
/// the current bound, then ramps by the tick interval toward `2W` (active) or
/// `0` (inactive). A level is confirmed only once the timer sits on that
/// bound, so any flicker during a ramp restarts it from `W`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Debouncer {
    timer: u32,
    level: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FilterOutcome {
    /// Still ramping, nothing confirmed this tick.
    Settling,
    /// First confirmed-active tick after a confirmed release.
    Pressed,
    /// Confirmed active and already latched.
    Held,
    /// Confirmed inactive.
    Idle,
}

impl Debouncer {
    pub(crate) fn step(&mut self, active: bool, dt: u32, window: u32) -> FilterOutcome {
        let ceiling = window.saturating_mul(2);
        if active {
            if self.timer < window {
                self.timer = window;
                FilterOutcome::Settling
            } else if self.timer < ceiling {
                self.timer = self.timer.saturating_add(dt).min(ceiling);
                FilterOutcome::Settling
            } else if self.level {
                FilterOutcome::Held
            } else {
                self.level = true;
                FilterOutcome::Pressed
            }
        } else if self.timer > window {
            self.timer = window;
            FilterOutcome::Settling
        } else if self.timer != 0 {
            self.timer = self.timer.saturating_sub(dt);
            FilterOutcome::Settling
        } else {
            self.level = false;
            FilterOutcome::Idle
        }
    }

    pub(crate) fn timer(&self) -> u32 {
        self.timer
    }

    /// Last confirmed level.
    pub(crate) fn level(&self) -> bool {
        self.level
    }
}
