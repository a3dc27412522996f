//! Enable-strobe pulse generator.

/// Stretches a one-tick trigger into an enable pulse of fixed width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct PulseGenerator {
    active: bool,
    counter: u32,
    width: u32,
}

impl PulseGenerator {
    /// Creates an idle generator producing pulses `width` ticks long.
    #[must_use]
    pub const fn new(width: u32) -> Self {
        Self {
            active: false,
            counter: 0,
            width,
        }
    }

    /// Advances one edge. A trigger (re)starts the pulse.
    pub const fn clock(&mut self, trigger: bool) {
        if trigger {
            self.active = true;
            self.counter = 0;
        } else if self.active {
            self.counter += 1;
            if self.counter >= self.width {
                self.active = false;
                self.counter = 0;
            }
        }
    }

    /// Returns true while the pulse holds enable high.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Ticks elapsed since the current pulse started.
    #[must_use]
    pub const fn counter(&self) -> u32 {
        self.counter
    }

    /// Configured pulse width in ticks.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::PulseGenerator;

    fn high_ticks(width: u32, horizon: u32) -> u32 {
        let mut pulse = PulseGenerator::new(width);
        pulse.clock(true);
        let mut high = u32::from(pulse.is_active());
        for _ in 1..horizon {
            pulse.clock(false);
            high += u32::from(pulse.is_active());
        }
        high
    }

    #[test]
    fn idle_until_triggered() {
        let mut pulse = PulseGenerator::new(3);
        for _ in 0..10 {
            pulse.clock(false);
            assert!(!pulse.is_active());
        }
    }

    #[test]
    fn single_tick_pulse_drops_on_next_edge() {
        let mut pulse = PulseGenerator::new(1);
        pulse.clock(true);
        assert!(pulse.is_active());
        pulse.clock(false);
        assert!(!pulse.is_active());
    }

    #[test]
    fn retrigger_restarts_the_count() {
        let mut pulse = PulseGenerator::new(4);
        pulse.clock(true);
        pulse.clock(false);
        pulse.clock(false);
        assert_eq!(pulse.counter(), 2);
        pulse.clock(true);
        assert_eq!(pulse.counter(), 0);
        assert!(pulse.is_active());
    }

    proptest! {
        #[test]
        fn pulse_is_exactly_width_ticks(width in 1_u32..200) {
            prop_assert_eq!(high_ticks(width, width + 50), width);
        }
    }
}
