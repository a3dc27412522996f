//! Named HD44780 initialization delays and nanosecond-to-tick conversion.

/// Wait after supply rise before the controller accepts commands (50 ms).
pub const POWER_ON_TIME_NS: u64 = 50_000_000;

/// Execution time allowed for function-set and display-control (50 us).
pub const FUNCTION_SET_TIME_NS: u64 = 50_000;

/// Execution time allowed for clear-display (2 ms).
pub const DISPLAY_CLEAR_TIME_NS: u64 = 2_000_000;

/// Default enable strobe high time (500 ns).
pub const ENABLE_PULSE_WIDTH_NS: u64 = 500;

const NANOS_PER_SECOND: u128 = 1_000_000_000;

/// Converts a duration to a whole number of clock ticks, rounding up.
///
/// Returns `None` when the result does not fit a `u32` tick counter.
#[must_use]
pub fn ns_to_ticks(clock_hz: u64, nanos: u64) -> Option<u32> {
    let product = u128::from(clock_hz) * u128::from(nanos);
    let ticks = product.div_ceil(NANOS_PER_SECOND);
    u32::try_from(ticks).ok()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{ns_to_ticks, ENABLE_PULSE_WIDTH_NS, FUNCTION_SET_TIME_NS, POWER_ON_TIME_NS};

    #[rstest]
    #[case(100_000_000, POWER_ON_TIME_NS, 5_000_000)]
    #[case(100_000_000, FUNCTION_SET_TIME_NS, 5_000)]
    #[case(100_000_000, ENABLE_PULSE_WIDTH_NS, 50)]
    #[case(1_000_000, ENABLE_PULSE_WIDTH_NS, 1)]
    #[case(50_000_000, 30, 2)]
    #[case(1, 0, 0)]
    fn converts_and_rounds_up(#[case] clock_hz: u64, #[case] nanos: u64, #[case] expected: u32) {
        assert_eq!(ns_to_ticks(clock_hz, nanos), Some(expected));
    }

    #[test]
    fn overflow_is_reported() {
        assert_eq!(ns_to_ticks(u64::MAX, POWER_ON_TIME_NS), None);
    }
}
