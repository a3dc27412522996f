//! Instantiation-time configuration for both simulated components.

use crate::error::{ConfigError, TimingPhase};
use crate::lcd::timing::{
    ns_to_ticks, DISPLAY_CLEAR_TIME_NS, ENABLE_PULSE_WIDTH_NS, FUNCTION_SET_TIME_NS,
    POWER_ON_TIME_NS,
};

/// Default number of registers in the AXI register file.
pub const DEFAULT_REGISTER_COUNT: usize = 4;

/// Largest register count accepted by [`AxiConfig::validate`].
pub const MAX_REGISTER_COUNT: usize = 1 << 20;

/// Default AXI address bus width in bits.
pub const DEFAULT_ADDR_WIDTH_BITS: u8 = 32;

/// Default LCD controller clock (100 MHz).
pub const DEFAULT_CLOCK_HZ: u64 = 100_000_000;

/// AXI4-Lite data bus width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum DataWidth {
    /// 32-bit data bus, four strobe lanes.
    #[default]
    Bits32,
    /// 64-bit data bus, eight strobe lanes.
    Bits64,
}

impl DataWidth {
    /// Returns the bus width in bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            Self::Bits32 => 32,
            Self::Bits64 => 64,
        }
    }

    /// Returns the number of byte lanes (and strobe bits).
    #[must_use]
    pub const fn byte_lanes(self) -> u32 {
        self.bits() / 8
    }

    /// Returns the number of low address bits covering one data word.
    #[must_use]
    pub const fn byte_offset_bits(self) -> u32 {
        self.byte_lanes().trailing_zeros()
    }

    /// Returns the mask of bits a register of this width can hold.
    #[must_use]
    pub const fn value_mask(self) -> u64 {
        match self {
            Self::Bits32 => 0xFFFF_FFFF,
            Self::Bits64 => u64::MAX,
        }
    }

    /// Returns the strobe mask with every lane enabled.
    #[must_use]
    pub const fn full_strobe(self) -> u8 {
        match self {
            Self::Bits32 => 0x0F,
            Self::Bits64 => 0xFF,
        }
    }

    /// Parses a width given in bits.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            32 => Some(Self::Bits32),
            64 => Some(Self::Bits64),
            _ => None,
        }
    }
}

/// Geometry of the AXI4-Lite register file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AxiConfig {
    /// Data bus width; also the width of every register.
    pub data_width: DataWidth,
    /// Address bus width in bits; higher address bits are ignored.
    pub addr_width_bits: u8,
    /// Number of registers behind the slave.
    pub register_count: usize,
}

impl Default for AxiConfig {
    fn default() -> Self {
        Self {
            data_width: DataWidth::Bits32,
            addr_width_bits: DEFAULT_ADDR_WIDTH_BITS,
            register_count: DEFAULT_REGISTER_COUNT,
        }
    }
}

impl AxiConfig {
    /// Checks the configuration ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyRegisterFile`] for zero registers,
    /// [`ConfigError::RegisterFileTooLarge`] past [`MAX_REGISTER_COUNT`],
    /// [`ConfigError::AddressWidth`] for a bus width outside `1..=64`, and
    /// [`ConfigError::AddressSpaceTooSmall`] when the last register's byte
    /// address does not fit on the address bus.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.register_count == 0 {
            return Err(ConfigError::EmptyRegisterFile);
        }
        if self.register_count > MAX_REGISTER_COUNT {
            return Err(ConfigError::RegisterFileTooLarge {
                register_count: self.register_count,
                max: MAX_REGISTER_COUNT,
            });
        }
        if self.addr_width_bits == 0 || self.addr_width_bits > 64 {
            return Err(ConfigError::AddressWidth(self.addr_width_bits));
        }

        let offset = self.data_width.byte_offset_bits();
        let available = u32::from(self.addr_width_bits).saturating_sub(offset);
        let last_index = (self.register_count - 1) as u64;
        let needed = u64::BITS - last_index.leading_zeros();
        if needed > available {
            return Err(ConfigError::AddressSpaceTooSmall {
                addr_width_bits: self.addr_width_bits,
                register_count: self.register_count,
            });
        }
        Ok(())
    }

    /// Returns the mask applied to incoming addresses.
    #[must_use]
    pub const fn address_mask(&self) -> u64 {
        if self.addr_width_bits >= 64 {
            u64::MAX
        } else {
            (1_u64 << self.addr_width_bits) - 1
        }
    }
}

/// Number of display lines selected in the function-set command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum DisplayLines {
    /// Single-line display.
    One,
    /// Two-line display.
    #[default]
    Two,
}

impl DisplayLines {
    /// Parses a line count; only 1 and 2 are supported by the controller.
    #[must_use]
    pub const fn from_count(count: u8) -> Option<Self> {
        match count {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            _ => None,
        }
    }
}

/// Character font selected in the function-set command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum FontSize {
    /// 5x8 dot characters.
    #[default]
    Dots5x8,
    /// 5x11 dot characters.
    Dots5x11,
}

impl FontSize {
    /// Maps a font height in dots to a font; 11 selects 5x11, anything else 5x8.
    #[must_use]
    pub const fn from_height(height: u8) -> Self {
        if height == 11 {
            Self::Dots5x11
        } else {
            Self::Dots5x8
        }
    }
}

/// Width of the LCD parallel data bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum LcdBusWidth {
    /// Four data lines (DB7..DB4).
    Four,
    /// Eight data lines.
    #[default]
    Eight,
}

impl LcdBusWidth {
    /// Parses a bus width given in lines.
    #[must_use]
    pub const fn from_lines(lines: u8) -> Option<Self> {
        match lines {
            4 => Some(Self::Four),
            8 => Some(Self::Eight),
            _ => None,
        }
    }

    /// Returns the mask of valid data-bus bits.
    #[must_use]
    pub const fn data_mask(self) -> u8 {
        match self {
            Self::Four => 0x0F,
            Self::Eight => 0xFF,
        }
    }
}

/// Display-control command flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DisplayControl {
    /// Display on.
    pub display_on: bool,
    /// Underline cursor visible.
    pub cursor_on: bool,
    /// Cursor position blinks.
    pub blink_on: bool,
}

impl Default for DisplayControl {
    fn default() -> Self {
        Self {
            display_on: true,
            cursor_on: false,
            blink_on: false,
        }
    }
}

/// Entry-mode command flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EntryMode {
    /// Address counter increments after each data write.
    pub increment: bool,
    /// Display shifts with each data write.
    pub shift: bool,
}

impl Default for EntryMode {
    fn default() -> Self {
        Self {
            increment: true,
            shift: false,
        }
    }
}

/// Nanosecond durations of the initialization phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LcdTiming {
    /// Wait after power-up before the first command.
    pub power_on_ns: u64,
    /// Spacing of the function-set and display-control commands.
    pub function_set_ns: u64,
    /// Execution time of the clear-display command.
    pub display_clear_ns: u64,
    /// Enable strobe high time.
    pub enable_pulse_ns: u64,
}

impl Default for LcdTiming {
    fn default() -> Self {
        Self {
            power_on_ns: POWER_ON_TIME_NS,
            function_set_ns: FUNCTION_SET_TIME_NS,
            display_clear_ns: DISPLAY_CLEAR_TIME_NS,
            enable_pulse_ns: ENABLE_PULSE_WIDTH_NS,
        }
    }
}

/// Phase durations converted to clock ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct PhaseTicks {
    /// POWER_UP residency.
    pub power_on: u32,
    /// FUNCTION_SET half-period and DISPLAY_CONTROL residency.
    pub function_set: u32,
    /// DISPLAY_CLEAR residency.
    pub display_clear: u32,
    /// Enable pulse width and ENTRY_MODE_SET residency.
    pub pulse_width: u32,
}

impl PhaseTicks {
    /// Returns the number of edges from power-up until RUN_MODE is entered.
    #[must_use]
    #[allow(clippy::cast_lossless)]
    pub const fn edges_to_run_mode(&self) -> u64 {
        self.power_on as u64
            + 2 * self.function_set as u64
            + self.function_set as u64
            + self.display_clear as u64
            + self.pulse_width as u64
    }
}

/// Configuration of the LCD initialization controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LcdConfig {
    /// Controller clock frequency in hertz.
    pub clock_hz: u64,
    /// Display line count.
    pub lines: DisplayLines,
    /// Character font.
    pub font: FontSize,
    /// Data bus width.
    pub bus_width: LcdBusWidth,
    /// Display-control flags sent during initialization.
    pub display: DisplayControl,
    /// Entry-mode flags sent during initialization.
    pub entry_mode: EntryMode,
    /// Phase durations.
    pub timing: LcdTiming,
}

impl Default for LcdConfig {
    fn default() -> Self {
        Self {
            clock_hz: DEFAULT_CLOCK_HZ,
            lines: DisplayLines::Two,
            font: FontSize::Dots5x8,
            bus_width: LcdBusWidth::Eight,
            display: DisplayControl::default(),
            entry_mode: EntryMode::default(),
            timing: LcdTiming::default(),
        }
    }
}

impl LcdConfig {
    /// Converts the configured durations to ticks and checks their ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroClock`], [`ConfigError::TickOverflow`] or
    /// [`ConfigError::ZeroDuration`] for unusable durations, and
    /// [`ConfigError::PulseTooWide`] when consecutive enable pulses would
    /// merge.
    pub fn phase_ticks(&self) -> Result<PhaseTicks, ConfigError> {
        if self.clock_hz == 0 {
            return Err(ConfigError::ZeroClock);
        }

        let ticks = PhaseTicks {
            power_on: self.ticks_for(TimingPhase::PowerOn, self.timing.power_on_ns)?,
            function_set: self.ticks_for(TimingPhase::FunctionSet, self.timing.function_set_ns)?,
            display_clear: self
                .ticks_for(TimingPhase::DisplayClear, self.timing.display_clear_ns)?,
            pulse_width: self.ticks_for(TimingPhase::EnablePulse, self.timing.enable_pulse_ns)?,
        };

        for (phase, phase_ticks) in [
            (TimingPhase::FunctionSet, ticks.function_set),
            (TimingPhase::DisplayClear, ticks.display_clear),
        ] {
            if ticks.pulse_width >= phase_ticks {
                return Err(ConfigError::PulseTooWide {
                    phase,
                    pulse_ticks: ticks.pulse_width,
                    phase_ticks,
                });
            }
        }

        Ok(ticks)
    }

    fn ticks_for(&self, phase: TimingPhase, nanos: u64) -> Result<u32, ConfigError> {
        let ticks = ns_to_ticks(self.clock_hz, nanos)
            .ok_or(ConfigError::TickOverflow { phase, nanos })?;
        if ticks == 0 {
            return Err(ConfigError::ZeroDuration(phase));
        }
        Ok(ticks)
    }
}
