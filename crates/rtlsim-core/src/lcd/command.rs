//! HD44780 instruction words issued during initialization.

use crate::config::{
    DisplayControl, DisplayLines, EntryMode, FontSize, LcdBusWidth, LcdConfig,
};

/// Clear-display instruction.
pub const CLEAR_DISPLAY: u8 = 0x01;

/// Function-set base value with DL, N and F cleared.
pub const FUNCTION_SET_BASE: u8 = 0x20;
/// Function-set data-length bit (8-bit interface).
pub const FUNCTION_SET_DL: u8 = 1 << 4;
/// Function-set line-count bit (two lines).
pub const FUNCTION_SET_N: u8 = 1 << 3;
/// Function-set font bit (5x11 dots).
pub const FUNCTION_SET_F: u8 = 1 << 2;

/// Display-control base value.
pub const DISPLAY_CONTROL_BASE: u8 = 0x08;
/// Entry-mode base value.
pub const ENTRY_MODE_BASE: u8 = 0x04;

/// Encodes the function-set instruction.
#[must_use]
pub const fn function_set(bus_width: LcdBusWidth, lines: DisplayLines, font: FontSize) -> u8 {
    let mut word = FUNCTION_SET_BASE;
    if matches!(bus_width, LcdBusWidth::Eight) {
        word |= FUNCTION_SET_DL;
    }
    if matches!(lines, DisplayLines::Two) {
        word |= FUNCTION_SET_N;
    }
    if matches!(font, FontSize::Dots5x11) {
        word |= FUNCTION_SET_F;
    }
    word
}

/// Encodes the display on/off control instruction.
#[must_use]
pub const fn display_control(flags: DisplayControl) -> u8 {
    DISPLAY_CONTROL_BASE
        | (flags.display_on as u8) << 2
        | (flags.cursor_on as u8) << 1
        | flags.blink_on as u8
}

/// Encodes the entry-mode-set instruction.
#[must_use]
pub const fn entry_mode(flags: EntryMode) -> u8 {
    ENTRY_MODE_BASE | (flags.increment as u8) << 1 | flags.shift as u8
}

/// The four instruction words of the initialization sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct InitCommands {
    /// Sent twice in FUNCTION_SET.
    pub function_set: u8,
    /// Sent in DISPLAY_CONTROL.
    pub display_control: u8,
    /// Sent in DISPLAY_CLEAR.
    pub clear: u8,
    /// Sent in ENTRY_MODE_SET.
    pub entry_mode: u8,
}

impl InitCommands {
    /// Derives the instruction words from a configuration.
    #[must_use]
    pub const fn for_config(config: &LcdConfig) -> Self {
        Self {
            function_set: function_set(config.bus_width, config.lines, config.font),
            display_control: display_control(config.display),
            clear: CLEAR_DISPLAY,
            entry_mode: entry_mode(config.entry_mode),
        }
    }
}

/// Maps an instruction word onto the data lines of the configured bus.
///
/// A 4-bit interface only carries DB7..DB4, so the high nibble is driven.
#[must_use]
pub const fn bus_value(bus_width: LcdBusWidth, word: u8) -> u8 {
    match bus_width {
        LcdBusWidth::Four => word >> 4,
        LcdBusWidth::Eight => word,
    }
}
