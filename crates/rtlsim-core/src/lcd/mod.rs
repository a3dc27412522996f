//! Character-LCD initialization sequencer model.

/// HD44780 instruction encoding.
pub mod command;
/// Enable-strobe pulse generator.
pub mod pulse;
/// Edge-driven initialization state machine.
pub mod sequencer;
/// Named delays and tick conversion.
pub mod timing;

pub use command::{bus_value, display_control, entry_mode, function_set, InitCommands};
pub use pulse::PulseGenerator;
pub use sequencer::LcdInitController;

/// Sequencer states in the order they are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum LcdState {
    /// Waiting for the supply to settle.
    #[default]
    PowerUp,
    /// Function-set issued twice, `FUNCTION_SET_TIME` apart.
    FunctionSet,
    /// Display on/off control issued.
    DisplayControl,
    /// Clear-display issued.
    DisplayClear,
    /// Entry mode issued.
    EntryModeSet,
    /// Initialization finished; external signals pass through.
    RunMode,
}

impl LcdState {
    /// Returns the state entered when this one's counter expires.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::PowerUp => Self::FunctionSet,
            Self::FunctionSet => Self::DisplayControl,
            Self::DisplayControl => Self::DisplayClear,
            Self::DisplayClear => Self::EntryModeSet,
            Self::EntryModeSet | Self::RunMode => Self::RunMode,
        }
    }

    /// Returns true for the states that drive an instruction word.
    #[must_use]
    pub const fn issues_command(self) -> bool {
        !matches!(self, Self::PowerUp | Self::RunMode)
    }
}

/// Levels on the LCD parallel interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct LcdBusSignals {
    /// Enable strobe (E).
    pub enable: bool,
    /// Register select (RS); low selects the instruction register.
    pub reg_select: bool,
    /// Read/write (R/W); low writes.
    pub read_write: bool,
    /// Data lines; only the low four are meaningful on a 4-bit bus.
    pub data: u8,
}
