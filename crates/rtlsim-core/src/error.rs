use std::fmt;

use thiserror::Error;

use crate::trace::AxiChannel;

/// Timed LCD initialization phases named in configuration errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum TimingPhase {
    /// Wait after power is applied before the first command.
    PowerOn,
    /// Spacing between the function-set and display-control commands.
    FunctionSet,
    /// Execution time of the clear-display command.
    DisplayClear,
    /// High time of the enable strobe.
    EnablePulse,
}

impl fmt::Display for TimingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PowerOn => "power-on",
            Self::FunctionSet => "function-set",
            Self::DisplayClear => "display-clear",
            Self::EnablePulse => "enable-pulse",
        };
        f.write_str(name)
    }
}

/// Construction-time configuration violations.
///
/// Both models only accept configuration at instantiation; nothing here is
/// reported once a model is stepping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ConfigError {
    /// Register file was configured with no registers.
    #[error("register file must contain at least one register")]
    EmptyRegisterFile,
    /// More registers than the model will allocate.
    #[error("register file of {register_count} registers exceeds the limit of {max}")]
    RegisterFileTooLarge {
        /// Configured number of registers.
        register_count: usize,
        /// Largest accepted register count.
        max: usize,
    },
    /// Address bus width is outside `1..=64`.
    #[error("address width must be between 1 and 64 bits, got {0}")]
    AddressWidth(u8),
    /// The highest register index does not fit on the address bus.
    #[error("{addr_width_bits}-bit address bus cannot reach {register_count} registers")]
    AddressSpaceTooSmall {
        /// Configured address bus width.
        addr_width_bits: u8,
        /// Configured number of registers.
        register_count: usize,
    },
    /// LCD clock frequency is zero.
    #[error("clock frequency must be non-zero")]
    ZeroClock,
    /// A phase duration does not fit the 32-bit tick counter.
    #[error("{phase} duration of {nanos} ns overflows the tick counter")]
    TickOverflow {
        /// Offending phase.
        phase: TimingPhase,
        /// Configured duration in nanoseconds.
        nanos: u64,
    },
    /// A phase duration rounds to zero ticks.
    #[error("{0} duration rounds to zero ticks")]
    ZeroDuration(TimingPhase),
    /// The enable pulse would run into the next pulse of `phase`.
    #[error("enable pulse of {pulse_ticks} ticks must be shorter than the {phase} phase ({phase_ticks} ticks)")]
    PulseTooWide {
        /// Phase whose re-trigger the pulse would overlap.
        phase: TimingPhase,
        /// Pulse width in ticks.
        pulse_ticks: u32,
        /// Phase duration in ticks.
        phase_ticks: u32,
    },
}

/// Failures reported by the bus-master transaction helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum DriverError {
    /// The slave did not complete the handshake within the edge budget.
    #[error("transaction did not complete within {edges} edges")]
    Timeout {
        /// Edges driven before giving up.
        edges: u32,
    },
    /// The channel was mid-transaction when the helper was called; a
    /// timed-out transaction has to be cleared with a reset edge first.
    #[error("{channel:?} channel is busy with an earlier transaction")]
    ChannelBusy {
        /// Channel that was not idle.
        channel: AxiChannel,
    },
}
