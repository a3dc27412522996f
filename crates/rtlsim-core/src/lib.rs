//! Cycle-accurate software models of two FPGA designs: an AXI4-Lite slave
//! register file and an HD44780-class LCD initialization controller.

/// Construction-time configuration for both models.
pub mod config;
pub use config::{
    AxiConfig, DataWidth, DisplayControl, DisplayLines, EntryMode, FontSize, LcdBusWidth,
    LcdConfig, LcdTiming, PhaseTicks, DEFAULT_ADDR_WIDTH_BITS, DEFAULT_CLOCK_HZ,
    DEFAULT_REGISTER_COUNT, MAX_REGISTER_COUNT,
};

/// Configuration and driver error types.
pub mod error;
pub use error::{ConfigError, DriverError, TimingPhase};

/// Deterministic trace hooks.
pub mod trace;
pub use trace::{AxiChannel, NullTrace, TraceEvent, TraceSink};

/// AXI4-Lite slave register-file model and master-side helpers.
pub mod axi;
pub use axi::{
    decode_index, idle_edges, merge_strobe, read_transaction, reset_edge, write_transaction,
    AxiInputs, AxiLiteRegisterFile, AxiOutputs, AxiResponse, DecodedAddress, ReadCompletion,
    ReadState, RegisterFile, TransactionLimits, WriteCompletion, WriteState, DEFAULT_MAX_EDGES,
};

/// LCD initialization sequencer model.
pub mod lcd;
pub use lcd::timing::{
    ns_to_ticks, DISPLAY_CLEAR_TIME_NS, ENABLE_PULSE_WIDTH_NS, FUNCTION_SET_TIME_NS,
    POWER_ON_TIME_NS,
};
pub use lcd::{InitCommands, LcdBusSignals, LcdInitController, LcdState, PulseGenerator};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
