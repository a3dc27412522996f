//! Power-up initialization sequencer for HD44780-class controllers.
//!
//! The controller walks POWER_UP → FUNCTION_SET → DISPLAY_CONTROL →
//! DISPLAY_CLEAR → ENTRY_MODE_SET → RUN_MODE, one edge at a time. Each
//! command state latches its instruction word on entry and raises an enable
//! request on its first tick (FUNCTION_SET also at `FUNCTION_SET_TIME`). The
//! pulse generator turns every rising request into a strobe of exactly
//! `PULSE_WIDTH` ticks.

use log::{debug, trace};

use super::command::{bus_value, InitCommands};
use super::pulse::PulseGenerator;
use super::{LcdBusSignals, LcdState};
use crate::config::{LcdBusWidth, LcdConfig, PhaseTicks};
use crate::error::ConfigError;
use crate::trace::{NullTrace, TraceEvent, TraceSink};

/// Init-mode values of the RS, R/W and data lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
struct InitLatch {
    data: u8,
    reg_select: bool,
    read_write: bool,
}

/// Cycle-accurate model of the LCD initialization controller.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct LcdInitController {
    ticks: PhaseTicks,
    commands: InitCommands,
    bus_width: LcdBusWidth,
    state: LcdState,
    cycle_counter: u64,
    latch: InitLatch,
    request: bool,
    pulse: PulseGenerator,
    edges: u64,
}

impl LcdInitController {
    /// Creates a controller in POWER_UP with every output low.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] reported by [`LcdConfig::phase_ticks`].
    pub fn new(config: &LcdConfig) -> Result<Self, ConfigError> {
        let ticks = config.phase_ticks()?;
        Ok(Self {
            ticks,
            commands: InitCommands::for_config(config),
            bus_width: config.bus_width,
            state: LcdState::PowerUp,
            cycle_counter: 0,
            latch: InitLatch::default(),
            request: false,
            pulse: PulseGenerator::new(ticks.pulse_width),
            edges: 0,
        })
    }

    /// Current sequencer state.
    #[must_use]
    pub const fn state(&self) -> LcdState {
        self.state
    }

    /// Ticks spent in the current state.
    #[must_use]
    pub const fn cycle_counter(&self) -> u64 {
        self.cycle_counter
    }

    /// Edges applied since construction.
    #[must_use]
    pub const fn edges(&self) -> u64 {
        self.edges
    }

    /// Phase durations in ticks.
    #[must_use]
    pub const fn phase_ticks(&self) -> PhaseTicks {
        self.ticks
    }

    /// Instruction words used by the sequence.
    #[must_use]
    pub const fn commands(&self) -> InitCommands {
        self.commands
    }

    /// Enable pulse generator state.
    #[must_use]
    pub const fn pulse(&self) -> &PulseGenerator {
        &self.pulse
    }

    /// Returns true once the sequence has finished.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.state, LcdState::RunMode)
    }

    /// Advances one clock edge; see [`Self::step_traced`].
    pub fn step(&mut self, clk_edge: bool, run: &LcdBusSignals) -> LcdBusSignals {
        self.step_traced(clk_edge, run, &mut NullTrace)
    }

    /// Advances one clock edge and returns the interface levels after it.
    ///
    /// Without an edge the state is untouched and the current levels are
    /// returned. `run` is only routed to the outputs in RUN_MODE.
    pub fn step_traced(
        &mut self,
        clk_edge: bool,
        run: &LcdBusSignals,
        sink: &mut dyn TraceSink,
    ) -> LcdBusSignals {
        if !clk_edge {
            return self.outputs(run);
        }
        self.edges += 1;

        if let Some(exit) = self.exit_count() {
            self.cycle_counter += 1;
            if self.cycle_counter == exit {
                self.enter(self.state.next(), sink);
            }
        }

        let request = self.enable_request();
        let rising = request && !self.request;
        self.request = request;
        self.pulse.clock(rising);
        if rising {
            trace!(
                "lcd: enable pulse in {:?} at edge {} (data {:#04x})",
                self.state,
                self.edges,
                self.latch.data
            );
            sink.on_event(TraceEvent::LcdEnablePulse {
                edge: self.edges,
                state: self.state,
                data: self.latch.data,
            });
        }

        self.outputs(run)
    }

    /// Steps with run-mode inputs held low until RUN_MODE is reached.
    ///
    /// Returns the number of edges applied by this call.
    pub fn run_to_completion(&mut self, sink: &mut dyn TraceSink) -> u64 {
        let idle = LcdBusSignals::default();
        let start = self.edges;
        while !self.is_running() {
            self.step_traced(true, &idle, sink);
        }
        self.edges - start
    }

    /// Interface levels for the current state and the given run-mode inputs.
    #[must_use]
    pub const fn outputs(&self, run: &LcdBusSignals) -> LcdBusSignals {
        let init_enable = self.pulse.is_active();
        if self.is_running() {
            LcdBusSignals {
                enable: run.enable || init_enable,
                reg_select: run.reg_select,
                read_write: run.read_write,
                data: run.data & self.bus_width.data_mask(),
            }
        } else {
            LcdBusSignals {
                enable: init_enable,
                reg_select: self.latch.reg_select,
                read_write: self.latch.read_write,
                data: self.latch.data,
            }
        }
    }

    const fn exit_count(&self) -> Option<u64> {
        let function_set = self.ticks.function_set as u64;
        match self.state {
            LcdState::PowerUp => Some(self.ticks.power_on as u64),
            LcdState::FunctionSet => Some(2 * function_set),
            LcdState::DisplayControl => Some(function_set),
            LcdState::DisplayClear => Some(self.ticks.display_clear as u64),
            LcdState::EntryModeSet => Some(self.ticks.pulse_width as u64),
            LcdState::RunMode => None,
        }
    }

    const fn enable_request(&self) -> bool {
        match self.state {
            LcdState::FunctionSet => {
                self.cycle_counter == 0 || self.cycle_counter == self.ticks.function_set as u64
            }
            LcdState::DisplayControl | LcdState::DisplayClear | LcdState::EntryModeSet => {
                self.cycle_counter == 0
            }
            LcdState::PowerUp | LcdState::RunMode => false,
        }
    }

    const fn command_for(&self, state: LcdState) -> Option<u8> {
        match state {
            LcdState::FunctionSet => Some(self.commands.function_set),
            LcdState::DisplayControl => Some(self.commands.display_control),
            LcdState::DisplayClear => Some(self.commands.clear),
            LcdState::EntryModeSet => Some(self.commands.entry_mode),
            LcdState::PowerUp | LcdState::RunMode => None,
        }
    }

    fn enter(&mut self, next: LcdState, sink: &mut dyn TraceSink) {
        self.state = next;
        self.cycle_counter = 0;

        // A 4-bit bus only carries the high nibble; the second (low-nibble)
        // transfer of each command is not modelled.
        let command = self.command_for(next);
        if let Some(word) = command {
            self.latch = InitLatch {
                data: bus_value(self.bus_width, word),
                reg_select: false,
                read_write: false,
            };
        }

        debug!("lcd: entered {next:?} at edge {}", self.edges);
        sink.on_event(TraceEvent::LcdStateEntered {
            edge: self.edges,
            state: next,
            command,
        });
    }
}
