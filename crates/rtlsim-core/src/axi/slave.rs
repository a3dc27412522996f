//! Edge-driven read and write channel state machines.
//!
//! Both channels are Moore machines: each edge computes the next state from
//! the current state and the sampled inputs, and the outputs are a function
//! of the new state alone. The read channel is clocked first so that read
//! data is captured from the array as it stood before the edge; the write
//! channel is the only writer and only writes from DATA_IN.

use log::{debug, trace};

use super::decode::{decode_index, DecodedAddress};
use super::register_file::RegisterFile;
use super::{AxiInputs, AxiOutputs, AxiResponse, ReadState, WriteState};
use crate::config::AxiConfig;
use crate::error::ConfigError;
use crate::trace::{AxiChannel, NullTrace, TraceEvent, TraceSink};

/// Cycle-accurate AXI4-Lite slave in front of a register array.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct AxiLiteRegisterFile {
    config: AxiConfig,
    registers: RegisterFile,
    read_state: ReadState,
    write_state: WriteState,
    latched_read_address: u64,
    latched_write_address: u64,
    write_index: usize,
    read_data: u64,
    outputs: AxiOutputs,
    edges: u64,
}

impl AxiLiteRegisterFile {
    /// Creates a slave with both channels idle and every register zero.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] reported by [`AxiConfig::validate`].
    pub fn new(config: AxiConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            registers: RegisterFile::new(config.data_width, config.register_count),
            read_state: ReadState::Idle,
            write_state: WriteState::Idle,
            latched_read_address: 0,
            latched_write_address: 0,
            write_index: 0,
            read_data: 0,
            outputs: AxiOutputs::IDLE,
            edges: 0,
        })
    }

    /// Configuration the slave was built with.
    #[must_use]
    pub const fn config(&self) -> &AxiConfig {
        &self.config
    }

    /// Current read channel state.
    #[must_use]
    pub const fn read_state(&self) -> ReadState {
        self.read_state
    }

    /// Current write channel state.
    #[must_use]
    pub const fn write_state(&self) -> WriteState {
        self.write_state
    }

    /// Address latched by the last read address handshake.
    #[must_use]
    pub const fn latched_read_address(&self) -> u64 {
        self.latched_read_address
    }

    /// Address latched by the last write address handshake.
    #[must_use]
    pub const fn latched_write_address(&self) -> u64 {
        self.latched_write_address
    }

    /// Register array.
    #[must_use]
    pub const fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    /// Reads a register directly, bypassing the bus.
    #[must_use]
    pub fn register(&self, index: usize) -> Option<u64> {
        self.registers.read(index)
    }

    /// Output levels produced by the last edge.
    #[must_use]
    pub const fn outputs(&self) -> AxiOutputs {
        self.outputs
    }

    /// Edges applied since construction.
    #[must_use]
    pub const fn edges(&self) -> u64 {
        self.edges
    }

    /// Advances one clock edge; see [`Self::step_traced`].
    pub fn step(&mut self, clk_edge: bool, inputs: &AxiInputs) -> AxiOutputs {
        self.step_traced(clk_edge, inputs, &mut NullTrace)
    }

    /// Advances one clock edge and returns the outputs after it.
    ///
    /// Without an edge nothing changes. An active reset takes priority over
    /// every other input: both channels return to idle, all ready/valid
    /// outputs drop and the responses fall back to SLVERR. Register contents
    /// survive reset.
    pub fn step_traced(
        &mut self,
        clk_edge: bool,
        inputs: &AxiInputs,
        sink: &mut dyn TraceSink,
    ) -> AxiOutputs {
        if !clk_edge {
            return self.outputs;
        }
        self.edges += 1;

        if inputs.reset {
            self.apply_reset();
            debug!("axi: reset at edge {}", self.edges);
            sink.on_event(TraceEvent::AxiReset { edge: self.edges });
            return self.outputs;
        }

        let read_from = self.read_state;
        self.read_state = self.clock_read(inputs, sink);
        if read_from != self.read_state {
            trace!(
                "axi: read {read_from:?} -> {:?} at edge {}",
                self.read_state,
                self.edges
            );
            sink.on_event(TraceEvent::AxiReadTransition {
                edge: self.edges,
                from: read_from,
                to: self.read_state,
            });
        }

        let write_from = self.write_state;
        self.write_state = self.clock_write(inputs, sink);
        if write_from != self.write_state {
            trace!(
                "axi: write {write_from:?} -> {:?} at edge {}",
                self.write_state,
                self.edges
            );
            sink.on_event(TraceEvent::AxiWriteTransition {
                edge: self.edges,
                from: write_from,
                to: self.write_state,
            });
        }

        self.outputs = self.drive_outputs();
        self.outputs
    }

    fn apply_reset(&mut self) {
        self.read_state = ReadState::Idle;
        self.write_state = WriteState::Idle;
        self.latched_read_address = 0;
        self.latched_write_address = 0;
        self.write_index = 0;
        self.read_data = 0;
        self.outputs = AxiOutputs::IDLE;
    }

    fn clock_read(&mut self, inputs: &AxiInputs, sink: &mut dyn TraceSink) -> ReadState {
        match self.read_state {
            ReadState::Idle if inputs.read_request => ReadState::AddressLatch,
            ReadState::Idle => ReadState::Idle,
            ReadState::AddressLatch => {
                self.latched_read_address = inputs.addr & self.config.address_mask();
                match decode_index(&self.config, inputs.addr) {
                    DecodedAddress::Register(index) => {
                        self.read_data = self.registers.read(index).unwrap_or(0);
                        ReadState::DataOut
                    }
                    DecodedAddress::OutOfRange(_) => {
                        self.report_decode_error(AxiChannel::Read, inputs.addr, sink);
                        self.read_data = 0;
                        ReadState::AddressError
                    }
                }
            }
            state @ (ReadState::DataOut | ReadState::AddressError) => {
                if inputs.read_ready {
                    let response = if state == ReadState::DataOut {
                        AxiResponse::Okay
                    } else {
                        AxiResponse::DecErr
                    };
                    sink.on_event(TraceEvent::AxiResponseAccepted {
                        edge: self.edges,
                        channel: AxiChannel::Read,
                        response,
                    });
                    ReadState::Idle
                } else {
                    state
                }
            }
        }
    }

    fn clock_write(&mut self, inputs: &AxiInputs, sink: &mut dyn TraceSink) -> WriteState {
        match self.write_state {
            WriteState::Idle if inputs.write_request => WriteState::AddressLatch,
            WriteState::Idle => WriteState::Idle,
            WriteState::AddressLatch => {
                self.latched_write_address = inputs.addr & self.config.address_mask();
                match decode_index(&self.config, inputs.addr) {
                    DecodedAddress::Register(index) => {
                        self.write_index = index;
                        WriteState::DataIn
                    }
                    DecodedAddress::OutOfRange(_) => {
                        self.report_decode_error(AxiChannel::Write, inputs.addr, sink);
                        WriteState::AddressError
                    }
                }
            }
            WriteState::DataIn if inputs.write_request => {
                let index = self.write_index;
                if let Some(previous) =
                    self.registers
                        .write_masked(index, inputs.write_data, inputs.write_strobe)
                {
                    sink.on_event(TraceEvent::AxiRegisterWrite {
                        edge: self.edges,
                        index,
                        previous,
                        value: self.registers.read(index).unwrap_or(previous),
                        strobe: inputs.write_strobe,
                    });
                }
                WriteState::ResponseOut
            }
            WriteState::DataIn => WriteState::DataIn,
            state @ (WriteState::ResponseOut | WriteState::AddressError) => {
                if inputs.write_response_ready {
                    let response = if state == WriteState::ResponseOut {
                        AxiResponse::Okay
                    } else {
                        AxiResponse::DecErr
                    };
                    sink.on_event(TraceEvent::AxiResponseAccepted {
                        edge: self.edges,
                        channel: AxiChannel::Write,
                        response,
                    });
                    WriteState::Idle
                } else {
                    state
                }
            }
        }
    }

    fn report_decode_error(&self, channel: AxiChannel, addr: u64, sink: &mut dyn TraceSink) {
        debug!(
            "axi: {channel:?} decode error for address {addr:#x} at edge {}",
            self.edges
        );
        sink.on_event(TraceEvent::AxiDecodeError {
            edge: self.edges,
            channel,
            addr,
        });
    }

    const fn drive_outputs(&self) -> AxiOutputs {
        let mut out = AxiOutputs::IDLE;

        match self.read_state {
            ReadState::Idle => {}
            ReadState::AddressLatch => out.read_addr_ready = true,
            ReadState::DataOut => {
                out.read_valid = true;
                out.read_data = self.read_data;
                out.read_resp = AxiResponse::Okay;
            }
            ReadState::AddressError => {
                out.read_valid = true;
                out.read_resp = AxiResponse::DecErr;
            }
        }

        match self.write_state {
            WriteState::Idle => {}
            WriteState::AddressLatch => out.write_addr_ready = true,
            WriteState::DataIn => out.write_data_ready = true,
            WriteState::ResponseOut => {
                out.write_resp_valid = true;
                out.write_resp = AxiResponse::Okay;
            }
            WriteState::AddressError => {
                out.write_resp_valid = true;
                out.write_resp = AxiResponse::DecErr;
            }
        }

        out
    }
}
