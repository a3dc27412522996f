//! Bus-master side helpers that run complete AXI4-Lite transactions.
//!
//! The helpers look at the slave's channel state before every edge to decide
//! which valid/ready lines to raise, sample the slave outputs the edge sees,
//! and return once the response handshake has completed.

use super::slave::AxiLiteRegisterFile;
use super::{AxiInputs, AxiResponse, ReadState, WriteState};
use crate::error::DriverError;
use crate::trace::{AxiChannel, TraceSink};

/// Default edge budget for one transaction.
pub const DEFAULT_MAX_EDGES: u32 = 64;

/// Edge budget for a single transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct TransactionLimits {
    /// Edges allowed before the helper gives up.
    pub max_edges: u32,
}

impl Default for TransactionLimits {
    fn default() -> Self {
        Self {
            max_edges: DEFAULT_MAX_EDGES,
        }
    }
}

/// Outcome of a completed write transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WriteCompletion {
    /// Response accepted by the master.
    pub response: AxiResponse,
    /// Edges from the first request to the response handshake.
    pub edges: u32,
}

/// Outcome of a completed read transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReadCompletion {
    /// Data accepted by the master.
    pub data: u64,
    /// Response accepted by the master.
    pub response: AxiResponse,
    /// Edges from the first request to the data handshake.
    pub edges: u32,
}

/// Writes `data` under `strobe` to `addr`.
///
/// # Errors
///
/// Returns [`DriverError::ChannelBusy`] without driving an edge if the write
/// channel is not idle, and [`DriverError::Timeout`] when the response
/// handshake does not complete within `limits.max_edges` edges.
pub fn write_transaction(
    slave: &mut AxiLiteRegisterFile,
    addr: u64,
    data: u64,
    strobe: u8,
    limits: TransactionLimits,
    sink: &mut dyn TraceSink,
) -> Result<WriteCompletion, DriverError> {
    if slave.write_state() != WriteState::Idle {
        return Err(DriverError::ChannelBusy {
            channel: AxiChannel::Write,
        });
    }
    let mut edges = 0;
    while edges < limits.max_edges {
        let state = slave.write_state();
        let inputs = AxiInputs {
            write_request: matches!(
                state,
                WriteState::Idle | WriteState::AddressLatch | WriteState::DataIn
            ),
            addr,
            write_data: data,
            write_strobe: strobe,
            write_response_ready: matches!(
                state,
                WriteState::ResponseOut | WriteState::AddressError
            ),
            ..AxiInputs::default()
        };
        let sampled = slave.outputs();

        slave.step_traced(true, &inputs, sink);
        edges += 1;

        if inputs.write_response_ready && sampled.write_resp_valid {
            return Ok(WriteCompletion {
                response: sampled.write_resp,
                edges,
            });
        }
    }
    Err(DriverError::Timeout { edges })
}

/// Reads the register at `addr`.
///
/// # Errors
///
/// Returns [`DriverError::ChannelBusy`] without driving an edge if the read
/// channel is not idle, and [`DriverError::Timeout`] when the data handshake
/// does not complete within `limits.max_edges` edges.
pub fn read_transaction(
    slave: &mut AxiLiteRegisterFile,
    addr: u64,
    limits: TransactionLimits,
    sink: &mut dyn TraceSink,
) -> Result<ReadCompletion, DriverError> {
    if slave.read_state() != ReadState::Idle {
        return Err(DriverError::ChannelBusy {
            channel: AxiChannel::Read,
        });
    }
    let mut edges = 0;
    while edges < limits.max_edges {
        let state = slave.read_state();
        let inputs = AxiInputs {
            read_request: matches!(state, ReadState::Idle | ReadState::AddressLatch),
            addr,
            read_ready: matches!(state, ReadState::DataOut | ReadState::AddressError),
            ..AxiInputs::default()
        };
        let sampled = slave.outputs();

        slave.step_traced(true, &inputs, sink);
        edges += 1;

        if inputs.read_ready && sampled.read_valid {
            return Ok(ReadCompletion {
                data: sampled.read_data,
                response: sampled.read_resp,
                edges,
            });
        }
    }
    Err(DriverError::Timeout { edges })
}

/// Drives `edges` edges with every input low.
pub fn idle_edges(slave: &mut AxiLiteRegisterFile, edges: u32, sink: &mut dyn TraceSink) {
    let inputs = AxiInputs::default();
    for _ in 0..edges {
        slave.step_traced(true, &inputs, sink);
    }
}

/// Drives one edge with reset asserted.
pub fn reset_edge(slave: &mut AxiLiteRegisterFile, sink: &mut dyn TraceSink) {
    let inputs = AxiInputs {
        reset: true,
        ..AxiInputs::default()
    };
    slave.step_traced(true, &inputs, sink);
}
