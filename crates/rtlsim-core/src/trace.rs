//! Deterministic trace hooks emitted at clock-edge boundaries.

use crate::axi::{AxiResponse, ReadState, WriteState};
use crate::lcd::LcdState;

/// AXI channel that raised a trace event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum AxiChannel {
    /// Read address/data channels.
    Read,
    /// Write address/data/response channels.
    Write,
}

/// Trace events in the order the edge produced them.
///
/// Every event carries the 1-based count of the edge that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum TraceEvent {
    /// Reset was sampled active; both channels returned to idle.
    AxiReset {
        /// Edge count.
        edge: u64,
    },
    /// Read channel changed state.
    AxiReadTransition {
        /// Edge count.
        edge: u64,
        /// State before the edge.
        from: ReadState,
        /// State after the edge.
        to: ReadState,
    },
    /// Write channel changed state.
    AxiWriteTransition {
        /// Edge count.
        edge: u64,
        /// State before the edge.
        from: WriteState,
        /// State after the edge.
        to: WriteState,
    },
    /// A latched address fell outside the register file.
    AxiDecodeError {
        /// Edge count.
        edge: u64,
        /// Channel that latched the address.
        channel: AxiChannel,
        /// Address as sampled from the bus.
        addr: u64,
    },
    /// A transaction completed its response handshake.
    AxiResponseAccepted {
        /// Edge count.
        edge: u64,
        /// Channel whose response was accepted.
        channel: AxiChannel,
        /// Response code returned.
        response: AxiResponse,
    },
    /// The register array was updated.
    AxiRegisterWrite {
        /// Edge count.
        edge: u64,
        /// Register index.
        index: usize,
        /// Contents before the write.
        previous: u64,
        /// Contents after the write.
        value: u64,
        /// Strobe mask applied.
        strobe: u8,
    },
    /// The LCD sequencer entered a state.
    LcdStateEntered {
        /// Edge count.
        edge: u64,
        /// Entered state.
        state: LcdState,
        /// Instruction word latched on entry, if the state drives one.
        command: Option<u8>,
    },
    /// An enable pulse started.
    LcdEnablePulse {
        /// Edge count.
        edge: u64,
        /// State that requested the pulse.
        state: LcdState,
        /// Data lines at the start of the pulse.
        data: u8,
    },
}

/// Sink trait for deterministic trace hooks.
pub trait TraceSink {
    /// Records an event in edge order.
    fn on_event(&mut self, event: TraceEvent);
}

impl TraceSink for Vec<TraceEvent> {
    fn on_event(&mut self, event: TraceEvent) {
        self.push(event);
    }
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTrace;

impl TraceSink for NullTrace {
    fn on_event(&mut self, _event: TraceEvent) {}
}

#[cfg(test)]
mod tests {
    use super::{NullTrace, TraceEvent, TraceSink};

    #[test]
    fn vec_sink_keeps_emission_order() {
        let mut sink = Vec::new();
        sink.on_event(TraceEvent::AxiReset { edge: 1 });
        sink.on_event(TraceEvent::AxiReset { edge: 2 });
        assert_eq!(
            sink,
            vec![
                TraceEvent::AxiReset { edge: 1 },
                TraceEvent::AxiReset { edge: 2 }
            ]
        );
    }

    #[test]
    fn null_sink_accepts_events() {
        let mut sink = NullTrace;
        sink.on_event(TraceEvent::AxiReset { edge: 1 });
    }
}
