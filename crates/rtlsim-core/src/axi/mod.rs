//! AXI4-Lite slave register-file model.

/// Address decode and strobe merge helpers.
pub mod decode;
/// Bus-master transaction helpers.
pub mod master;
/// Fixed-size register array.
pub mod register_file;
/// Read and write channel state machines.
pub mod slave;

pub use decode::{decode_index, merge_strobe, DecodedAddress};
pub use master::{
    idle_edges, read_transaction, reset_edge, write_transaction, ReadCompletion,
    TransactionLimits, WriteCompletion, DEFAULT_MAX_EDGES,
};
pub use register_file::RegisterFile;
pub use slave::AxiLiteRegisterFile;

/// Two-bit AXI response code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum AxiResponse {
    /// Normal access success.
    Okay = 0b00,
    /// Exclusive access success; never produced by AXI4-Lite slaves.
    ExOkay = 0b01,
    /// Slave error; only driven as the idle/reset level.
    #[default]
    SlvErr = 0b10,
    /// Decode error: no register at the address.
    DecErr = 0b11,
}

impl AxiResponse {
    /// Returns the two-bit wire encoding.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Decodes a two-bit wire value; higher bits must be clear.
    #[must_use]
    pub const fn from_u8(bits: u8) -> Option<Self> {
        match bits {
            0b00 => Some(Self::Okay),
            0b01 => Some(Self::ExOkay),
            0b10 => Some(Self::SlvErr),
            0b11 => Some(Self::DecErr),
            _ => None,
        }
    }

    /// Returns the conventional upper-case mnemonic.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Okay => "OKAY",
            Self::ExOkay => "EXOKAY",
            Self::SlvErr => "SLVERR",
            Self::DecErr => "DECERR",
        }
    }

    /// Parses a mnemonic, ignoring case.
    #[must_use]
    pub fn from_mnemonic(text: &str) -> Option<Self> {
        [Self::Okay, Self::ExOkay, Self::SlvErr, Self::DecErr]
            .into_iter()
            .find(|resp| resp.mnemonic().eq_ignore_ascii_case(text))
    }
}

/// Read channel state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ReadState {
    /// Waiting for a read request.
    #[default]
    Idle,
    /// Address-ready asserted; the address is latched on the next edge.
    AddressLatch,
    /// Returning register contents.
    DataOut,
    /// Returning a decode error.
    AddressError,
}

/// Write channel state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum WriteState {
    /// Waiting for a write request.
    #[default]
    Idle,
    /// Address-ready asserted; the address is latched on the next edge.
    AddressLatch,
    /// Write-data-ready asserted; waiting for valid data.
    DataIn,
    /// Returning an OKAY write response.
    ResponseOut,
    /// Returning a decode error.
    AddressError,
}

/// Slave-side input levels sampled on a clock edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[allow(clippy::struct_excessive_bools)]
pub struct AxiInputs {
    /// Active-level reset.
    pub reset: bool,
    /// Read address valid.
    pub read_request: bool,
    /// Write address valid, and write data valid while in DATA_IN.
    pub write_request: bool,
    /// Address shared by both channels.
    pub addr: u64,
    /// Write data.
    pub write_data: u64,
    /// Per-byte write enables; bit `n` covers bits `8n..8n+8`.
    pub write_strobe: u8,
    /// Master ready to accept read data.
    pub read_ready: bool,
    /// Master ready to accept the write response.
    pub write_response_ready: bool,
}

/// Slave-side output levels after a clock edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[allow(clippy::struct_excessive_bools)]
pub struct AxiOutputs {
    /// Read address ready.
    pub read_addr_ready: bool,
    /// Read data valid.
    pub read_valid: bool,
    /// Read data.
    pub read_data: u64,
    /// Read response.
    pub read_resp: AxiResponse,
    /// Write address ready.
    pub write_addr_ready: bool,
    /// Write data ready.
    pub write_data_ready: bool,
    /// Write response valid.
    pub write_resp_valid: bool,
    /// Write response.
    pub write_resp: AxiResponse,
}

impl AxiOutputs {
    /// Levels driven while both channels are idle or held in reset.
    pub const IDLE: Self = Self {
        read_addr_ready: false,
        read_valid: false,
        read_data: 0,
        read_resp: AxiResponse::SlvErr,
        write_addr_ready: false,
        write_data_ready: false,
        write_resp_valid: false,
        write_resp: AxiResponse::SlvErr,
    };
}

impl Default for AxiOutputs {
    fn default() -> Self {
        Self::IDLE
    }
}
