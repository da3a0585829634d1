//! CAN frame abstraction.
//!
//! The codec never touches bus-level fields (bit timing, error counters);
//! a frame is just the 11-bit identifier, two flags and up to 8 data bytes.
//! The payload lives in a fixed stack buffer so that receiving and decoding
//! a frame allocates nothing.

use serde::{Deserialize, Serialize};

use crate::core::identifier::CanIdentifier;

/// A CAN 2.0A frame as exchanged with the transport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanFrame {
    /// Arbitration identifier. Only the low 11 bits are meaningful.
    pub id: u32,

    /// Extended (29-bit) identifier flag. The protocol never produces
    /// extended frames and rejects them on reception.
    pub extended: bool,

    /// Remote transmission request flag.
    pub rtr: bool,

    /// Payload bytes, valid up to `dlc`.
    data: [u8; 8],

    /// Data length code (0-8).
    dlc: u8,
}

impl CanFrame {
    /// Create a data frame from an identifier and payload slice.
    ///
    /// Payloads longer than 8 bytes are truncated; the protocol never
    /// produces one.
    pub fn data_frame(id: CanIdentifier, payload: &[u8]) -> Self {
        let mut data = [0u8; 8];
        let dlc = payload.len().min(8);
        data[..dlc].copy_from_slice(&payload[..dlc]);
        Self {
            id: id.encode(),
            extended: false,
            rtr: false,
            data,
            dlc: dlc as u8,
        }
    }

    /// Create a remote-transmission-request frame for an identifier.
    pub fn remote_frame(id: CanIdentifier) -> Self {
        Self {
            id: id.encode(),
            extended: false,
            rtr: true,
            data: [0u8; 8],
            dlc: 0,
        }
    }

    /// Rebuild a frame from raw transport fields.
    pub fn from_raw(id: u32, extended: bool, rtr: bool, payload: &[u8]) -> Self {
        let mut data = [0u8; 8];
        let dlc = payload.len().min(8);
        data[..dlc].copy_from_slice(&payload[..dlc]);
        Self {
            id,
            extended,
            rtr,
            data,
            dlc: dlc as u8,
        }
    }

    /// The decoded identifier fields.
    pub fn identifier(&self) -> CanIdentifier {
        CanIdentifier::decode(self.id)
    }

    /// Payload as a slice of `dlc` bytes.
    pub fn data(&self) -> &[u8] {
        &self.data[..self.dlc as usize]
    }

    /// Data length code.
    pub fn dlc(&self) -> usize {
        self.dlc as usize
    }

    /// True for a zero-length payload.
    pub fn is_empty(&self) -> bool {
        self.dlc == 0
    }
}
