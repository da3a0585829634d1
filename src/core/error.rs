//! Error type for the protocol codec.
//!
//! Every codec operation returns [`Result`]; nothing in this crate panics on
//! malformed input. All variants are recoverable: a caller can always drop
//! the offending frame and keep reading the bus. The codec itself never
//! logs — reporting is the transport/CLI layer's job.

use thiserror::Error;

/// Result type alias using [`ProtocolError`].
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors produced by encoding, decoding and dispatching protocol messages.
///
/// Display strings follow the firmware's diagnostic wording so that test
/// fixtures stay stable across implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// A buffer was shorter than the fixed wire length of the message.
    #[error("Invalid buffer size {actual}, required: {required}")]
    BufferTooSmall { actual: usize, required: usize },

    /// A heartbeat payload of exactly one byte, which no revision emits.
    #[error("Invalid buffer size 1 (min 2 required)")]
    TruncatedVersion,

    /// A fixed-point field decoded to its out-of-range sentinel.
    #[error("Invalid {field} value")]
    InvalidSensorValue { field: &'static str },

    /// A duration or divider exceeds its encodable range.
    #[error("{field} overflow")]
    RangeOverflow { field: &'static str },

    /// The frame cannot belong to this protocol (extended ID, RTR with a
    /// payload, RTR on a network or heartbeat type).
    #[error("{reason}")]
    InvalidIdentifier { reason: &'static str },

    /// No decoder is registered for this message class.
    #[error("Unknown message type 0x{class:02x}")]
    UnknownClass { class: u8 },

    /// No decoder is registered for this network sub-command.
    #[error("Unknown network command 0x{command:02x}")]
    UnknownNetworkCommand { command: u8 },

    /// A node id outside the 3-bit addressing range was requested.
    #[error("Invalid device ID {id} (max is 7)")]
    InvalidNodeId { id: u8 },

    /// Caller-side validation failed; nothing was encoded or sent.
    #[error("{reason}")]
    InvalidArgument { reason: &'static str },

    /// A class name did not resolve to any known node class.
    #[error("Unknown node class '{0}'")]
    UnknownNodeClass(String),

    /// A registered decoder rejected the payload of a data frame.
    #[error("Could not parse message data: {0}")]
    MalformedPayload(Box<ProtocolError>),
}

impl ProtocolError {
    /// Check that `buf` holds at least `required` bytes.
    ///
    /// Shared by every message codec so the size-mismatch diagnostic stays
    /// uniform across the protocol.
    pub(crate) fn check_size(buf: &[u8], required: usize) -> Result<()> {
        if buf.len() < required {
            return Err(ProtocolError::BufferTooSmall {
                actual: buf.len(),
                required,
            });
        }
        Ok(())
    }

    /// Wrap a payload-level decode error the way the dispatcher reports it.
    pub(crate) fn malformed(inner: ProtocolError) -> ProtocolError {
        ProtocolError::MalformedPayload(Box::new(inner))
    }
}
