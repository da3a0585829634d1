//! CAN transport capability.
//!
//! The codec never performs I/O itself; it consumes and produces
//! [`CanFrame`]s through this capability. Implementations only need to move
//! whole frames — arbitration, bit timing and bus-off recovery stay below
//! this interface.

#[cfg(all(feature = "socketcan", target_os = "linux"))]
#[cfg_attr(docsrs, doc(cfg(all(feature = "socketcan", target_os = "linux"))))]
pub mod socket;

#[cfg(all(feature = "socketcan", target_os = "linux"))]
pub use socket::SocketCanTransport;

use thiserror::Error;

use crate::core::frame::CanFrame;

/// Errors surfaced by a transport implementation.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The named interface could not be opened.
    #[error("Could not open CAN interface {interface}: {source}")]
    Open {
        interface: String,
        source: std::io::Error,
    },

    /// A read or write on the open interface failed.
    #[error("CAN transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The frame was rejected before reaching the bus.
    #[error("Frame rejected by the CAN layer")]
    Rejected,

    /// The interface went away underneath the transport.
    #[error("CAN interface closed")]
    Closed,
}

/// A blocking-or-polled CAN channel.
///
/// `try_receive` is non-blocking so an async layer can drive it from a
/// polling task; a blocking implementation may simply always return a
/// frame.
pub trait CanTransport: Send + Sync {
    /// Queue one frame for transmission.
    fn send(&self, frame: &CanFrame) -> Result<(), TransportError>;

    /// Fetch the next pending frame, `Ok(None)` when nothing is waiting.
    fn try_receive(&self) -> Result<Option<CanFrame>, TransportError>;
}

impl<T: CanTransport + ?Sized> CanTransport for std::sync::Arc<T> {
    fn send(&self, frame: &CanFrame) -> Result<(), TransportError> {
        (**self).send(frame)
    }

    fn try_receive(&self) -> Result<Option<CanFrame>, TransportError> {
        (**self).try_receive()
    }
}
