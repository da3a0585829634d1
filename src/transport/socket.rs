//! SocketCAN transport (Linux only).
//!
//! Thin adapter from the kernel CAN socket to [`CanTransport`]. The socket
//! runs in non-blocking mode; `WouldBlock` maps to "no frame pending" so a
//! polling receive loop can share a thread with other work.

use socketcan::{CanSocket, EmbeddedFrame, Frame, Socket, StandardId};

use crate::core::frame::CanFrame;
use crate::transport::{CanTransport, TransportError};

/// A [`CanTransport`] backed by a SocketCAN interface such as `can0`.
pub struct SocketCanTransport {
    interface: String,
    socket: CanSocket,
}

impl SocketCanTransport {
    /// Open the named interface in non-blocking mode.
    pub fn open(interface: &str) -> Result<Self, TransportError> {
        let socket = CanSocket::open(interface).map_err(|source| TransportError::Open {
            interface: interface.to_string(),
            source: source.into(),
        })?;
        socket.set_nonblocking(true)?;

        #[cfg(feature = "tracing-support")]
        tracing::info!("CAN socket opened on {}", interface);

        Ok(Self {
            interface: interface.to_string(),
            socket,
        })
    }

    /// Name of the underlying interface.
    pub fn interface(&self) -> &str {
        &self.interface
    }
}

impl CanTransport for SocketCanTransport {
    fn send(&self, frame: &CanFrame) -> Result<(), TransportError> {
        let id = StandardId::new((frame.id & 0x7ff) as u16).ok_or(TransportError::Rejected)?;
        let raw = if frame.rtr {
            socketcan::CanFrame::new_remote(id, frame.dlc())
        } else {
            socketcan::CanFrame::new(id, frame.data())
        }
        .ok_or(TransportError::Rejected)?;

        #[cfg(feature = "tracing-support")]
        tracing::debug!(
            "sending frame on {}: ID=0x{:03X}, RTR={}, Data={:02X?}",
            self.interface,
            frame.id,
            frame.rtr,
            frame.data()
        );

        self.socket.write_frame(&raw)?;
        Ok(())
    }

    fn try_receive(&self) -> Result<Option<CanFrame>, TransportError> {
        match self.socket.read_frame() {
            Ok(raw) => Ok(Some(CanFrame::from_raw(
                raw.raw_id(),
                raw.is_extended(),
                raw.is_remote_frame(),
                raw.data(),
            ))),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
