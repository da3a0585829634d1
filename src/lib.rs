//! # Aether
//!
//! A device-control protocol carried over a CAN bus, used to command and
//! query a family of environmental-control peripherals: a climate controller
//! (Zeus), a humidifier (Celaeno), a heater (Notus) and an illumination unit
//! (Helios).
//!
//! ## Features
//!
//! - **Pure codec**: bit-exact encode/decode of every protocol message, no
//!   I/O, no shared mutable state
//! - **Static registry**: message classes resolve through a table built at
//!   compile time and frozen after first use
//! - **Network control**: reset, heartbeat/ping, ID reassignment and error
//!   reporting sub-protocol, plus the RTR polling convention
//! - **Feature gated**: the SocketCAN transport compiles only where it can
//!   run
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use aether::prelude::*;
//!
//! // Encode a climate set-point for node 3 on the standard priority lane.
//! let frame = encode_frame(
//!     &ZeusSetPoint { humidity: 42.0, temperature: 25.0, wind: 127 },
//!     false,
//!     NodeId(3),
//! )?;
//! transport.send(&frame)?;
//!
//! // Decode whatever comes back.
//! let (message, node) = parse_frame(&transport.receive()?)?;
//! println!("{}", message);
//! ```
//!
//! ## Layers
//!
//! | Layer | Modules | Role |
//! |-------|---------|------|
//! | Codec | [`codec`], [`messages`], [`network`] | wire format, stateless |
//! | Dispatch | [`registry`] | class lookup, frame parse/build |
//! | Transport | [`transport`] | `CanTransport` capability, SocketCAN |
//! | Monitor | [`bus`] | event-driven receive loop, node directory |

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod core;
pub mod codec;
pub mod messages;
pub mod network;
pub mod registry;
pub mod transport;
pub mod bus;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        error::{ProtocolError, Result},
        frame::CanFrame,
        identifier::{CanIdentifier, MessageClass, MessageType, NodeClass, NodeId},
    };
    pub use crate::messages::{
        CelaenoConfig, CelaenoSetPoint, CelaenoStatus, FanStatus, FanStatusAndRpm, HeliosSetPoint,
        HeliosPulseMode, HeliosTriggerMode, NotusConfig, NotusSetPoint, PdConfig, WaterLevelStatus,
        WireMessage, ZeusConfig, ZeusControlPoint, ZeusDeltaTemperature, ZeusReport, ZeusSetPoint,
        ZeusStatus, ZeusStatusValue,
    };
    pub use crate::network::{
        ErrorReport, FirmwareVersion, HeartBeat, HeartBeatRequest, IdChangeRequest, MessageRequest,
        ResetRequest,
    };
    pub use crate::registry::{encode_frame, parse_frame, request_frame, Message};
    pub use crate::transport::{CanTransport, TransportError};
}

// Re-export core types at crate root for convenience
pub use crate::core::error::{ProtocolError, Result};
pub use crate::core::frame::CanFrame;
pub use crate::core::identifier::{CanIdentifier, MessageClass, MessageType, NodeClass, NodeId};
pub use crate::registry::{encode_frame, parse_frame, request_frame, Message};
pub use crate::transport::{CanTransport, TransportError};
