//! Core abstractions of the protocol.
//!
//! This module provides the frame and identifier types every other layer is
//! built on, and the crate-wide error type.

pub mod error;
pub mod frame;
pub mod identifier;

pub use error::{ProtocolError, Result};
pub use frame::CanFrame;
pub use identifier::{CanIdentifier, MessageClass, MessageType, NodeClass, NodeId};
