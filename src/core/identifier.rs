//! Arbitration identifier codec.
//!
//! The 11-bit CAN identifier carries three fields:
//!
//! ```text
//!  10  9   8   7   6   5   4   3   2   1   0
//! +------+-----------------------+----------+
//! | type |        class          |   node   |
//! +------+-----------------------+----------+
//!  2 bits        6 bits             3 bits
//! ```
//!
//! `encode` is a pure bit composition with no range checks; callers pass
//! values already masked to their field widths. `decode` masks and shifts,
//! silently ignoring any bits above the low 11.

use serde::{Deserialize, Serialize};

use crate::core::error::{ProtocolError, Result};

/// Message type field (2 bits). Determines the dispatch branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum MessageType {
    /// Network-control sub-protocol (reset, ping, ID change, ...).
    NetworkControlCommand = 0x00,
    /// Data message on the high-priority arbitration lane.
    HighPriorityMessage = 0x01,
    /// Data message on the standard lane.
    StandardMessage = 0x02,
    /// Liveness/version announcement from a node.
    HeartBeat = 0x03,
}

impl MessageType {
    /// Reconstruct from the 2-bit field value.
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0x00 => Self::NetworkControlCommand,
            0x01 => Self::HighPriorityMessage,
            0x02 => Self::StandardMessage,
            _ => Self::HeartBeat,
        }
    }

    /// The 2-bit field value.
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// True for the two data lanes (standard and high priority).
    pub const fn is_data(self) -> bool {
        matches!(self, Self::StandardMessage | Self::HighPriorityMessage)
    }
}

/// Device family identifier (6 bits of the arbitration ID).
///
/// An open value type rather than a closed enum: heartbeats may announce
/// classes this build does not know, and those must still round-trip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeClass(pub u8);

static NODE_CLASS_NAMES: [(NodeClass, &str); 5] = [
    (NodeClass::BROADCAST, "Broadcast"),
    (NodeClass::NOTUS, "Notus"),
    (NodeClass::CELAENO, "Celaeno"),
    (NodeClass::HELIOS, "Helios"),
    (NodeClass::ZEUS, "Zeus"),
];

impl NodeClass {
    /// Addresses every class at once.
    pub const BROADCAST: NodeClass = NodeClass(0x00);
    /// Heater.
    pub const NOTUS: NodeClass = NodeClass(0x20);
    /// Humidifier.
    pub const CELAENO: NodeClass = NodeClass(0x30);
    /// Illumination unit.
    pub const HELIOS: NodeClass = NodeClass(0x34);
    /// Climate controller.
    pub const ZEUS: NodeClass = NodeClass(0x38);

    /// Stable display name, `"<unknown>"` for unregistered values.
    pub fn name(self) -> &'static str {
        NODE_CLASS_NAMES
            .iter()
            .find(|(class, _)| *class == self)
            .map(|(_, name)| *name)
            .unwrap_or("<unknown>")
    }

    /// Case-insensitive name lookup.
    pub fn from_name(name: &str) -> Result<Self> {
        NODE_CLASS_NAMES
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(name))
            .map(|(class, _)| *class)
            .ok_or_else(|| ProtocolError::UnknownNodeClass(name.to_string()))
    }

    /// All known classes, broadcast included.
    pub fn all() -> impl Iterator<Item = (NodeClass, &'static str)> {
        NODE_CLASS_NAMES.iter().copied()
    }
}

impl std::fmt::Display for NodeClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Message kind identifier (6 bits, namespace shared with network
/// sub-commands — the dispatcher checks [`MessageType`] first).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageClass(pub u8);

impl MessageClass {
    pub const NOTUS_SET_POINT: MessageClass = MessageClass(0x20);
    pub const NOTUS_CONFIG: MessageClass = MessageClass(0x21);
    pub const CELAENO_SET_POINT: MessageClass = MessageClass(0x30);
    pub const CELAENO_STATUS: MessageClass = MessageClass(0x31);
    pub const CELAENO_CONFIG: MessageClass = MessageClass(0x32);
    pub const HELIOS_SET_POINT: MessageClass = MessageClass(0x34);
    pub const HELIOS_PULSE_MODE: MessageClass = MessageClass(0x35);
    pub const HELIOS_TRIGGER_MODE: MessageClass = MessageClass(0x36);
    pub const ZEUS_SET_POINT: MessageClass = MessageClass(0x38);
    pub const ZEUS_REPORT: MessageClass = MessageClass(0x39);
    /// Reserved: named, no payload decoder in this build.
    pub const ZEUS_VIBRATION_REPORT: MessageClass = MessageClass(0x3a);
    pub const ZEUS_CONFIG: MessageClass = MessageClass(0x3b);
    pub const ZEUS_STATUS: MessageClass = MessageClass(0x3c);
    pub const ZEUS_CONTROL_POINT: MessageClass = MessageClass(0x3d);
    pub const ZEUS_DELTA_TEMPERATURE: MessageClass = MessageClass(0x3e);
}

impl std::fmt::Display for MessageClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(crate::registry::class_name(*self))
    }
}

/// Network-control sub-command ids, carried in the node field of the
/// identifier when the type is [`MessageType::NetworkControlCommand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum NetworkCommand {
    Reset = 0x00,
    /// Reserved: no decoder registered.
    Synchronisation = 0x01,
    IdChange = 0x02,
    ErrorReport = 0x03,
    HeartBeatRequest = 0x07,
}

/// Node address within a class (3 bits). 0 broadcasts to the whole class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u8);

impl NodeId {
    /// Addresses all nodes of the targeted class.
    pub const BROADCAST: NodeId = NodeId(0);

    /// Highest addressable node id.
    pub const MAX: u8 = 7;

    /// Reject ids outside the 3-bit range before they reach a frame header.
    pub fn check(self) -> Result<Self> {
        if self.0 > Self::MAX {
            return Err(ProtocolError::InvalidNodeId { id: self.0 });
        }
        Ok(self)
    }

    /// True for the broadcast address.
    pub const fn is_broadcast(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The decomposed 11-bit arbitration identifier.
///
/// Invariant: `encode(decode(id)) == id & 0x7ff` for every `id`, and
/// `decode(encode(t, c, n)) == (t, c, n)` for in-range fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanIdentifier {
    pub message_type: MessageType,
    pub class: MessageClass,
    pub node: NodeId,
}

impl CanIdentifier {
    pub const fn new(message_type: MessageType, class: MessageClass, node: NodeId) -> Self {
        Self {
            message_type,
            class,
            node,
        }
    }

    /// Compose the raw identifier: `(type << 9) | (class << 3) | node`.
    pub const fn encode(self) -> u32 {
        ((self.message_type.bits() as u32) << 9)
            | ((self.class.0 as u32) << 3)
            | (self.node.0 as u32)
    }

    /// Mask-and-shift inverse. Bits above the low 11 are ignored.
    pub const fn decode(id: u32) -> Self {
        Self {
            message_type: MessageType::from_bits(((id & 0x600) >> 9) as u8),
            class: MessageClass(((id & 0x1f8) >> 3) as u8),
            node: NodeId((id & 0x7) as u8),
        }
    }
}
