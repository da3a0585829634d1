//! Network control sub-protocol.
//!
//! Frames whose message type is [`MessageType::NetworkControlCommand`] carry
//! class-agnostic management commands; the class field of the identifier
//! names the targeted device family and the node field carries the
//! sub-command id. Heartbeat announcements (type 3) and the RTR polling
//! convention live here as well.
//!
//! Encoders build complete frames so a validation failure can never put a
//! half-formed command on the bus.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::{ProtocolError, Result};
use crate::core::frame::CanFrame;
use crate::core::identifier::{
    CanIdentifier, MessageClass, MessageType, NetworkCommand, NodeClass, NodeId,
};
use crate::messages::duration_to_millis;

fn network_identifier(class: NodeClass, command: NetworkCommand) -> CanIdentifier {
    CanIdentifier::new(
        MessageType::NetworkControlCommand,
        MessageClass(class.0),
        NodeId(command as u8),
    )
}

// ============================================================================
// Frame builders (host -> nodes)
// ============================================================================

/// Ask one node (or with [`NodeId::BROADCAST`], every node) of a class to
/// reboot.
pub fn reset_frame(class: NodeClass, id: NodeId) -> Result<CanFrame> {
    id.check()?;
    Ok(CanFrame::data_frame(
        network_identifier(class, NetworkCommand::Reset),
        &[id.0],
    ))
}

/// Solicit a single heartbeat from every node of a class.
pub fn ping_frame(class: NodeClass) -> CanFrame {
    CanFrame::data_frame(network_identifier(class, NetworkCommand::HeartBeatRequest), &[])
}

/// Request periodic heartbeats at the given cadence.
///
/// The period travels as whole milliseconds in 16 bits; anything above
/// 65535 ms fails before a frame is built.
pub fn heartbeat_request_frame(class: NodeClass, period: Duration) -> Result<CanFrame> {
    let millis = duration_to_millis(period)?;
    Ok(CanFrame::data_frame(
        network_identifier(class, NetworkCommand::HeartBeatRequest),
        &millis.to_le_bytes(),
    ))
}

/// Reassign a node id.
///
/// Both ids must be concrete (non-broadcast) and distinct; a broadcast ID
/// change would re-address a whole class at once and an identity change
/// would be a no-op.
pub fn id_change_frame(class: NodeClass, old_id: NodeId, new_id: NodeId) -> Result<CanFrame> {
    old_id.check()?;
    new_id.check()?;
    if old_id.is_broadcast() || new_id.is_broadcast() {
        return Err(ProtocolError::InvalidArgument {
            reason: "ID change cannot use the broadcast ID",
        });
    }
    if old_id == new_id {
        return Err(ProtocolError::InvalidArgument {
            reason: "ID change requires two distinct IDs",
        });
    }
    Ok(CanFrame::data_frame(
        network_identifier(class, NetworkCommand::IdChange),
        &[old_id.0, new_id.0],
    ))
}

/// Build the heartbeat announcement a node emits (device side; used by
/// simulated transports and tests).
pub fn heartbeat_frame(class: NodeClass, id: NodeId, version: FirmwareVersion) -> CanFrame {
    CanFrame::data_frame(
        CanIdentifier::new(MessageType::HeartBeat, MessageClass(class.0), id),
        &[version.major, version.minor, version.patch, version.tweak],
    )
}

// ============================================================================
// Decoded records (nodes -> host)
// ============================================================================

/// A reset command observed on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetRequest {
    pub class: NodeClass,
    pub id: NodeId,
}

impl ResetRequest {
    pub(crate) fn decode(class: NodeClass, data: &[u8]) -> Result<(Self, NodeId)> {
        ProtocolError::check_size(data, 1)?;
        let id = NodeId(data[0]);
        Ok((Self { class, id }, id))
    }
}

impl std::fmt::Display for ResetRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.id.is_broadcast() {
            write!(f, "ResetRequest{{Class: {}, Node: all}}", self.class)
        } else {
            write!(
                f,
                "ResetRequest{{Class: {}, Node: {}}}",
                self.class, self.id
            )
        }
    }
}

/// A heartbeat solicitation observed on the bus.
///
/// `period == None` is the single-shot ping form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartBeatRequest {
    pub class: NodeClass,
    pub period: Option<Duration>,
}

impl HeartBeatRequest {
    pub(crate) fn decode(class: NodeClass, data: &[u8]) -> Result<(Self, NodeId)> {
        if data.is_empty() {
            return Ok((
                Self {
                    class,
                    period: None,
                },
                NodeId::BROADCAST,
            ));
        }
        ProtocolError::check_size(data, 2)?;
        let millis = u16::from_le_bytes([data[0], data[1]]);
        Ok((
            Self {
                class,
                period: Some(Duration::from_millis(millis as u64)),
            },
            NodeId::BROADCAST,
        ))
    }
}

impl std::fmt::Display for HeartBeatRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.period {
            None => write!(
                f,
                "HeartBeatRequest{{Class: {}, Node: all, Period: SinglePing}}",
                self.class
            ),
            Some(period) => write!(
                f,
                "HeartBeatRequest{{Class: {}, Node: all, Period: {:?}}}",
                self.class, period
            ),
        }
    }
}

/// An id-reassignment command observed on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdChangeRequest {
    pub class: NodeClass,
    pub old_id: NodeId,
    pub new_id: NodeId,
}

impl IdChangeRequest {
    pub(crate) fn decode(class: NodeClass, data: &[u8]) -> Result<(Self, NodeId)> {
        ProtocolError::check_size(data, 2)?;
        let request = Self {
            class,
            old_id: NodeId(data[0]),
            new_id: NodeId(data[1]),
        };
        Ok((request, request.old_id))
    }
}

impl std::fmt::Display for IdChangeRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "IDChangeRequest{{Class: {}, OldID: {}, NewID: {}}}",
            self.class, self.old_id, self.new_id
        )
    }
}

/// A diagnostic error report emitted by a node. Reception only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub class: NodeClass,
    pub id: NodeId,
    pub error_code: u16,
}

impl ErrorReport {
    pub(crate) fn decode(data: &[u8]) -> Result<(Self, NodeId)> {
        ProtocolError::check_size(data, 4)?;
        let report = Self {
            class: NodeClass(data[0]),
            id: NodeId(data[1]),
            error_code: u16::from_le_bytes([data[2], data[3]]),
        };
        Ok((report, report.id))
    }
}

impl std::fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ErrorReport{{Class: {}, ID: {}, ErrorCode: 0x{:04x}}}",
            self.class, self.id, self.error_code
        )
    }
}

/// Firmware version announced by a heartbeat. All zero means unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FirmwareVersion {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
    pub tweak: u8,
}

impl FirmwareVersion {
    pub const fn new(major: u8, minor: u8, patch: u8, tweak: u8) -> Self {
        Self {
            major,
            minor,
            patch,
            tweak,
        }
    }

    /// True when the announcing node did not report a version.
    pub const fn is_unknown(self) -> bool {
        self.major == 0 && self.minor == 0 && self.patch == 0 && self.tweak == 0
    }
}

impl std::fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.patch, self.tweak
        )
    }
}

/// A liveness/version announcement from a node.
///
/// Class and node come from the identifier, not the payload. The payload
/// length selects how much of the version is present: 0 bytes means
/// unknown, 2/3/4 bytes fill major.minor\[.patch\[.tweak\]\].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartBeat {
    pub class: NodeClass,
    pub id: NodeId,
    pub version: FirmwareVersion,
}

impl HeartBeat {
    pub(crate) fn decode(class: NodeClass, id: NodeId, data: &[u8]) -> Result<Self> {
        let mut version = FirmwareVersion::default();
        match data.len() {
            0 => {}
            1 => return Err(ProtocolError::TruncatedVersion),
            n => {
                version.major = data[0];
                version.minor = data[1];
                if n > 2 {
                    version.patch = data[2];
                }
                if n > 3 {
                    version.tweak = data[3];
                }
            }
        }
        Ok(Self { class, id, version })
    }
}

impl std::fmt::Display for HeartBeat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.version.is_unknown() {
            write!(f, "HeartBeat{{Class: {}, ID: {}}}", self.class, self.id)
        } else {
            write!(
                f,
                "HeartBeat{{Class: {}, ID: {}, Version: {}}}",
                self.class, self.id, self.version
            )
        }
    }
}

/// The decoded form of an RTR poll: "please send me your current value of
/// this message class".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRequest {
    pub class: MessageClass,
    pub id: NodeId,
}

impl std::fmt::Display for MessageRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.id.is_broadcast() {
            write!(f, "MessageRequest{{Message: {}, Node: all}}", self.class)
        } else {
            write!(
                f,
                "MessageRequest{{Message: {}, Node: {}}}",
                self.class, self.id
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_frame() {
        let frame = reset_frame(NodeClass::ZEUS, NodeId::BROADCAST).unwrap();
        assert_eq!(frame.identifier().message_type, MessageType::NetworkControlCommand);
        assert_eq!(frame.identifier().class.0, NodeClass::ZEUS.0);
        assert_eq!(frame.identifier().node.0, NetworkCommand::Reset as u8);
        assert_eq!(frame.data(), &[0x00]);

        assert_eq!(
            reset_frame(NodeClass::ZEUS, NodeId(9)),
            Err(ProtocolError::InvalidNodeId { id: 9 })
        );
    }

    #[test]
    fn test_ping_frame() {
        let frame = ping_frame(NodeClass::CELAENO);
        assert!(frame.is_empty());
        assert_eq!(frame.identifier().node.0, NetworkCommand::HeartBeatRequest as u8);
    }

    #[test]
    fn test_heartbeat_request_frame() {
        let frame = heartbeat_request_frame(NodeClass::ZEUS, Duration::from_secs(1)).unwrap();
        assert_eq!(frame.data(), &[0xe8, 0x03]);

        assert_eq!(
            heartbeat_request_frame(NodeClass::ZEUS, Duration::from_millis(1 << 16))
                .unwrap_err()
                .to_string(),
            "Time constant overflow"
        );
    }

    #[test]
    fn test_id_change_validation() {
        assert!(id_change_frame(NodeClass::HELIOS, NodeId(1), NodeId(2)).is_ok());

        for (old, new) in [(0u8, 2u8), (1, 0), (0, 0), (3, 3)] {
            let result = id_change_frame(NodeClass::HELIOS, NodeId(old), NodeId(new));
            assert!(
                matches!(result, Err(ProtocolError::InvalidArgument { .. })),
                "old={old} new={new} must be rejected"
            );
        }

        let frame = id_change_frame(NodeClass::HELIOS, NodeId(1), NodeId(2)).unwrap();
        assert_eq!(frame.data(), &[0x01, 0x02]);
    }

    #[test]
    fn test_heartbeat_length_matrix() {
        let testdata: &[(&[u8], FirmwareVersion)] = &[
            (&[], FirmwareVersion::new(0, 0, 0, 0)),
            (&[1, 2], FirmwareVersion::new(1, 2, 0, 0)),
            (&[1, 2, 3], FirmwareVersion::new(1, 2, 3, 0)),
            (&[1, 2, 3, 4], FirmwareVersion::new(1, 2, 3, 4)),
        ];
        for &(data, version) in testdata {
            let heartbeat = HeartBeat::decode(NodeClass::ZEUS, NodeId(2), data).unwrap();
            assert_eq!(heartbeat.version, version);
        }

        assert_eq!(
            HeartBeat::decode(NodeClass::ZEUS, NodeId(2), &[1])
                .unwrap_err()
                .to_string(),
            "Invalid buffer size 1 (min 2 required)"
        );
    }

    #[test]
    fn test_display() {
        let heartbeat = HeartBeat {
            class: NodeClass::HELIOS,
            id: NodeId(3),
            version: FirmwareVersion::default(),
        };
        assert_eq!(heartbeat.to_string(), "HeartBeat{Class: Helios, ID: 3}");

        let heartbeat = HeartBeat {
            class: NodeClass::CELAENO,
            id: NodeId(3),
            version: FirmwareVersion::new(1, 4, 0, 1),
        };
        assert_eq!(
            heartbeat.to_string(),
            "HeartBeat{Class: Celaeno, ID: 3, Version: 1.4.0.1}"
        );

        let request = MessageRequest {
            class: MessageClass::CELAENO_CONFIG,
            id: NodeId::BROADCAST,
        };
        assert_eq!(
            request.to_string(),
            "MessageRequest{Message: Celaeno.Config, Node: all}"
        );
    }
}
