//! Message registry and frame dispatch.
//!
//! The registry is a static table mapping each message class to a decoder
//! and a stable display name, indexed once through a lazily-built lookup
//! array and never mutated afterwards. [`parse_frame`] classifies a frame
//! (standard data, high-priority data, network command, heartbeat or RTR
//! poll) from its identifier bits and routes it to the matching decoder;
//! [`encode_frame`] and [`request_frame`] build outbound frames.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::core::error::{ProtocolError, Result};
use crate::core::frame::CanFrame;
use crate::core::identifier::{CanIdentifier, MessageClass, MessageType, NodeClass, NodeId};
use crate::messages::{
    CelaenoConfig, CelaenoSetPoint, CelaenoStatus, HeliosPulseMode, HeliosSetPoint,
    HeliosTriggerMode, NotusConfig, NotusSetPoint, WireMessage, ZeusConfig, ZeusControlPoint,
    ZeusDeltaTemperature, ZeusReport, ZeusSetPoint, ZeusStatus,
};
use crate::network::{
    ErrorReport, HeartBeat, HeartBeatRequest, IdChangeRequest, MessageRequest, ResetRequest,
};

/// Any message the protocol can decode, device payloads and network
/// control records alike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Message {
    ZeusSetPoint(ZeusSetPoint),
    ZeusReport(ZeusReport),
    ZeusConfig(ZeusConfig),
    ZeusStatus(ZeusStatus),
    ZeusControlPoint(ZeusControlPoint),
    ZeusDeltaTemperature(ZeusDeltaTemperature),
    HeliosSetPoint(HeliosSetPoint),
    HeliosPulseMode(HeliosPulseMode),
    HeliosTriggerMode(HeliosTriggerMode),
    CelaenoSetPoint(CelaenoSetPoint),
    CelaenoStatus(CelaenoStatus),
    CelaenoConfig(CelaenoConfig),
    NotusSetPoint(NotusSetPoint),
    NotusConfig(NotusConfig),
    Reset(ResetRequest),
    HeartBeatRequest(HeartBeatRequest),
    IdChange(IdChangeRequest),
    ErrorReport(ErrorReport),
    HeartBeat(HeartBeat),
    Request(MessageRequest),
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeusSetPoint(m) => m.fmt(f),
            Self::ZeusReport(m) => m.fmt(f),
            Self::ZeusConfig(m) => m.fmt(f),
            Self::ZeusStatus(m) => m.fmt(f),
            Self::ZeusControlPoint(m) => m.fmt(f),
            Self::ZeusDeltaTemperature(m) => m.fmt(f),
            Self::HeliosSetPoint(m) => m.fmt(f),
            Self::HeliosPulseMode(m) => m.fmt(f),
            Self::HeliosTriggerMode(m) => m.fmt(f),
            Self::CelaenoSetPoint(m) => m.fmt(f),
            Self::CelaenoStatus(m) => m.fmt(f),
            Self::CelaenoConfig(m) => m.fmt(f),
            Self::NotusSetPoint(m) => m.fmt(f),
            Self::NotusConfig(m) => m.fmt(f),
            Self::Reset(m) => m.fmt(f),
            Self::HeartBeatRequest(m) => m.fmt(f),
            Self::IdChange(m) => m.fmt(f),
            Self::ErrorReport(m) => m.fmt(f),
            Self::HeartBeat(m) => m.fmt(f),
            Self::Request(m) => m.fmt(f),
        }
    }
}

impl From<ZeusSetPoint> for Message {
    fn from(m: ZeusSetPoint) -> Self {
        Self::ZeusSetPoint(m)
    }
}
impl From<ZeusReport> for Message {
    fn from(m: ZeusReport) -> Self {
        Self::ZeusReport(m)
    }
}
impl From<ZeusConfig> for Message {
    fn from(m: ZeusConfig) -> Self {
        Self::ZeusConfig(m)
    }
}
impl From<ZeusStatus> for Message {
    fn from(m: ZeusStatus) -> Self {
        Self::ZeusStatus(m)
    }
}
impl From<ZeusControlPoint> for Message {
    fn from(m: ZeusControlPoint) -> Self {
        Self::ZeusControlPoint(m)
    }
}
impl From<ZeusDeltaTemperature> for Message {
    fn from(m: ZeusDeltaTemperature) -> Self {
        Self::ZeusDeltaTemperature(m)
    }
}
impl From<HeliosSetPoint> for Message {
    fn from(m: HeliosSetPoint) -> Self {
        Self::HeliosSetPoint(m)
    }
}
impl From<HeliosPulseMode> for Message {
    fn from(m: HeliosPulseMode) -> Self {
        Self::HeliosPulseMode(m)
    }
}
impl From<HeliosTriggerMode> for Message {
    fn from(m: HeliosTriggerMode) -> Self {
        Self::HeliosTriggerMode(m)
    }
}
impl From<CelaenoSetPoint> for Message {
    fn from(m: CelaenoSetPoint) -> Self {
        Self::CelaenoSetPoint(m)
    }
}
impl From<CelaenoStatus> for Message {
    fn from(m: CelaenoStatus) -> Self {
        Self::CelaenoStatus(m)
    }
}
impl From<CelaenoConfig> for Message {
    fn from(m: CelaenoConfig) -> Self {
        Self::CelaenoConfig(m)
    }
}
impl From<NotusSetPoint> for Message {
    fn from(m: NotusSetPoint) -> Self {
        Self::NotusSetPoint(m)
    }
}
impl From<NotusConfig> for Message {
    fn from(m: NotusConfig) -> Self {
        Self::NotusConfig(m)
    }
}

// ============================================================================
// Descriptor tables
// ============================================================================

type PayloadDecoder = fn(&[u8]) -> Result<Message>;
type NetworkDecoder = fn(NodeClass, &[u8]) -> Result<(Message, NodeId)>;

/// One registered data-lane message class.
pub struct MessageDescriptor {
    pub class: MessageClass,
    /// Stable display name, e.g. `"Zeus.SetPoint"`.
    pub name: &'static str,
    /// Fixed payload length; `None` for reserved classes.
    pub wire_size: Option<usize>,
    /// Payload decoder; `None` for reserved classes.
    pub decode: Option<PayloadDecoder>,
}

fn decode_into<M: WireMessage + Into<Message>>(data: &[u8]) -> Result<Message> {
    M::decode(data).map(Into::into)
}

/// Every message class of the two data lanes known to this build.
pub static MESSAGES: &[MessageDescriptor] = &[
    MessageDescriptor {
        class: MessageClass::NOTUS_SET_POINT,
        name: "Notus.SetPoint",
        wire_size: Some(NotusSetPoint::WIRE_SIZE),
        decode: Some(decode_into::<NotusSetPoint>),
    },
    MessageDescriptor {
        class: MessageClass::NOTUS_CONFIG,
        name: "Notus.Config",
        wire_size: Some(NotusConfig::WIRE_SIZE),
        decode: Some(decode_into::<NotusConfig>),
    },
    MessageDescriptor {
        class: MessageClass::CELAENO_SET_POINT,
        name: "Celaeno.SetPoint",
        wire_size: Some(CelaenoSetPoint::WIRE_SIZE),
        decode: Some(decode_into::<CelaenoSetPoint>),
    },
    MessageDescriptor {
        class: MessageClass::CELAENO_STATUS,
        name: "Celaeno.Status",
        wire_size: Some(CelaenoStatus::WIRE_SIZE),
        decode: Some(decode_into::<CelaenoStatus>),
    },
    MessageDescriptor {
        class: MessageClass::CELAENO_CONFIG,
        name: "Celaeno.Config",
        wire_size: Some(CelaenoConfig::WIRE_SIZE),
        decode: Some(decode_into::<CelaenoConfig>),
    },
    MessageDescriptor {
        class: MessageClass::HELIOS_SET_POINT,
        name: "Helios.SetPoint",
        wire_size: Some(HeliosSetPoint::WIRE_SIZE),
        decode: Some(decode_into::<HeliosSetPoint>),
    },
    MessageDescriptor {
        class: MessageClass::HELIOS_PULSE_MODE,
        name: "Helios.PulseMode",
        wire_size: Some(HeliosPulseMode::WIRE_SIZE),
        decode: Some(decode_into::<HeliosPulseMode>),
    },
    MessageDescriptor {
        class: MessageClass::HELIOS_TRIGGER_MODE,
        name: "Helios.TriggerMode",
        wire_size: Some(HeliosTriggerMode::WIRE_SIZE),
        decode: Some(decode_into::<HeliosTriggerMode>),
    },
    MessageDescriptor {
        class: MessageClass::ZEUS_SET_POINT,
        name: "Zeus.SetPoint",
        wire_size: Some(ZeusSetPoint::WIRE_SIZE),
        decode: Some(decode_into::<ZeusSetPoint>),
    },
    MessageDescriptor {
        class: MessageClass::ZEUS_REPORT,
        name: "Zeus.Report",
        wire_size: Some(ZeusReport::WIRE_SIZE),
        decode: Some(decode_into::<ZeusReport>),
    },
    MessageDescriptor {
        class: MessageClass::ZEUS_VIBRATION_REPORT,
        name: "Zeus.VibrationReport",
        wire_size: None,
        decode: None,
    },
    MessageDescriptor {
        class: MessageClass::ZEUS_CONFIG,
        name: "Zeus.Config",
        wire_size: Some(ZeusConfig::WIRE_SIZE),
        decode: Some(decode_into::<ZeusConfig>),
    },
    MessageDescriptor {
        class: MessageClass::ZEUS_STATUS,
        name: "Zeus.Status",
        wire_size: Some(ZeusStatus::WIRE_SIZE),
        decode: Some(decode_into::<ZeusStatus>),
    },
    MessageDescriptor {
        class: MessageClass::ZEUS_CONTROL_POINT,
        name: "Zeus.ControlPoint",
        wire_size: Some(ZeusControlPoint::WIRE_SIZE),
        decode: Some(decode_into::<ZeusControlPoint>),
    },
    MessageDescriptor {
        class: MessageClass::ZEUS_DELTA_TEMPERATURE,
        name: "Zeus.DeltaTemperature",
        wire_size: Some(ZeusDeltaTemperature::WIRE_SIZE),
        decode: Some(decode_into::<ZeusDeltaTemperature>),
    },
];

/// One registered network sub-command.
pub struct NetworkCommandDescriptor {
    pub command: u8,
    pub name: &'static str,
    /// `None` for reserved sub-commands.
    pub decode: Option<NetworkDecoder>,
}

fn decode_reset(class: NodeClass, data: &[u8]) -> Result<(Message, NodeId)> {
    let (request, node) = ResetRequest::decode(class, data)?;
    Ok((Message::Reset(request), node))
}

fn decode_id_change(class: NodeClass, data: &[u8]) -> Result<(Message, NodeId)> {
    let (request, node) = IdChangeRequest::decode(class, data)?;
    Ok((Message::IdChange(request), node))
}

fn decode_error_report(_class: NodeClass, data: &[u8]) -> Result<(Message, NodeId)> {
    let (report, node) = ErrorReport::decode(data)?;
    Ok((Message::ErrorReport(report), node))
}

fn decode_heartbeat_request(class: NodeClass, data: &[u8]) -> Result<(Message, NodeId)> {
    let (request, node) = HeartBeatRequest::decode(class, data)?;
    Ok((Message::HeartBeatRequest(request), node))
}

/// The network-control sub-command table.
pub static NETWORK_COMMANDS: &[NetworkCommandDescriptor] = &[
    NetworkCommandDescriptor {
        command: 0x00,
        name: "Reset",
        decode: Some(decode_reset),
    },
    NetworkCommandDescriptor {
        command: 0x01,
        name: "Synchronisation",
        decode: None,
    },
    NetworkCommandDescriptor {
        command: 0x02,
        name: "IDChange",
        decode: Some(decode_id_change),
    },
    NetworkCommandDescriptor {
        command: 0x03,
        name: "ErrorReport",
        decode: Some(decode_error_report),
    },
    NetworkCommandDescriptor {
        command: 0x07,
        name: "HeartBeatRequest",
        decode: Some(decode_heartbeat_request),
    },
];

/// 64-slot lookup index over [`MESSAGES`], built once on first use.
static MESSAGE_INDEX: Lazy<[Option<&'static MessageDescriptor>; 64]> = Lazy::new(|| {
    let mut index = [None; 64];
    for descriptor in MESSAGES {
        index[descriptor.class.0 as usize & 0x3f] = Some(descriptor);
    }
    index
});

/// 8-slot lookup index over [`NETWORK_COMMANDS`].
static NETWORK_INDEX: Lazy<[Option<&'static NetworkCommandDescriptor>; 8]> = Lazy::new(|| {
    let mut index = [None; 8];
    for descriptor in NETWORK_COMMANDS {
        index[descriptor.command as usize & 0x07] = Some(descriptor);
    }
    index
});

/// Look up the descriptor registered for a message class.
pub fn lookup(class: MessageClass) -> Option<&'static MessageDescriptor> {
    MESSAGE_INDEX[class.0 as usize & 0x3f]
}

/// Stable display name of a message class, `"<unknown>"` if unregistered.
pub fn class_name(class: MessageClass) -> &'static str {
    lookup(class).map(|d| d.name).unwrap_or("<unknown>")
}

/// Inverse name lookup, case-insensitive.
pub fn class_by_name(name: &str) -> Option<MessageClass> {
    MESSAGES
        .iter()
        .find(|d| d.name.eq_ignore_ascii_case(name))
        .map(|d| d.class)
}

// ============================================================================
// Dispatch
// ============================================================================

fn parse_rtr(id: CanIdentifier, data: &[u8]) -> Result<(Message, NodeId)> {
    if !data.is_empty() {
        return Err(ProtocolError::InvalidIdentifier {
            reason: "RTR frame with a payload",
        });
    }
    if !id.message_type.is_data() {
        return Err(ProtocolError::InvalidIdentifier {
            reason: "Unauthorized network command RTR frame",
        });
    }
    if lookup(id.class).and_then(|d| d.decode).is_none() {
        return Err(ProtocolError::UnknownClass { class: id.class.0 });
    }
    Ok((
        Message::Request(MessageRequest {
            class: id.class,
            id: id.node,
        }),
        id.node,
    ))
}

/// Classify and decode a received frame.
///
/// Returns the decoded message together with the node it concerns: the
/// sender for data and heartbeat frames, the addressed node for network
/// commands and RTR polls.
pub fn parse_frame(frame: &CanFrame) -> Result<(Message, NodeId)> {
    if frame.extended {
        return Err(ProtocolError::InvalidIdentifier {
            reason: "Extended identifiers are not supported",
        });
    }

    let id = frame.identifier();

    if frame.rtr {
        return parse_rtr(id, frame.data());
    }

    match id.message_type {
        MessageType::NetworkControlCommand => {
            let decode = NETWORK_INDEX[id.node.0 as usize & 0x07]
                .and_then(|d| d.decode)
                .ok_or(ProtocolError::UnknownNetworkCommand {
                    command: id.node.0,
                })?;
            decode(NodeClass(id.class.0), frame.data())
        }
        MessageType::HeartBeat => {
            let heartbeat = HeartBeat::decode(NodeClass(id.class.0), id.node, frame.data())?;
            Ok((Message::HeartBeat(heartbeat), id.node))
        }
        MessageType::StandardMessage | MessageType::HighPriorityMessage => {
            let decode = lookup(id.class)
                .and_then(|d| d.decode)
                .ok_or(ProtocolError::UnknownClass { class: id.class.0 })?;
            let message = decode(frame.data()).map_err(ProtocolError::malformed)?;
            Ok((message, id.node))
        }
    }
}

/// Build the data frame carrying `message` for `node`.
///
/// `high_priority` selects the high-priority arbitration lane.
pub fn encode_frame<M: WireMessage>(
    message: &M,
    high_priority: bool,
    node: NodeId,
) -> Result<CanFrame> {
    node.check()?;
    let message_type = if high_priority {
        MessageType::HighPriorityMessage
    } else {
        MessageType::StandardMessage
    };
    let mut buf = [0u8; 8];
    let written = message.encode(&mut buf)?;
    Ok(CanFrame::data_frame(
        CanIdentifier::new(message_type, M::CLASS, node),
        &buf[..written],
    ))
}

/// Build the RTR poll soliciting the current value of `class` from `node`.
pub fn request_frame(class: MessageClass, node: NodeId) -> Result<CanFrame> {
    node.check()?;
    if lookup(class).and_then(|d| d.decode).is_none() {
        return Err(ProtocolError::UnknownClass { class: class.0 });
    }
    Ok(CanFrame::remote_frame(CanIdentifier::new(
        MessageType::StandardMessage,
        class,
        node,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{FanStatusAndRpm, PdConfig, WaterLevelStatus, ZeusStatusValue};
    use crate::network::FirmwareVersion;
    use std::time::Duration;

    fn data_frame(
        message_type: MessageType,
        class: MessageClass,
        node: u8,
        data: &[u8],
    ) -> CanFrame {
        CanFrame::data_frame(CanIdentifier::new(message_type, class, NodeId(node)), data)
    }

    #[test]
    fn test_parse_matrix() {
        use MessageType::*;

        let testdata: Vec<(CanFrame, u8, Message)> = vec![
            (
                data_frame(HeartBeat, MessageClass(NodeClass::ZEUS.0), 2, &[]),
                2,
                Message::HeartBeat(crate::network::HeartBeat {
                    class: NodeClass::ZEUS,
                    id: NodeId(2),
                    version: FirmwareVersion::default(),
                }),
            ),
            (
                data_frame(
                    HeartBeat,
                    MessageClass(NodeClass::CELAENO.0),
                    4,
                    &[1, 2, 3, 4],
                ),
                4,
                Message::HeartBeat(crate::network::HeartBeat {
                    class: NodeClass::CELAENO,
                    id: NodeId(4),
                    version: FirmwareVersion::new(1, 2, 3, 4),
                }),
            ),
            (
                data_frame(NetworkControlCommand, MessageClass(NodeClass::ZEUS.0), 7, &[]),
                0,
                Message::HeartBeatRequest(HeartBeatRequest {
                    class: NodeClass::ZEUS,
                    period: None,
                }),
            ),
            (
                data_frame(
                    NetworkControlCommand,
                    MessageClass(NodeClass::ZEUS.0),
                    7,
                    &[0xe8, 0x03],
                ),
                0,
                Message::HeartBeatRequest(HeartBeatRequest {
                    class: NodeClass::ZEUS,
                    period: Some(Duration::from_secs(1)),
                }),
            ),
            (
                data_frame(NetworkControlCommand, MessageClass(0), 0, &[0x00]),
                0,
                Message::Reset(ResetRequest {
                    class: NodeClass::BROADCAST,
                    id: NodeId::BROADCAST,
                }),
            ),
            (
                data_frame(
                    NetworkControlCommand,
                    MessageClass(NodeClass::HELIOS.0),
                    2,
                    &[0x01, 0x02],
                ),
                1,
                Message::IdChange(IdChangeRequest {
                    class: NodeClass::HELIOS,
                    old_id: NodeId(1),
                    new_id: NodeId(2),
                }),
            ),
            (
                data_frame(
                    NetworkControlCommand,
                    MessageClass(0),
                    3,
                    &[NodeClass::ZEUS.0, 3, 0x42, 0x00],
                ),
                3,
                Message::ErrorReport(ErrorReport {
                    class: NodeClass::ZEUS,
                    id: NodeId(3),
                    error_code: 0x0042,
                }),
            ),
            (
                data_frame(StandardMessage, MessageClass::ZEUS_SET_POINT, 2, &[0; 5]),
                2,
                Message::ZeusSetPoint(ZeusSetPoint {
                    humidity: 0.0,
                    temperature: -40.0,
                    wind: 0,
                }),
            ),
            (
                data_frame(StandardMessage, MessageClass::ZEUS_REPORT, 3, &[0; 8]),
                3,
                Message::ZeusReport(ZeusReport {
                    humidity: 0.0,
                    temperature: [-40.0, 0.0, 0.0, 0.0],
                }),
            ),
            (
                data_frame(StandardMessage, MessageClass::ZEUS_CONFIG, 4, &[0; 8]),
                4,
                Message::ZeusConfig(ZeusConfig {
                    humidity: PdConfig::default(),
                    temperature: PdConfig::default(),
                }),
            ),
            (
                data_frame(StandardMessage, MessageClass::ZEUS_STATUS, 5, &[0; 7]),
                5,
                Message::ZeusStatus(ZeusStatus {
                    status: ZeusStatusValue::IDLE,
                    fans: [FanStatusAndRpm(0); 3],
                }),
            ),
            (
                data_frame(
                    StandardMessage,
                    MessageClass::ZEUS_CONTROL_POINT,
                    6,
                    &[2, 0, 3, 0],
                ),
                6,
                Message::ZeusControlPoint(ZeusControlPoint {
                    humidity: 2,
                    temperature: 3,
                }),
            ),
            (
                data_frame(
                    StandardMessage,
                    MessageClass::ZEUS_DELTA_TEMPERATURE,
                    7,
                    &[0; 8],
                ),
                7,
                Message::ZeusDeltaTemperature(ZeusDeltaTemperature { delta: [0.0; 4] }),
            ),
            (
                data_frame(
                    StandardMessage,
                    MessageClass::HELIOS_SET_POINT,
                    1,
                    &[0x7f, 0xff],
                ),
                1,
                Message::HeliosSetPoint(HeliosSetPoint {
                    visible: 127,
                    uv: 255,
                }),
            ),
            (
                data_frame(StandardMessage, MessageClass::CELAENO_SET_POINT, 1, &[0x7f]),
                1,
                Message::CelaenoSetPoint(CelaenoSetPoint { power: 127 }),
            ),
            (
                data_frame(
                    StandardMessage,
                    MessageClass::CELAENO_STATUS,
                    2,
                    &[0x06, 0x00, 0x00],
                ),
                2,
                Message::CelaenoStatus(CelaenoStatus {
                    water_level: WaterLevelStatus::READ_ERROR,
                    fan: FanStatusAndRpm(0),
                }),
            ),
            (
                data_frame(
                    StandardMessage,
                    MessageClass::CELAENO_CONFIG,
                    4,
                    &[0xe8, 0x03, 0xe8, 0x03, 0xe8, 0x03, 0xe8, 0x03],
                ),
                4,
                Message::CelaenoConfig(CelaenoConfig {
                    ramp_up_time: Duration::from_secs(1),
                    ramp_down_time: Duration::from_secs(1),
                    minimum_on_time: Duration::from_secs(1),
                    debounce_time: Duration::from_secs(1),
                }),
            ),
            (
                data_frame(StandardMessage, MessageClass::NOTUS_SET_POINT, 1, &[0x55]),
                1,
                Message::NotusSetPoint(NotusSetPoint { power: 85 }),
            ),
            (
                CanFrame::remote_frame(CanIdentifier::new(
                    StandardMessage,
                    MessageClass::CELAENO_CONFIG,
                    NodeId(5),
                )),
                5,
                Message::Request(MessageRequest {
                    class: MessageClass::CELAENO_CONFIG,
                    id: NodeId(5),
                }),
            ),
        ];

        for (frame, node, expected) in testdata {
            let (message, id) = parse_frame(&frame)
                .unwrap_or_else(|e| panic!("parsing {frame:?} failed: {e}"));
            assert_eq!(id.0, node);
            assert_eq!(message, expected);
        }
    }

    #[test]
    fn test_parse_errors() {
        use MessageType::*;

        let extended = CanFrame::from_raw(0x123, true, false, &[]);
        let rtr_with_payload = CanFrame::from_raw(
            CanIdentifier::new(StandardMessage, MessageClass::ZEUS_REPORT, NodeId(1)).encode(),
            false,
            true,
            &[0x00],
        );

        let testdata: Vec<(CanFrame, &str)> = vec![
            (extended, "Extended identifiers are not supported"),
            (rtr_with_payload, "RTR frame with a payload"),
            (
                CanFrame::remote_frame(CanIdentifier::new(
                    NetworkControlCommand,
                    MessageClass(0),
                    NodeId(0),
                )),
                "Unauthorized network command RTR frame",
            ),
            (
                data_frame(NetworkControlCommand, MessageClass(0), 6, &[]),
                "Unknown network command 0x06",
            ),
            (
                // Synchronisation is reserved: named but not decodable.
                data_frame(NetworkControlCommand, MessageClass(0), 1, &[]),
                "Unknown network command 0x01",
            ),
            (
                data_frame(HeartBeat, MessageClass(NodeClass::ZEUS.0), 1, &[0]),
                "Invalid buffer size 1 (min 2 required)",
            ),
            (
                data_frame(StandardMessage, MessageClass(0), 1, &[0]),
                "Unknown message type 0x00",
            ),
            (
                data_frame(StandardMessage, MessageClass::ZEUS_VIBRATION_REPORT, 1, &[]),
                "Unknown message type 0x3a",
            ),
            (
                CanFrame::remote_frame(CanIdentifier::new(
                    StandardMessage,
                    MessageClass(0),
                    NodeId(1),
                )),
                "Unknown message type 0x00",
            ),
            (
                data_frame(StandardMessage, MessageClass::ZEUS_REPORT, 1, &[0]),
                "Could not parse message data: Invalid buffer size 1, required: 8",
            ),
        ];

        for (frame, expected) in testdata {
            assert_eq!(
                parse_frame(&frame).unwrap_err().to_string(),
                expected,
                "frame {frame:?}"
            );
        }
    }

    #[test]
    fn test_encode_frame() {
        let frame = encode_frame(
            &ZeusSetPoint {
                humidity: 42.0,
                temperature: 25.0,
                wind: 127,
            },
            false,
            NodeId(3),
        )
        .unwrap();
        assert_eq!(frame.data(), &[0xe0, 0x1a, 0x35, 0x19, 0x7f]);
        let id = frame.identifier();
        assert_eq!(id.message_type, MessageType::StandardMessage);
        assert_eq!(id.class, MessageClass::ZEUS_SET_POINT);
        assert_eq!(id.node, NodeId(3));

        let high = encode_frame(&CelaenoSetPoint { power: 1 }, true, NodeId(1)).unwrap();
        assert_eq!(
            high.identifier().message_type,
            MessageType::HighPriorityMessage
        );

        assert_eq!(
            encode_frame(&CelaenoSetPoint { power: 1 }, false, NodeId(8)),
            Err(ProtocolError::InvalidNodeId { id: 8 })
        );
    }

    #[test]
    fn test_request_frame() {
        let frame = request_frame(MessageClass::ZEUS_REPORT, NodeId(2)).unwrap();
        assert!(frame.rtr);
        assert!(frame.is_empty());
        let (message, node) = parse_frame(&frame).unwrap();
        assert_eq!(node, NodeId(2));
        assert_eq!(
            message,
            Message::Request(MessageRequest {
                class: MessageClass::ZEUS_REPORT,
                id: NodeId(2),
            })
        );

        assert_eq!(
            request_frame(MessageClass(0x00), NodeId(1)),
            Err(ProtocolError::UnknownClass { class: 0 })
        );
        assert_eq!(
            request_frame(MessageClass::ZEUS_VIBRATION_REPORT, NodeId(1)),
            Err(ProtocolError::UnknownClass { class: 0x3a })
        );
    }

    #[test]
    fn test_class_names() {
        let testdata = [
            (MessageClass::ZEUS_SET_POINT, "Zeus.SetPoint"),
            (MessageClass::ZEUS_REPORT, "Zeus.Report"),
            (MessageClass::ZEUS_VIBRATION_REPORT, "Zeus.VibrationReport"),
            (MessageClass::ZEUS_CONFIG, "Zeus.Config"),
            (MessageClass::ZEUS_STATUS, "Zeus.Status"),
            (MessageClass::ZEUS_CONTROL_POINT, "Zeus.ControlPoint"),
            (MessageClass::ZEUS_DELTA_TEMPERATURE, "Zeus.DeltaTemperature"),
            (MessageClass::HELIOS_SET_POINT, "Helios.SetPoint"),
            (MessageClass::HELIOS_PULSE_MODE, "Helios.PulseMode"),
            (MessageClass::HELIOS_TRIGGER_MODE, "Helios.TriggerMode"),
            (MessageClass::CELAENO_SET_POINT, "Celaeno.SetPoint"),
            (MessageClass::CELAENO_STATUS, "Celaeno.Status"),
            (MessageClass::CELAENO_CONFIG, "Celaeno.Config"),
            (MessageClass::NOTUS_SET_POINT, "Notus.SetPoint"),
            (MessageClass::NOTUS_CONFIG, "Notus.Config"),
            (MessageClass(0), "<unknown>"),
        ];
        for (class, expected) in testdata {
            assert_eq!(class.to_string(), expected);
        }

        assert_eq!(
            class_by_name("zeus.setpoint"),
            Some(MessageClass::ZEUS_SET_POINT)
        );
        assert_eq!(class_by_name("nothing"), None);
    }

    #[test]
    fn test_roundtrip_through_frames() {
        let original = ZeusConfig {
            humidity: PdConfig {
                proportional_multiplier: 100,
                derivative_multiplier: 50,
                integral_multiplier: 1,
                proportional_derivative_divider: 6,
                integral_divider: 2,
            },
            temperature: PdConfig {
                proportional_multiplier: 103,
                derivative_multiplier: 102,
                integral_multiplier: 0,
                proportional_derivative_divider: 4,
                integral_divider: 14,
            },
        };
        let frame = encode_frame(&original, false, NodeId(1)).unwrap();
        let (message, _) = parse_frame(&frame).unwrap();
        assert_eq!(message, Message::ZeusConfig(original));
    }
}
