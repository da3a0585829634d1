//! Device message payloads.
//!
//! One codec pair per message class of the two data lanes. Every payload has
//! a fixed wire length; encoding writes exactly that many bytes or fails,
//! decoding rejects anything shorter. Encoding is atomic: payloads are built
//! in a stack scratch buffer and copied out only on success, so a failed
//! encode never leaves partial bytes in the caller's buffer.

pub mod celaeno;
pub mod fan;
pub mod helios;
pub mod notus;
pub mod pd;
pub mod zeus;

pub use celaeno::{CelaenoConfig, CelaenoSetPoint, CelaenoStatus, WaterLevelStatus};
pub use fan::{FanStatus, FanStatusAndRpm};
pub use helios::{HeliosPulseMode, HeliosSetPoint, HeliosTriggerMode};
pub use notus::{NotusConfig, NotusSetPoint};
pub use pd::PdConfig;
pub use zeus::{
    ZeusConfig, ZeusControlPoint, ZeusDeltaTemperature, ZeusReport, ZeusSetPoint, ZeusStatus,
    ZeusStatusValue,
};

use std::time::Duration;

use crate::core::error::{ProtocolError, Result};
use crate::core::identifier::MessageClass;

/// A payload that travels on the standard or high-priority data lane.
///
/// Implementations own exactly the fields of their wire representation and
/// are plain value types; encode/decode are pure and allocation-free.
pub trait WireMessage: Sized {
    /// Message class the payload travels under.
    const CLASS: MessageClass;

    /// Fixed wire length in bytes.
    const WIRE_SIZE: usize;

    /// Serialize into `buf`, returning the number of bytes written.
    ///
    /// Fails with `BufferTooSmall` if `buf` is shorter than
    /// [`WIRE_SIZE`](Self::WIRE_SIZE), and leaves `buf` untouched on any
    /// failure.
    fn encode(&self, buf: &mut [u8]) -> Result<usize>;

    /// Deserialize from `buf`, which must hold at least
    /// [`WIRE_SIZE`](Self::WIRE_SIZE) bytes.
    fn decode(buf: &[u8]) -> Result<Self>;
}

/// Cast a duration to whole milliseconds on the wire.
pub(crate) fn duration_to_millis(duration: Duration) -> Result<u16> {
    let millis = duration.as_millis();
    if millis > u16::MAX as u128 {
        return Err(ProtocolError::RangeOverflow {
            field: "Time constant",
        });
    }
    Ok(millis as u16)
}

/// Cast a duration to whole microseconds on the wire.
pub(crate) fn duration_to_micros(duration: Duration) -> Result<u16> {
    let micros = duration.as_micros();
    if micros > u16::MAX as u128 {
        return Err(ProtocolError::RangeOverflow {
            field: "Time constant",
        });
    }
    Ok(micros as u16)
}

/// Cast a duration to the 100 µs ticks of the trigger period field.
pub(crate) fn duration_to_centimillis(duration: Duration) -> Result<u16> {
    let ticks = duration.as_micros() / 100;
    if ticks > u16::MAX as u128 {
        return Err(ProtocolError::RangeOverflow {
            field: "Time constant",
        });
    }
    Ok(ticks as u16)
}

#[cfg(test)]
pub(crate) mod testutil {
    use super::WireMessage;

    /// Encode `message`, compare against `wire`, then decode `wire` and
    /// compare against `message`.
    pub fn check_encoding<M>(message: &M, wire: &[u8])
    where
        M: WireMessage + PartialEq + std::fmt::Debug,
    {
        assert_eq!(wire.len(), M::WIRE_SIZE);

        let mut buf = [0xffu8; 8];
        let written = message.encode(&mut buf[..wire.len()]).unwrap();
        assert_eq!(written, wire.len());
        assert_eq!(&buf[..written], wire);

        let decoded = M::decode(wire).unwrap();
        assert_eq!(&decoded, message);
    }

    /// Both directions must reject an empty buffer with the canonical
    /// size-mismatch diagnostic.
    pub fn check_length<M>(message: &M)
    where
        M: WireMessage + std::fmt::Debug,
    {
        let expected = format!("Invalid buffer size 0, required: {}", M::WIRE_SIZE);
        let mut empty: [u8; 0] = [];
        assert_eq!(message.encode(&mut empty).unwrap_err().to_string(), expected);
        assert_eq!(M::decode(&[]).unwrap_err().to_string(), expected);
    }

    /// Floating point fields survive the wire within `bound`.
    pub fn assert_almost_eq(obtained: f32, expected: f32, bound: f32) {
        assert!(
            (obtained - expected).abs() <= bound,
            "{obtained} != {expected} (within {bound})"
        );
    }
}
