//! Illumination unit (Helios) messages.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::{ProtocolError, Result};
use crate::core::identifier::MessageClass;
use crate::messages::{duration_to_centimillis, duration_to_micros, duration_to_millis, WireMessage};

/// Light intensity targets, raw 8-bit actuator values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeliosSetPoint {
    pub visible: u8,
    pub uv: u8,
}

impl WireMessage for HeliosSetPoint {
    const CLASS: MessageClass = MessageClass::HELIOS_SET_POINT;
    const WIRE_SIZE: usize = 2;

    fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        ProtocolError::check_size(buf, Self::WIRE_SIZE)?;
        buf[0] = self.visible;
        buf[1] = self.uv;
        Ok(Self::WIRE_SIZE)
    }

    fn decode(buf: &[u8]) -> Result<Self> {
        ProtocolError::check_size(buf, Self::WIRE_SIZE)?;
        Ok(Self {
            visible: buf[0],
            uv: buf[1],
        })
    }
}

impl std::fmt::Display for HeliosSetPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Helios.SetPoint{{Visible: {}, UV: {}}}",
            self.visible, self.uv
        )
    }
}

/// Strobe period for the pulsed illumination mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeliosPulseMode {
    /// Pulse period; whole milliseconds on the wire.
    pub period: Duration,
}

impl WireMessage for HeliosPulseMode {
    const CLASS: MessageClass = MessageClass::HELIOS_PULSE_MODE;
    const WIRE_SIZE: usize = 2;

    fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        ProtocolError::check_size(buf, Self::WIRE_SIZE)?;
        let period = duration_to_millis(self.period)?;
        buf[0..2].copy_from_slice(&period.to_le_bytes());
        Ok(Self::WIRE_SIZE)
    }

    fn decode(buf: &[u8]) -> Result<Self> {
        ProtocolError::check_size(buf, Self::WIRE_SIZE)?;
        Ok(Self {
            period: Duration::from_millis(u16::from_le_bytes([buf[0], buf[1]]) as u64),
        })
    }
}

impl std::fmt::Display for HeliosPulseMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Helios.PulseMode{{Period: {:?}}}", self.period)
    }
}

/// Camera-synchronised trigger mode.
///
/// The period field counts 100 µs ticks on the wire; pulse length counts
/// microseconds. The camera delay shifts the exposure trigger relative to
/// the light pulse; negative values fire the camera first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeliosTriggerMode {
    pub period: Duration,
    pub pulse_length: Duration,
    /// Signed trigger offset in microseconds.
    pub camera_delay_us: i16,
}

impl WireMessage for HeliosTriggerMode {
    const CLASS: MessageClass = MessageClass::HELIOS_TRIGGER_MODE;
    const WIRE_SIZE: usize = 6;

    fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        ProtocolError::check_size(buf, Self::WIRE_SIZE)?;
        let period = duration_to_centimillis(self.period)?;
        let pulse_length = duration_to_micros(self.pulse_length)?;
        let mut scratch = [0u8; Self::WIRE_SIZE];
        scratch[0..2].copy_from_slice(&period.to_le_bytes());
        scratch[2..4].copy_from_slice(&pulse_length.to_le_bytes());
        scratch[4..6].copy_from_slice(&self.camera_delay_us.to_le_bytes());
        buf[..Self::WIRE_SIZE].copy_from_slice(&scratch);
        Ok(Self::WIRE_SIZE)
    }

    fn decode(buf: &[u8]) -> Result<Self> {
        ProtocolError::check_size(buf, Self::WIRE_SIZE)?;
        Ok(Self {
            period: Duration::from_micros(u16::from_le_bytes([buf[0], buf[1]]) as u64 * 100),
            pulse_length: Duration::from_micros(u16::from_le_bytes([buf[2], buf[3]]) as u64),
            camera_delay_us: i16::from_le_bytes([buf[4], buf[5]]),
        })
    }
}

impl std::fmt::Display for HeliosTriggerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Helios.TriggerMode{{Period: {:?}, PulseLength: {:?}, CameraDelay: {}µs}}",
            self.period, self.pulse_length, self.camera_delay_us
        )
    }
}
