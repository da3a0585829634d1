//! Heater (Notus) messages.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::{ProtocolError, Result};
use crate::core::identifier::MessageClass;
use crate::messages::{duration_to_millis, WireMessage};

/// Heating power target, raw 8-bit actuator value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotusSetPoint {
    pub power: u8,
}

impl WireMessage for NotusSetPoint {
    const CLASS: MessageClass = MessageClass::NOTUS_SET_POINT;
    const WIRE_SIZE: usize = 1;

    fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        ProtocolError::check_size(buf, Self::WIRE_SIZE)?;
        buf[0] = self.power;
        Ok(Self::WIRE_SIZE)
    }

    fn decode(buf: &[u8]) -> Result<Self> {
        ProtocolError::check_size(buf, Self::WIRE_SIZE)?;
        Ok(Self { power: buf[0] })
    }
}

impl std::fmt::Display for NotusSetPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Notus.SetPoint{{Power: {}}}", self.power)
    }
}

/// Heater safety limits and fan floor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotusConfig {
    /// Power ramp-down time; whole milliseconds on the wire.
    pub ramp_down_time: Duration,
    /// Minimum fan drive while heating.
    pub min_fan: u8,
    /// Maximum heater drive.
    pub max_heat: u8,
}

impl WireMessage for NotusConfig {
    const CLASS: MessageClass = MessageClass::NOTUS_CONFIG;
    const WIRE_SIZE: usize = 4;

    fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        ProtocolError::check_size(buf, Self::WIRE_SIZE)?;
        let ramp_down = duration_to_millis(self.ramp_down_time)?;
        let mut scratch = [0u8; Self::WIRE_SIZE];
        scratch[0..2].copy_from_slice(&ramp_down.to_le_bytes());
        scratch[2] = self.min_fan;
        scratch[3] = self.max_heat;
        buf[..Self::WIRE_SIZE].copy_from_slice(&scratch);
        Ok(Self::WIRE_SIZE)
    }

    fn decode(buf: &[u8]) -> Result<Self> {
        ProtocolError::check_size(buf, Self::WIRE_SIZE)?;
        Ok(Self {
            ramp_down_time: Duration::from_millis(u16::from_le_bytes([buf[0], buf[1]]) as u64),
            min_fan: buf[2],
            max_heat: buf[3],
        })
    }
}

impl std::fmt::Display for NotusConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Notus.Config{{RampDownTime: {:?}, MinFan: {}, MaxHeat: {}}}",
            self.ramp_down_time, self.min_fan, self.max_heat
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::testutil::{check_encoding, check_length};

    #[test]
    fn test_set_point_io() {
        check_encoding(&NotusSetPoint { power: 85 }, &[0x55]);
        check_length(&NotusSetPoint::default());
    }

    #[test]
    fn test_config_io() {
        check_encoding(
            &NotusConfig {
                ramp_down_time: Duration::from_secs(2),
                min_fan: 33,
                max_heat: 211,
            },
            &[0xd0, 0x07, 0x21, 0xd3],
        );
        check_length(&NotusConfig::default());

        let mut buf = [0u8; 4];
        let overflowing = NotusConfig {
            ramp_down_time: Duration::from_millis(1 << 16),
            ..Default::default()
        };
        assert_eq!(
            overflowing.encode(&mut buf).unwrap_err().to_string(),
            "Time constant overflow"
        );
    }

    #[test]
    fn test_display() {
        let config = NotusConfig {
            ramp_down_time: Duration::from_secs(2),
            min_fan: 33,
            max_heat: 211,
        };
        assert_eq!(
            config.to_string(),
            "Notus.Config{RampDownTime: 2s, MinFan: 33, MaxHeat: 211}"
        );
    }
}
