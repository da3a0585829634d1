//! Humidifier (Celaeno) messages.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::{ProtocolError, Result};
use crate::core::identifier::MessageClass;
use crate::messages::fan::FanStatusAndRpm;
use crate::messages::{duration_to_millis, WireMessage};

/// Fogging power target, raw 8-bit actuator value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CelaenoSetPoint {
    pub power: u8,
}

impl WireMessage for CelaenoSetPoint {
    const CLASS: MessageClass = MessageClass::CELAENO_SET_POINT;
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

impl std::fmt::Display for CelaenoSetPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Celaeno.SetPoint{{Power: {}}}", self.power)
    }
}

/// Water tank level flags.
///
/// Read-error and critical dominate when several bits are set; decoding
/// already collapses the flags in that priority order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WaterLevelStatus(pub u8);

impl WaterLevelStatus {
    pub const NOMINAL: WaterLevelStatus = WaterLevelStatus(0x00);
    pub const WARNING: WaterLevelStatus = WaterLevelStatus(0x01);
    pub const CRITICAL: WaterLevelStatus = WaterLevelStatus(0x02);
    pub const READ_ERROR: WaterLevelStatus = WaterLevelStatus(0x04);

    pub const fn contains(self, flag: WaterLevelStatus) -> bool {
        self.0 & flag.0 != 0
    }

    /// Collapse raw wire flags, read-error winning over critical.
    pub(crate) fn from_wire(raw: u8) -> Self {
        if raw & Self::READ_ERROR.0 != 0 {
            Self::READ_ERROR
        } else if raw & Self::CRITICAL.0 != 0 {
            Self::CRITICAL
        } else {
            Self(raw)
        }
    }
}

impl std::ops::BitOr for WaterLevelStatus {
    type Output = WaterLevelStatus;

    fn bitor(self, rhs: WaterLevelStatus) -> WaterLevelStatus {
        WaterLevelStatus(self.0 | rhs.0)
    }
}

impl std::fmt::Display for WaterLevelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if *self == Self::READ_ERROR {
            return f.write_str("readout-error");
        }
        let prefix = if self.contains(Self::READ_ERROR) {
            "readout-error|"
        } else {
            ""
        };
        if self.contains(Self::CRITICAL) {
            write!(f, "{prefix}critical")
        } else if self.contains(Self::WARNING) {
            write!(f, "{prefix}warning")
        } else {
            write!(f, "{prefix}nominal")
        }
    }
}

/// Humidifier status: water level plus the fog fan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CelaenoStatus {
    pub water_level: WaterLevelStatus,
    pub fan: FanStatusAndRpm,
}

impl WireMessage for CelaenoStatus {
    const CLASS: MessageClass = MessageClass::CELAENO_STATUS;
    const WIRE_SIZE: usize = 3;

    fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        ProtocolError::check_size(buf, Self::WIRE_SIZE)?;
        let mut scratch = [0u8; Self::WIRE_SIZE];
        scratch[0] = self.water_level.0;
        scratch[1..3].copy_from_slice(&self.fan.0.to_le_bytes());
        buf[..Self::WIRE_SIZE].copy_from_slice(&scratch);
        Ok(Self::WIRE_SIZE)
    }

    fn decode(buf: &[u8]) -> Result<Self> {
        ProtocolError::check_size(buf, Self::WIRE_SIZE)?;
        Ok(Self {
            water_level: WaterLevelStatus::from_wire(buf[0]),
            fan: FanStatusAndRpm(u16::from_le_bytes([buf[1], buf[2]])),
        })
    }
}

impl std::fmt::Display for CelaenoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Celaeno.Status{{WaterLevel: {}, Fan:{}}}",
            self.water_level, self.fan
        )
    }
}

/// Fogging ramp timings, whole milliseconds on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CelaenoConfig {
    pub ramp_up_time: Duration,
    pub ramp_down_time: Duration,
    pub minimum_on_time: Duration,
    pub debounce_time: Duration,
}

impl WireMessage for CelaenoConfig {
    const CLASS: MessageClass = MessageClass::CELAENO_CONFIG;
    const WIRE_SIZE: usize = 8;

    fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        ProtocolError::check_size(buf, Self::WIRE_SIZE)?;
        let mut scratch = [0u8; Self::WIRE_SIZE];
        let durations = [
            self.ramp_up_time,
            self.ramp_down_time,
            self.minimum_on_time,
            self.debounce_time,
        ];
        for (chunk, duration) in scratch.chunks_exact_mut(2).zip(durations) {
            chunk.copy_from_slice(&duration_to_millis(duration)?.to_le_bytes());
        }
        buf[..Self::WIRE_SIZE].copy_from_slice(&scratch);
        Ok(Self::WIRE_SIZE)
    }

    fn decode(buf: &[u8]) -> Result<Self> {
        ProtocolError::check_size(buf, Self::WIRE_SIZE)?;
        let millis =
            |lo: u8, hi: u8| Duration::from_millis(u16::from_le_bytes([lo, hi]) as u64);
        Ok(Self {
            ramp_up_time: millis(buf[0], buf[1]),
            ramp_down_time: millis(buf[2], buf[3]),
            minimum_on_time: millis(buf[4], buf[5]),
            debounce_time: millis(buf[6], buf[7]),
        })
    }
}

impl std::fmt::Display for CelaenoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Celaeno.Config{{RampUp: {:?}, RampDown: {:?}, MinimumOn: {:?}, Debounce: {:?}}}",
            self.ramp_up_time, self.ramp_down_time, self.minimum_on_time, self.debounce_time
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::testutil::{check_encoding, check_length};

    #[test]
    fn test_set_point_io() {
        check_encoding(&CelaenoSetPoint { power: 127 }, &[0x7f]);
        check_length(&CelaenoSetPoint::default());
    }

    #[test]
    fn test_status_io() {
        check_encoding(
            &CelaenoStatus {
                water_level: WaterLevelStatus::WARNING,
                fan: FanStatusAndRpm(1200),
            },
            &[0x01, 0xb0, 0x04],
        );
        check_length(&CelaenoStatus::default());

        // Read-error dominates whatever else is set.
        let decoded = CelaenoStatus::decode(&[0x06, 0x00, 0x00]).unwrap();
        assert_eq!(decoded.water_level, WaterLevelStatus::READ_ERROR);
        let decoded = CelaenoStatus::decode(&[0x02, 0x00, 0x00]).unwrap();
        assert_eq!(decoded.water_level, WaterLevelStatus::CRITICAL);
        let decoded = CelaenoStatus::decode(&[0x03, 0x00, 0x00]).unwrap();
        assert_eq!(decoded.water_level, WaterLevelStatus::CRITICAL);
    }

    #[test]
    fn test_water_level_display() {
        let testdata = [
            (WaterLevelStatus::NOMINAL, "nominal"),
            (WaterLevelStatus::READ_ERROR, "readout-error"),
            (
                WaterLevelStatus::READ_ERROR | WaterLevelStatus::WARNING,
                "readout-error|warning",
            ),
            (
                WaterLevelStatus::READ_ERROR
                    | WaterLevelStatus::CRITICAL
                    | WaterLevelStatus::WARNING,
                "readout-error|critical",
            ),
            (
                WaterLevelStatus::CRITICAL | WaterLevelStatus::WARNING,
                "critical",
            ),
        ];
        for (value, expected) in testdata {
            assert_eq!(value.to_string(), expected);
        }
    }

    #[test]
    fn test_config_io() {
        check_encoding(
            &CelaenoConfig {
                ramp_up_time: Duration::from_millis(200),
                ramp_down_time: Duration::from_millis(300),
                minimum_on_time: Duration::from_millis(400),
                debounce_time: Duration::from_millis(500),
            },
            &[0xc8, 0x00, 0x2c, 0x01, 0x90, 0x01, 0xf4, 0x01],
        );
        check_length(&CelaenoConfig::default());
    }

    #[test]
    fn test_config_overflow_is_atomic() {
        let overflowing = CelaenoConfig {
            ramp_down_time: Duration::from_millis(1 << 16),
            ..Default::default()
        };
        let mut buf = [0xaau8; 8];
        assert_eq!(
            overflowing.encode(&mut buf).unwrap_err().to_string(),
            "Time constant overflow"
        );
        // The first field was encodable, yet nothing may reach the buffer.
        assert_eq!(buf, [0xaau8; 8]);
    }

    #[test]
    fn test_display() {
        let config = CelaenoConfig {
            ramp_up_time: Duration::from_millis(500),
            ramp_down_time: Duration::from_millis(3500),
            minimum_on_time: Duration::from_secs(4),
            debounce_time: Duration::from_secs(1),
        };
        assert_eq!(
            config.to_string(),
            "Celaeno.Config{RampUp: 500ms, RampDown: 3.5s, MinimumOn: 4s, Debounce: 1s}"
        );
        assert_eq!(
            CelaenoStatus::default().to_string(),
            "Celaeno.Status{WaterLevel: nominal, Fan:{Status: OK, RPM: 0}}"
        );
    }
}
