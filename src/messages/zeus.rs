//! Climate controller (Zeus) messages.
//!
//! Zeus owns the densest payloads of the protocol, including the bit-packed
//! climate report whose fields cross byte boundaries. The packing helpers
//! are kept as small pure functions so every shift/mask pair can be tested
//! against the firmware layout in isolation.

use serde::{Deserialize, Serialize};

use crate::codec::conversion::{
    binary_to_hih6030_temperature, binary_to_humidity, binary_to_tmp1075,
    hih6030_temperature_to_binary, humidity_to_binary, tmp1075_to_binary,
};
use crate::core::error::{ProtocolError, Result};
use crate::core::identifier::MessageClass;
use crate::messages::fan::FanStatusAndRpm;
use crate::messages::pd::PdConfig;
use crate::messages::WireMessage;

/// Target climate requested from the controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ZeusSetPoint {
    /// Relative humidity in percent.
    pub humidity: f32,
    /// Temperature in degrees Celsius.
    pub temperature: f32,
    /// Wind power, raw 8-bit actuator value.
    pub wind: u8,
}

impl WireMessage for ZeusSetPoint {
    const CLASS: MessageClass = MessageClass::ZEUS_SET_POINT;
    const WIRE_SIZE: usize = 5;

    fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        ProtocolError::check_size(buf, Self::WIRE_SIZE)?;
        let mut scratch = [0u8; Self::WIRE_SIZE];
        scratch[0..2].copy_from_slice(&humidity_to_binary(self.humidity).to_le_bytes());
        scratch[2..4]
            .copy_from_slice(&hih6030_temperature_to_binary(self.temperature).to_le_bytes());
        scratch[4] = self.wind;
        buf[..Self::WIRE_SIZE].copy_from_slice(&scratch);
        Ok(Self::WIRE_SIZE)
    }

    fn decode(buf: &[u8]) -> Result<Self> {
        ProtocolError::check_size(buf, Self::WIRE_SIZE)?;
        let humidity = binary_to_humidity(u16::from_le_bytes([buf[0], buf[1]]));
        if humidity.is_nan() {
            return Err(ProtocolError::InvalidSensorValue { field: "humidity" });
        }
        let temperature = binary_to_hih6030_temperature(u16::from_le_bytes([buf[2], buf[3]]));
        if temperature.is_nan() {
            return Err(ProtocolError::InvalidSensorValue {
                field: "temperature",
            });
        }
        Ok(Self {
            humidity,
            temperature,
            wind: buf[4],
        })
    }
}

impl std::fmt::Display for ZeusSetPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Zeus.SetPoint{{Humidity: {:.2}%, Temperature: {:.2}°C, Wind: {}}}",
            self.humidity, self.temperature, self.wind
        )
    }
}

/// Pack the report fields into four little-endian words.
///
/// Layout (64 bits, no byte alignment):
///
/// ```text
/// bits  0-13  humidity          (14 bits)
/// bits 14-27  primary temp      (14 bits)
/// bits 28-39  auxiliary temp 1  (12 bits)
/// bits 40-51  auxiliary temp 2  (12 bits)
/// bits 52-63  auxiliary temp 3  (12 bits)
/// ```
fn pack_report(humidity: u16, temperatures: [u16; 4]) -> [u16; 4] {
    let [primary, aux1, aux2, aux3] = temperatures;
    [
        (humidity & 0x3fff) | (primary & 0x0003) << 14,
        (primary >> 2) & 0x0fff | (aux1 & 0x000f) << 12,
        (aux1 >> 4) & 0x00ff | (aux2 & 0x00ff) << 8,
        (aux2 >> 8) & 0x000f | (aux3 & 0x0fff) << 4,
    ]
}

/// Inverse of [`pack_report`].
fn unpack_report(words: [u16; 4]) -> (u16, [u16; 4]) {
    (
        words[0] & 0x3fff,
        [
            (words[0] >> 14) | (words[1] & 0x0fff) << 2,
            (words[1] >> 12) | (words[2] & 0x00ff) << 4,
            (words[2] >> 8) | (words[3] & 0x000f) << 8,
            (words[3] & 0xfff0) >> 4,
        ],
    )
}

/// Periodic climate report.
///
/// `temperature[0]` is the primary HIH6030 probe; elements 1-3 are the
/// TMP1075 auxiliary probes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ZeusReport {
    pub humidity: f32,
    pub temperature: [f32; 4],
}

impl WireMessage for ZeusReport {
    const CLASS: MessageClass = MessageClass::ZEUS_REPORT;
    const WIRE_SIZE: usize = 8;

    fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        ProtocolError::check_size(buf, Self::WIRE_SIZE)?;
        let words = pack_report(
            humidity_to_binary(self.humidity),
            [
                hih6030_temperature_to_binary(self.temperature[0]),
                tmp1075_to_binary(self.temperature[1]),
                tmp1075_to_binary(self.temperature[2]),
                tmp1075_to_binary(self.temperature[3]),
            ],
        );
        let mut scratch = [0u8; Self::WIRE_SIZE];
        for (chunk, word) in scratch.chunks_exact_mut(2).zip(words) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        buf[..Self::WIRE_SIZE].copy_from_slice(&scratch);
        Ok(Self::WIRE_SIZE)
    }

    fn decode(buf: &[u8]) -> Result<Self> {
        ProtocolError::check_size(buf, Self::WIRE_SIZE)?;
        let words = [
            u16::from_le_bytes([buf[0], buf[1]]),
            u16::from_le_bytes([buf[2], buf[3]]),
            u16::from_le_bytes([buf[4], buf[5]]),
            u16::from_le_bytes([buf[6], buf[7]]),
        ];
        let (humidity_bits, temperature_bits) = unpack_report(words);

        let humidity = binary_to_humidity(humidity_bits);
        if humidity.is_nan() {
            return Err(ProtocolError::InvalidSensorValue { field: "humidity" });
        }
        let primary = binary_to_hih6030_temperature(temperature_bits[0]);
        if primary.is_nan() {
            return Err(ProtocolError::InvalidSensorValue {
                field: "temperature",
            });
        }
        Ok(Self {
            humidity,
            temperature: [
                primary,
                binary_to_tmp1075(temperature_bits[1]),
                binary_to_tmp1075(temperature_bits[2]),
                binary_to_tmp1075(temperature_bits[3]),
            ],
        })
    }
}

impl std::fmt::Display for ZeusReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Zeus.Report{{Humidity: {:.2}%, Primary: {:.2}°C, Aux1: {:.2}°C, Aux2: {:.2}°C, Aux3: {:.2}°C}}",
            self.humidity,
            self.temperature[0],
            self.temperature[1],
            self.temperature[2],
            self.temperature[3],
        )
    }
}

/// Control-loop gains for both regulated quantities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZeusConfig {
    pub humidity: PdConfig,
    pub temperature: PdConfig,
}

impl WireMessage for ZeusConfig {
    const CLASS: MessageClass = MessageClass::ZEUS_CONFIG;
    const WIRE_SIZE: usize = 8;

    fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        ProtocolError::check_size(buf, Self::WIRE_SIZE)?;
        let humidity = self.humidity.pack()?;
        let temperature = self.temperature.pack()?;
        buf[0..4].copy_from_slice(&humidity);
        buf[4..8].copy_from_slice(&temperature);
        Ok(Self::WIRE_SIZE)
    }

    fn decode(buf: &[u8]) -> Result<Self> {
        ProtocolError::check_size(buf, Self::WIRE_SIZE)?;
        Ok(Self {
            humidity: PdConfig::unpack(&[buf[0], buf[1], buf[2], buf[3]]),
            temperature: PdConfig::unpack(&[buf[4], buf[5], buf[6], buf[7]]),
        })
    }
}

impl std::fmt::Display for ZeusConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Zeus.Config{{Humidity:{}, Temperature:{}}}",
            self.humidity, self.temperature
        )
    }
}

/// Status flag byte of [`ZeusStatus`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZeusStatusValue(pub u8);

impl ZeusStatusValue {
    /// No regulation running.
    pub const IDLE: ZeusStatusValue = ZeusStatusValue(0x00);
    /// Climate regulation active.
    pub const ACTIVE: ZeusStatusValue = ZeusStatusValue(1 << 0);
    /// The watchdog stopped regulation.
    pub const CLIMATE_UNCONTROLLED_WATCHDOG: ZeusStatusValue = ZeusStatusValue(1 << 1);
    /// The humidity target cannot be reached.
    pub const HUMIDITY_UNREACHABLE: ZeusStatusValue = ZeusStatusValue(1 << 2);
    /// The temperature target cannot be reached.
    pub const TEMPERATURE_UNREACHABLE: ZeusStatusValue = ZeusStatusValue(1 << 3);

    pub const fn contains(self, flag: ZeusStatusValue) -> bool {
        self.0 & flag.0 != 0
    }
}

impl std::ops::BitOr for ZeusStatusValue {
    type Output = ZeusStatusValue;

    fn bitor(self, rhs: ZeusStatusValue) -> ZeusStatusValue {
        ZeusStatusValue(self.0 | rhs.0)
    }
}

impl std::fmt::Display for ZeusStatusValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Watchdog firing while regulation reports active means the sensors
        // disagree with the controller.
        if *self == Self::ACTIVE | Self::CLIMATE_UNCONTROLLED_WATCHDOG {
            return f.write_str("sensor-issue");
        }
        let mut parts = Vec::with_capacity(4);
        if self.contains(Self::TEMPERATURE_UNREACHABLE) {
            parts.push("temperature-unreachable");
        }
        if self.contains(Self::HUMIDITY_UNREACHABLE) {
            parts.push("humidity-unreachable");
        }
        if self.contains(Self::CLIMATE_UNCONTROLLED_WATCHDOG) {
            parts.push("climate-uncontrolled");
        }
        parts.push(if self.contains(Self::ACTIVE) {
            "active"
        } else {
            "idle"
        });
        f.write_str(&parts.join("|"))
    }
}

/// Controller status: flag byte plus the three cooling fans.
///
/// Fan order on the wire is wind, right, left.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZeusStatus {
    pub status: ZeusStatusValue,
    pub fans: [FanStatusAndRpm; 3],
}

impl WireMessage for ZeusStatus {
    const CLASS: MessageClass = MessageClass::ZEUS_STATUS;
    const WIRE_SIZE: usize = 7;

    fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        ProtocolError::check_size(buf, Self::WIRE_SIZE)?;
        let mut scratch = [0u8; Self::WIRE_SIZE];
        scratch[0] = self.status.0;
        for (chunk, fan) in scratch[1..].chunks_exact_mut(2).zip(self.fans) {
            chunk.copy_from_slice(&fan.0.to_le_bytes());
        }
        buf[..Self::WIRE_SIZE].copy_from_slice(&scratch);
        Ok(Self::WIRE_SIZE)
    }

    fn decode(buf: &[u8]) -> Result<Self> {
        ProtocolError::check_size(buf, Self::WIRE_SIZE)?;
        Ok(Self {
            status: ZeusStatusValue(buf[0]),
            fans: [
                FanStatusAndRpm(u16::from_le_bytes([buf[1], buf[2]])),
                FanStatusAndRpm(u16::from_le_bytes([buf[3], buf[4]])),
                FanStatusAndRpm(u16::from_le_bytes([buf[5], buf[6]])),
            ],
        })
    }
}

impl std::fmt::Display for ZeusStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Zeus.Status{{General: {}, WindFan: {}, LeftFan: {}, RightFan: {}}}",
            self.status, self.fans[0], self.fans[2], self.fans[1]
        )
    }
}

/// Raw drive values currently applied by the control loops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZeusControlPoint {
    pub humidity: i16,
    pub temperature: i16,
}

impl WireMessage for ZeusControlPoint {
    const CLASS: MessageClass = MessageClass::ZEUS_CONTROL_POINT;
    const WIRE_SIZE: usize = 4;

    fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        ProtocolError::check_size(buf, Self::WIRE_SIZE)?;
        let mut scratch = [0u8; Self::WIRE_SIZE];
        scratch[0..2].copy_from_slice(&self.humidity.to_le_bytes());
        scratch[2..4].copy_from_slice(&self.temperature.to_le_bytes());
        buf[..Self::WIRE_SIZE].copy_from_slice(&scratch);
        Ok(Self::WIRE_SIZE)
    }

    fn decode(buf: &[u8]) -> Result<Self> {
        ProtocolError::check_size(buf, Self::WIRE_SIZE)?;
        Ok(Self {
            humidity: i16::from_le_bytes([buf[0], buf[1]]),
            temperature: i16::from_le_bytes([buf[2], buf[3]]),
        })
    }
}

impl std::fmt::Display for ZeusControlPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Zeus.ControlPoint{{Humidity: {}, Temperature: {}}}",
            self.humidity, self.temperature
        )
    }
}

/// Calibration offsets for the four temperature probes, in degrees Celsius.
///
/// Element 0 rides the HIH6030 fixed-point scale, elements 1-3 the
/// 0.0625 °C/LSB TMP1075 scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ZeusDeltaTemperature {
    pub delta: [f32; 4],
}

const TMP1075_DEGREE_PER_LSB: f32 = 0.0625;

impl WireMessage for ZeusDeltaTemperature {
    const CLASS: MessageClass = MessageClass::ZEUS_DELTA_TEMPERATURE;
    const WIRE_SIZE: usize = 8;

    fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        ProtocolError::check_size(buf, Self::WIRE_SIZE)?;
        let mut scratch = [0u8; Self::WIRE_SIZE];
        scratch[0..2].copy_from_slice(&((self.delta[0] * 16382.0 / 165.0) as i16).to_le_bytes());
        for (i, chunk) in scratch[2..].chunks_exact_mut(2).enumerate() {
            chunk.copy_from_slice(
                &((self.delta[i + 1] / TMP1075_DEGREE_PER_LSB) as i16).to_le_bytes(),
            );
        }
        buf[..Self::WIRE_SIZE].copy_from_slice(&scratch);
        Ok(Self::WIRE_SIZE)
    }

    fn decode(buf: &[u8]) -> Result<Self> {
        ProtocolError::check_size(buf, Self::WIRE_SIZE)?;
        let raw = [
            i16::from_le_bytes([buf[0], buf[1]]),
            i16::from_le_bytes([buf[2], buf[3]]),
            i16::from_le_bytes([buf[4], buf[5]]),
            i16::from_le_bytes([buf[6], buf[7]]),
        ];
        Ok(Self {
            delta: [
                raw[0] as f32 * 165.0 / 16382.0,
                raw[1] as f32 * TMP1075_DEGREE_PER_LSB,
                raw[2] as f32 * TMP1075_DEGREE_PER_LSB,
                raw[3] as f32 * TMP1075_DEGREE_PER_LSB,
            ],
        })
    }
}

impl std::fmt::Display for ZeusDeltaTemperature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Zeus.DeltaTemperature{{Primary: {:.4}°C, Aux1: {:.4}°C, Aux2: {:.4}°C, Aux3: {:.4}°C}}",
            self.delta[0], self.delta[1], self.delta[2], self.delta[3]
        )
    }
}
