//! Fan telemetry word.
//!
//! Several status payloads carry one `u16` per fan: the low 14 bits are the
//! measured RPM, bit 14 flags an aging fan and bit 15 a stalled one. A
//! stalled alert takes priority over aging when both are set.

use serde::{Deserialize, Serialize};

/// Health summary extracted from the alert bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FanStatus {
    Ok,
    Aging,
    Stalled,
}

impl std::fmt::Display for FanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => f.write_str("OK"),
            Self::Aging => f.write_str("Aging"),
            Self::Stalled => f.write_str("Stalled"),
        }
    }
}

/// Raw fan word as found on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FanStatusAndRpm(pub u16);

impl FanStatusAndRpm {
    const RPM_MASK: u16 = 0x3fff;
    const AGING_ALERT: u16 = 1 << 14;
    const STALL_ALERT: u16 = 1 << 15;

    /// Measured rotation speed.
    pub const fn rpm(self) -> u16 {
        self.0 & Self::RPM_MASK
    }

    /// Alert bits collapsed to a status, stalled winning over aging.
    pub const fn status(self) -> FanStatus {
        if self.0 & Self::STALL_ALERT != 0 {
            FanStatus::Stalled
        } else if self.0 & Self::AGING_ALERT != 0 {
            FanStatus::Aging
        } else {
            FanStatus::Ok
        }
    }
}

impl From<u16> for FanStatusAndRpm {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for FanStatusAndRpm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{Status: {}, RPM: {}}}", self.status(), self.rpm())
    }
}
