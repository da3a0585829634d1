//! Fixed-point sensor conversions.
//!
//! Three scalar codecs shared by the device message payloads:
//!
//! - relative humidity, HIH6030 encoding: `[0, 100]%` mapped linearly onto
//!   `[0, 16382]`
//! - temperature, HIH6030 encoding: `[-40, 125]°C` mapped linearly onto
//!   `[0, 16382]`
//! - temperature, TMP1075 encoding: signed 12-bit two's complement,
//!   0.0625 °C per LSB
//!
//! Encoding clamps to the representable range. Decoding an out-of-range
//! HIH6030 value returns `NaN` as an is-invalid sentinel; message decoders
//! turn that sentinel into a typed error. The TMP1075 form is total in both
//! directions. Arithmetic stays in `f32` with truncating casts so results
//! match the firmware bit for bit.

/// Largest value of the 14-bit HIH6030 range.
const HIH6030_MAX: u16 = 16382;

/// Largest magnitude of the positive 12-bit two's complement range.
const MAX_INT12: u16 = (1 << 11) - 1;

/// Degrees Celsius per TMP1075 LSB.
const TMP1075_RESOLUTION: f32 = 0.0625;

/// Span of the HIH6030 temperature range in degrees Celsius.
const HIH6030_TEMPERATURE_SPAN: f32 = 165.0;

/// Convert a relative humidity in percent to its 14-bit wire form.
///
/// Values at or below 0% clamp to 0, values at or above 100% clamp to
/// 16382.
pub fn humidity_to_binary(value: f32) -> u16 {
    if value <= 0.0 {
        0
    } else if value >= 100.0 {
        HIH6030_MAX
    } else {
        ((value / 100.0) * HIH6030_MAX as f32) as u16
    }
}

/// Convert a 14-bit wire value back to a relative humidity in percent.
///
/// Returns `NaN` for values above 16382; callers must treat that as a
/// decode error.
pub fn binary_to_humidity(value: u16) -> f32 {
    if value > HIH6030_MAX {
        return f32::NAN;
    }
    value as f32 / HIH6030_MAX as f32 * 100.0
}

/// Convert a temperature in degrees Celsius to its 14-bit HIH6030 form.
///
/// Values outside `[-40, 125]` clamp to the range bounds.
pub fn hih6030_temperature_to_binary(value: f32) -> u16 {
    if value <= -40.0 {
        0
    } else if value >= 125.0 {
        HIH6030_MAX
    } else {
        (((value + 40.0) / HIH6030_TEMPERATURE_SPAN) * HIH6030_MAX as f32) as u16
    }
}

/// Convert a 14-bit HIH6030 wire value back to degrees Celsius.
///
/// Returns `NaN` for values above 16382; callers must treat that as a
/// decode error.
pub fn binary_to_hih6030_temperature(value: u16) -> f32 {
    if value > HIH6030_MAX {
        return f32::NAN;
    }
    value as f32 / HIH6030_MAX as f32 * HIH6030_TEMPERATURE_SPAN - 40.0
}

/// Convert a temperature in degrees Celsius to the signed 12-bit TMP1075
/// form, saturating at the range bounds (approx. `[-128, 127.9375]`).
pub fn tmp1075_to_binary(value: f32) -> u16 {
    if value >= 0.0 {
        ((value / TMP1075_RESOLUTION) as u16).min(MAX_INT12)
    } else if value <= -128.0 {
        0x0800
    } else {
        let magnitude = ((-value / TMP1075_RESOLUTION) as u16).min(MAX_INT12);
        0xffffu16.wrapping_sub(magnitude).wrapping_add(1) & 0x0fff
    }
}

/// Convert a signed 12-bit TMP1075 wire value back to degrees Celsius.
///
/// Bit 11 is sign-extended before the value is interpreted as a 16-bit
/// signed integer; every input is valid.
pub fn binary_to_tmp1075(value: u16) -> f32 {
    let extended = if value & 0x800 != 0 {
        0xf000 | value
    } else {
        value
    };
    extended as i16 as f32 * TMP1075_RESOLUTION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_humidity() {
        let testdata: &[(f32, u16)] = &[
            (100.0, 16382),
            (0.0, 0),
            (50.0, 16382 / 2),
            (101.0, 16382),
            (-1.0, 0),
        ];

        for &(float_value, binary_value) in testdata {
            assert_eq!(
                humidity_to_binary(float_value),
                binary_value,
                "converting {float_value}% RH"
            );
            if (0.0..=100.0).contains(&float_value) {
                assert_eq!(binary_to_humidity(binary_value), float_value);
            }
        }

        assert!(binary_to_humidity(HIH6030_MAX + 1).is_nan());
        assert!(binary_to_humidity(16384).is_nan());
    }

    #[test]
    fn test_hih6030_temperature() {
        let testdata: &[(f32, u16)] = &[
            (125.0, 16382),
            (-40.0, 0),
            (-0.003967285, 3971),
            (126.0, 16382),
            (-41.0, 0),
        ];

        for &(float_value, binary_value) in testdata {
            assert_eq!(
                hih6030_temperature_to_binary(float_value),
                binary_value,
                "converting {float_value}°C"
            );
            if (-40.0..=125.0).contains(&float_value) {
                assert_eq!(binary_to_hih6030_temperature(binary_value), float_value);
            }
        }

        assert!(binary_to_hih6030_temperature(HIH6030_MAX + 1).is_nan());
    }

    #[test]
    fn test_tmp1075() {
        // From the TMP1075 datasheet, low four bits stripped.
        let testdata: &[(f32, u16)] = &[
            (127.9375, 0x7ff),
            (100.0, 0x640),
            (80.0, 0x500),
            (75.0, 0x4b0),
            (50.0, 0x320),
            (25.0, 0x190),
            (0.25, 0x004),
            (0.0625, 0x001),
            (0.0, 0x000),
            (-0.0625, 0xfff),
            (-0.25, 0xffc),
            (-25.0, 0xe70),
            (-50.0, 0xce0),
            (-128.0, 0x800),
        ];

        for &(float_value, binary_value) in testdata {
            assert_eq!(
                binary_to_tmp1075(binary_value),
                float_value,
                "converting 0x{binary_value:03x}"
            );
            assert_eq!(
                tmp1075_to_binary(float_value),
                binary_value,
                "converting {float_value}°C"
            );
        }
    }

    #[test]
    fn test_tmp1075_saturates() {
        assert_eq!(tmp1075_to_binary(500.0), 0x7ff);
        assert_eq!(tmp1075_to_binary(-500.0), 0x800);
    }
}
