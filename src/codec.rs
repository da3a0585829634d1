//! Scalar wire codecs.
//!
//! Conversions between engineering units and the fixed-point binary forms
//! the firmware puts on the wire.

pub mod conversion;

pub use conversion::{
    binary_to_hih6030_temperature, binary_to_humidity, binary_to_tmp1075,
    hih6030_temperature_to_binary, humidity_to_binary, tmp1075_to_binary,
};
