//! Event-driven bus monitoring.
//!
//! The codec is pure; this module supplies the runtime shell around it: a
//! receive task that polls a [`CanTransport`](crate::transport::CanTransport),
//! decodes every frame through the registry and broadcasts the results, plus
//! a heartbeat-fed directory of the nodes seen on the bus.

mod directory;
mod monitor;

pub use directory::{NodeDirectory, NodeRecord};
pub use monitor::{
    BusConfig, BusEvent, BusEventHandler, BusEventReceiver, BusEventSender, BusMonitor,
    Diagnostics,
};
