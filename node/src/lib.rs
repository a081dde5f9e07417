//! Core logic of the ETWatch environmental telemetry node.
//!
//! The node periodically samples a bank of analog and optical sensors,
//! uplinks the readings as a fixed binary frame over a LoRaWAN-style
//! radio, and applies a remotely configured sleep interval received via
//! downlink. Hardware access (the radio stack, sensor buses, the status
//! LED, blocking delays) sits behind capability traits so the acquisition
//! loop can run against simulated devices on a host.

pub mod acquisition;
pub mod config;
pub mod delay;
pub mod error;
pub mod leds;
pub mod link;
pub mod sensors;
pub mod supply;

#[cfg(test)]
pub(crate) mod testutil;
