//! Wire formats of the ETWatch telemetry node: the fixed-size uplink
//! reading frame and the variable-length downlink command frames.

pub mod downlink;
pub mod measurement;
