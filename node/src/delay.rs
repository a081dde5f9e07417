//! Blocking delay provider.
//!
//! Every suspension point of the acquisition loop (join backoff, downlink
//! grace period, receive timeout, end-of-cycle sleep) goes through this
//! trait, so tests can drive the loop without real time passing.

use std::time::Duration;

pub trait Delay {
    fn delay(&mut self, duration: Duration);
}

/// Delay provider backed by `std::thread::sleep`.
#[derive(Debug, Default)]
pub struct StdDelay;

impl Delay for StdDelay {
    fn delay(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
