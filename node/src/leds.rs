//! Controlling the status LED.
//!
//! The indicator is purely observational: off = idle, amber = awaiting
//! join, green = link established, red = sensor-init or link error. No
//! behavior depends on it.

/// Colors the indicator can show.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LedColor {
    Off,
    Amber,
    Green,
    Red,
}

/// A single RGB status LED.
pub trait StatusLed {
    fn set(&mut self, color: LedColor);
}

/// LED "driver" that only logs color changes. Used on hosts without an
/// actual indicator.
#[derive(Debug, Default)]
pub struct LoggingLed;

impl StatusLed for LoggingLed {
    fn set(&mut self, color: LedColor) {
        log::debug!("status led: {:?}", color);
    }
}
