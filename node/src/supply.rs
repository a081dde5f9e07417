//! Battery supply monitoring.

use crate::error::SensorError;

/// Raw ADC access to the battery voltage divider.
pub trait BatteryChannel {
    fn read_raw(&mut self) -> Result<u16, SensorError>;
}

/// Manages the battery voltage measurement.
pub struct SupplyMonitor {
    channel: Box<dyn BatteryChannel>,
}

impl SupplyMonitor {
    pub fn new(channel: Box<dyn BatteryChannel>) -> Self {
        Self { channel }
    }

    /// Read the battery channel and return the scaled value for the
    /// payload.
    pub fn read_scaled(&mut self) -> Result<i16, SensorError> {
        Ok(Self::convert_input(self.channel.read_raw()?))
    }

    /// Convert the raw ADC count to the scaled battery value.
    ///
    /// The constants are the hardware's voltage divider calibration and
    /// must be preserved exactly. The result is truncated, not rounded.
    pub fn convert_input(input: u16) -> i16 {
        const ADC_MAX: f32 = 4096.0;
        const SCALE_NUM: f32 = 354.8;
        const SCALE_DEN: f32 = 0.316;
        ((input as f32) / ADC_MAX * SCALE_NUM / SCALE_DEN) as i16
    }
}
