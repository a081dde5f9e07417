//! The sensor bank: every failure-prone measurement source behind a
//! capability trait, so the acquisition loop can run against real buses or
//! simulated devices.

use etwatch_common::measurement::ReadingVector;
use log::warn;

use crate::error::SensorError;
use crate::supply::SupplyMonitor;

/// Number of external ADC channels on the bank.
pub const ANALOG_CHANNELS: usize = 4;

/// One external ADC channel.
pub trait AnalogChannel {
    fn read(&mut self) -> Result<f32, SensorError>;
}

/// The multi-channel optical sensor.
///
/// Triggering and reading back are one logical measurement: if any step
/// fails, the whole optical reading (all six channels plus the sensor
/// temperature) counts as failed for this cycle.
pub trait SpectralSensor {
    fn trigger_measurement(&mut self) -> Result<(), SensorError>;
    fn calibrated_values(&mut self) -> Result<[f32; 6], SensorError>;
    fn temperature(&mut self) -> Result<f32, SensorError>;
}

/// The fixed, ordered set of sensor sources.
pub struct SensorBank {
    analog: Vec<Box<dyn AnalogChannel>>,
    spectral: Option<Box<dyn SpectralSensor>>,
    supply: SupplyMonitor,
}

impl SensorBank {
    /// Assemble the bank.
    ///
    /// `spectral` is `None` when the optical subsystem failed to
    /// initialize at boot; the node then keeps running with those fields
    /// permanently sentineled.
    pub fn new(
        analog: Vec<Box<dyn AnalogChannel>>,
        spectral: Option<Box<dyn SpectralSensor>>,
        supply: SupplyMonitor,
    ) -> Self {
        debug_assert_eq!(analog.len(), ANALOG_CHANNELS);
        Self {
            analog,
            spectral,
            supply,
        }
    }

    pub fn has_spectral(&self) -> bool {
        self.spectral.is_some()
    }

    /// Read every source into a fresh reading vector.
    ///
    /// Never fails: each read is independently guarded, and a failure
    /// leaves the sentinel in place and logs a warning.
    pub fn acquire(&mut self) -> ReadingVector {
        let mut reading = ReadingVector::default();

        // Only channel 0 enters the payload.
        if let Some(channel) = self.analog.get_mut(0) {
            match channel.read() {
                Ok(value) => reading.adc_ch0 = value,
                Err(e) => warn!("adc channel 0: {}", e),
            }
        }

        if let Some(spectral) = self.spectral.as_mut() {
            match Self::read_spectral(spectral.as_mut()) {
                Ok((values, temperature)) => {
                    reading.spectral = values;
                    reading.temperature = temperature;
                }
                Err(e) => warn!("spectral sensor: {}", e),
            }
        }

        match self.supply.read_scaled() {
            Ok(value) => reading.battery_scaled = value,
            Err(e) => warn!("battery channel: {}", e),
        }

        reading
    }

    fn read_spectral(sensor: &mut dyn SpectralSensor) -> Result<([f32; 6], f32), SensorError> {
        sensor.trigger_measurement()?;
        let values = sensor.calibrated_values()?;
        let temperature = sensor.temperature()?;
        Ok((values, temperature))
    }
}
