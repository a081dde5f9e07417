//! Runs the acquisition loop against simulated devices, with time
//! compressed so one simulated second passes in a millisecond.
//!
//! ```sh
//! RUST_LOG=info cargo run --example simulated_station
//! ```

use std::{thread, time::Duration};

use anyhow::Result;
use log::info;

use etwatch_node::{
    acquisition::AcquisitionLoop,
    config::{ConfigStore, JoinCredentials},
    delay::Delay,
    error::{LinkError, SensorError},
    leds::LoggingLed,
    link::{Channel, LinkManager, Radio},
    sensors::{AnalogChannel, SensorBank, SpectralSensor},
    supply::{BatteryChannel, SupplyMonitor},
};

/// Delay provider that sleeps one millisecond per simulated second.
struct TimeLapse;

impl Delay for TimeLapse {
    fn delay(&mut self, duration: Duration) {
        thread::sleep(duration / 1000);
    }
}

/// Radio that joins on the third poll and reconfigures the node to a
/// 30 second cadence after the third uplink.
struct SimRadio {
    polls: u32,
    uplinks: u32,
}

impl Radio for SimRadio {
    fn configure_channel(&mut self, _channel: &Channel) -> Result<(), LinkError> {
        Ok(())
    }

    fn set_data_rate(&mut self, _data_rate: u8) -> Result<(), LinkError> {
        Ok(())
    }

    fn start_join(&mut self, _credentials: &JoinCredentials) -> Result<(), LinkError> {
        Ok(())
    }

    fn has_joined(&mut self) -> Result<bool, LinkError> {
        self.polls += 1;
        Ok(self.polls > 2)
    }

    fn send(&mut self, payload: &[u8]) -> Result<(), LinkError> {
        self.uplinks += 1;
        info!("uplink #{}: {} bytes", self.uplinks, payload.len());
        Ok(())
    }

    fn receive(&mut self, _timeout: Duration) -> Result<Option<Vec<u8>>, LinkError> {
        if self.uplinks == 3 {
            Ok(Some(vec![1, 30, 0]))
        } else {
            Ok(None)
        }
    }
}

struct SimChannel {
    step: u32,
}

impl AnalogChannel for SimChannel {
    fn read(&mut self) -> Result<f32, SensorError> {
        self.step += 1;
        Ok(1.2 + (self.step as f32 * 0.4).sin() * 0.1)
    }
}

struct SimSpectral;

impl SpectralSensor for SimSpectral {
    fn trigger_measurement(&mut self) -> Result<(), SensorError> {
        Ok(())
    }

    fn calibrated_values(&mut self) -> Result<[f32; 6], SensorError> {
        Ok([0.11, 0.22, 0.33, 0.44, 0.55, 0.66])
    }

    fn temperature(&mut self) -> Result<f32, SensorError> {
        Ok(21.5)
    }
}

struct SimBattery {
    raw: u16,
}

impl BatteryChannel for SimBattery {
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        self.raw = self.raw.saturating_sub(1);
        Ok(self.raw)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let credentials = JoinCredentials::from_toml(
        r#"
        dev_eui = "70b3d57ed0000001"
        app_eui = "70b3d57ed0000002"
        app_key = "2b7e151628aed2a6abf7158809cf4f3c"
        "#,
    )?;

    let channels: Vec<Box<dyn AnalogChannel>> = (0..4)
        .map(|i| Box::new(SimChannel { step: i }) as _)
        .collect();
    let bank = SensorBank::new(
        channels,
        Some(Box::new(SimSpectral)),
        SupplyMonitor::new(Box::new(SimBattery { raw: 2600 })),
    );

    let mut node = AcquisitionLoop::new(
        LinkManager::new(SimRadio {
            polls: 0,
            uplinks: 0,
        }),
        bank,
        ConfigStore::new(std::env::temp_dir().join("etwatch-sim-config.json")),
        LoggingLed::default(),
        TimeLapse,
        credentials,
    );
    node.run()?;
    Ok(())
}
