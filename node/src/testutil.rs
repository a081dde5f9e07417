//! Shared test doubles for the capability traits.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use crate::config::JoinCredentials;
use crate::delay::Delay;
use crate::error::{LinkError, SensorError};
use crate::leds::{LedColor, StatusLed};
use crate::link::{Channel, Radio};
use crate::sensors::{AnalogChannel, SpectralSensor};
use crate::supply::BatteryChannel;

pub fn test_credentials() -> JoinCredentials {
    JoinCredentials {
        dev_eui: [0x11; 8],
        app_eui: [0x22; 8],
        app_key: [0x33; 16],
    }
}

#[derive(Debug, Default)]
pub struct RadioState {
    /// Number of unjoined polls before `has_joined` reports success.
    /// `None` means the join never completes.
    pub joins_after: Option<u32>,
    pub polls: u32,
    pub sent: Vec<Vec<u8>>,
    pub downlinks: VecDeque<Vec<u8>>,
    pub fail_send: bool,
}

/// Radio double: joins after a configurable number of polls, records
/// uplinks, serves queued downlinks. Clones share state so tests can
/// inspect it after handing the radio to the link manager.
#[derive(Debug, Clone)]
pub struct FakeRadio(Rc<RefCell<RadioState>>);

impl FakeRadio {
    pub fn joins_after(polls: u32) -> Self {
        Self(Rc::new(RefCell::new(RadioState {
            joins_after: Some(polls),
            ..RadioState::default()
        })))
    }

    pub fn never_joins() -> Self {
        Self(Rc::new(RefCell::new(RadioState::default())))
    }

    pub fn state(&self) -> Rc<RefCell<RadioState>> {
        Rc::clone(&self.0)
    }
}

impl Radio for FakeRadio {
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
        let mut state = self.0.borrow_mut();
        state.polls += 1;
        Ok(match state.joins_after {
            Some(n) => state.polls > n,
            None => false,
        })
    }

    fn send(&mut self, payload: &[u8]) -> Result<(), LinkError> {
        let mut state = self.0.borrow_mut();
        if state.fail_send {
            return Err(LinkError::Tx("simulated".into()));
        }
        state.sent.push(payload.to_vec());
        Ok(())
    }

    fn receive(&mut self, _timeout: Duration) -> Result<Option<Vec<u8>>, LinkError> {
        Ok(self.0.borrow_mut().downlinks.pop_front())
    }
}

/// LED double recording every color change.
#[derive(Debug, Clone, Default)]
pub struct RecordingLed(pub Rc<RefCell<Vec<LedColor>>>);

impl StatusLed for RecordingLed {
    fn set(&mut self, color: LedColor) {
        self.0.borrow_mut().push(color);
    }
}

/// Delay double recording every requested wait instead of sleeping.
#[derive(Debug, Clone, Default)]
pub struct FakeDelay(Rc<RefCell<Vec<Duration>>>);

impl FakeDelay {
    pub fn durations(&self) -> Vec<Duration> {
        self.0.borrow().clone()
    }

    pub fn elapsed(&self) -> Duration {
        self.0.borrow().iter().sum()
    }
}

impl Delay for FakeDelay {
    fn delay(&mut self, duration: Duration) {
        self.0.borrow_mut().push(duration);
    }
}

/// Analog channel that always reads the same value.
pub struct FixedChannel(pub f32);

impl AnalogChannel for FixedChannel {
    fn read(&mut self) -> Result<f32, SensorError> {
        Ok(self.0)
    }
}

/// Analog channel that always fails.
pub struct BrokenChannel;

impl AnalogChannel for BrokenChannel {
    fn read(&mut self) -> Result<f32, SensorError> {
        Err(SensorError::NoResponse)
    }
}

/// Spectral sensor double with configurable failure points.
pub struct FakeSpectral {
    pub values: [f32; 6],
    pub temperature: f32,
    pub fail_trigger: bool,
    pub fail_values: bool,
}

impl FakeSpectral {
    pub fn healthy() -> Self {
        Self {
            values: [0.1, 0.2, 0.3, 0.4, 0.5, 0.6],
            temperature: 21.5,
            fail_trigger: false,
            fail_values: false,
        }
    }
}

impl SpectralSensor for FakeSpectral {
    fn trigger_measurement(&mut self) -> Result<(), SensorError> {
        if self.fail_trigger {
            Err(SensorError::NotReady)
        } else {
            Ok(())
        }
    }

    fn calibrated_values(&mut self) -> Result<[f32; 6], SensorError> {
        if self.fail_values {
            Err(SensorError::Bus("simulated".into()))
        } else {
            Ok(self.values)
        }
    }

    fn temperature(&mut self) -> Result<f32, SensorError> {
        Ok(self.temperature)
    }
}

/// Battery channel that always reads the same raw count.
pub struct FixedBattery(pub u16);

impl BatteryChannel for FixedBattery {
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        Ok(self.0)
    }
}

/// Battery channel that always fails.
pub struct BrokenBattery;

impl BatteryChannel for BrokenBattery {
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        Err(SensorError::NoResponse)
    }
}
