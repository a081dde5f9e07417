//! The acquisition loop: the node's core state machine.
//!
//! One operational cycle reads every sensor into a fresh reading vector,
//! uplinks the encoded frame, listens briefly for a configuration
//! downlink, persists any update, and sleeps for the currently configured
//! interval. The loop runs on a single logical thread; the only
//! suspension points are the bounded waits named below.

use std::time::Duration;

use log::{error, info, warn};

use etwatch_common::downlink::{self, DownlinkCommand};

use crate::config::{ConfigStore, JoinCredentials, NodeConfig};
use crate::delay::Delay;
use crate::error::JoinError;
use crate::leds::{LedColor, StatusLed};
use crate::link::{LinkManager, Radio, DEFAULT_MAX_JOIN_RETRIES};
use crate::sensors::SensorBank;

/// Grace period between the uplink and the downlink receive window.
pub const DOWNLINK_GRACE_PERIOD: Duration = Duration::from_secs(4);

/// How long one downlink receive may poll before giving up.
pub const DOWNLINK_RECEIVE_TIMEOUT: Duration = Duration::from_secs(1);

/// How long error indications stay visible on the LED.
const ERROR_HOLD: Duration = Duration::from_secs(5);

/// Control states of the loop.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum State {
    Init,
    Joining,
    Operational,
}

/// Drives one node session: init, join, then operational cycles forever.
pub struct AcquisitionLoop<R: Radio, L: StatusLed, D: Delay> {
    link: LinkManager<R>,
    bank: SensorBank,
    store: ConfigStore,
    led: L,
    delay: D,
    credentials: JoinCredentials,
    max_join_retries: u32,
    /// Current configuration. Single writer: only this loop mutates it.
    config: NodeConfig,
}

impl<R: Radio, L: StatusLed, D: Delay> AcquisitionLoop<R, L, D> {
    pub fn new(
        link: LinkManager<R>,
        bank: SensorBank,
        store: ConfigStore,
        led: L,
        delay: D,
        credentials: JoinCredentials,
    ) -> Self {
        Self {
            link,
            bank,
            store,
            led,
            delay,
            credentials,
            max_join_retries: DEFAULT_MAX_JOIN_RETRIES,
            config: NodeConfig::default(),
        }
    }

    /// Override the join retry ceiling.
    pub fn with_max_join_retries(mut self, max_join_retries: u32) -> Self {
        self.max_join_retries = max_join_retries;
        self
    }

    /// The currently active sleep interval.
    pub fn sleep_time(&self) -> Duration {
        Duration::from_secs(u64::from(self.config.sleep_time))
    }

    /// Drive the state machine forever.
    ///
    /// Returns only on the fatal join path; recovery (reset or deep
    /// sleep) is up to the caller.
    pub fn run(&mut self) -> Result<(), JoinError> {
        let mut state = State::Init;
        loop {
            state = match state {
                State::Init => {
                    self.init();
                    State::Joining
                }
                State::Joining => {
                    self.link.join(
                        &self.credentials,
                        self.max_join_retries,
                        &mut self.led,
                        &mut self.delay,
                    )?;
                    State::Operational
                }
                State::Operational => {
                    self.run_cycle();
                    State::Operational
                }
            };
        }
    }

    /// Load the persisted config and surface boot-time sensor state.
    fn init(&mut self) {
        self.config = self.store.load();
        info!("sleep interval: {}s", self.config.sleep_time);
        if !self.bank.has_spectral() {
            // One-time indication; the node keeps running with the
            // optical and temperature fields sentineled.
            error!("optical subsystem unavailable");
            self.show_error();
        }
    }

    /// One operational cycle.
    fn run_cycle(&mut self) {
        let reading = self.bank.acquire();
        info!(
            "reading: adc0={} spectral={:?} temp={} battery={}",
            reading.adc_ch0, reading.spectral, reading.temperature, reading.battery_scaled
        );

        if let Err(e) = self.link.send(&reading.encode()) {
            warn!("uplink failed: {}", e);
            self.show_error();
        }

        self.delay.delay(DOWNLINK_GRACE_PERIOD);
        match self.link.receive(DOWNLINK_RECEIVE_TIMEOUT) {
            Ok(Some(frame)) => self.apply_downlink(&frame),
            Ok(None) => {}
            Err(e) => {
                warn!("downlink receive failed: {}", e);
                self.show_error();
            }
        }

        self.led.set(LedColor::Off);
        self.delay.delay(self.sleep_time());
    }

    /// Apply a received downlink frame and persist the configuration.
    ///
    /// The config file is rewritten on every received frame, recognized
    /// command or not.
    fn apply_downlink(&mut self, frame: &[u8]) {
        info!("downlink received ({} bytes)", frame.len());
        if let Some(DownlinkCommand::SetSleepInterval(seconds)) = downlink::decode(frame) {
            self.config.sleep_time = seconds;
            info!("new sleep time: {}s", seconds);
        }
        if let Err(e) = self.store.save(&self.config) {
            warn!("could not persist config: {}", e);
        }
    }

    fn show_error(&mut self) {
        self.led.set(LedColor::Red);
        self.delay.delay(ERROR_HOLD);
        self.led.set(LedColor::Off);
    }
}
