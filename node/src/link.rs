//! Radio link management: the OTAA join lifecycle and the send/receive
//! transport over the LoRaWAN stack.

use std::time::Duration;

use log::{info, warn};

use etwatch_common::measurement::EncodedReading;

use crate::config::JoinCredentials;
use crate::delay::Delay;
use crate::error::{JoinError, LinkError};
use crate::leds::{LedColor, StatusLed};

/// Spacing between join status polls.
pub const JOIN_RETRY_INTERVAL: Duration = Duration::from_secs(5);

/// Number of unjoined polls tolerated before giving up.
pub const DEFAULT_MAX_JOIN_RETRIES: u32 = 100;

/// Data rate used for uplinks (SF7/BW125 on EU868).
const DATA_RATE: u8 = 5;

/// One entry of the channel plan.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Channel {
    pub index: u8,
    pub frequency_hz: u32,
    pub dr_min: u8,
    pub dr_max: u8,
}

const fn channel(index: u8, frequency_hz: u32) -> Channel {
    Channel {
        index,
        frequency_hz,
        dr_min: 0,
        dr_max: 5,
    }
}

/// Channel plan for TTN EU863-870.
pub const EU868_CHANNELS: [Channel; 8] = [
    channel(0, 868_100_000),
    channel(1, 868_300_000),
    channel(2, 868_500_000),
    channel(3, 867_100_000),
    channel(4, 867_300_000),
    channel(5, 867_500_000),
    channel(6, 867_700_000),
    channel(7, 867_900_000),
];

/// The opaque radio protocol stack.
///
/// Join handshake internals live below this trait; the node only observes
/// the session state and moves payload bytes.
pub trait Radio {
    fn configure_channel(&mut self, channel: &Channel) -> Result<(), LinkError>;
    fn set_data_rate(&mut self, data_rate: u8) -> Result<(), LinkError>;
    /// Begin OTAA activation. Completion is observed via `has_joined`.
    fn start_join(&mut self, credentials: &JoinCredentials) -> Result<(), LinkError>;
    fn has_joined(&mut self) -> Result<bool, LinkError>;
    /// Queue one uplink. Non-blocking.
    fn send(&mut self, payload: &[u8]) -> Result<(), LinkError>;
    /// Poll for a downlink for up to `timeout`. `None` on timeout; never
    /// blocks past it.
    fn receive(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>, LinkError>;
}

/// Owns the radio and its join session.
pub struct LinkManager<R: Radio> {
    radio: R,
}

impl<R: Radio> LinkManager<R> {
    pub fn new(radio: R) -> Self {
        Self { radio }
    }

    /// Join the network via OTAA.
    ///
    /// Configures the channel plan and data rate, starts the activation,
    /// then polls the join status every [`JOIN_RETRY_INTERVAL`], showing
    /// the pending indicator on each attempt. Exceeding `max_retries`
    /// terminates the session; the surrounding power management is
    /// expected to reset or deep-sleep the device.
    pub fn join(
        &mut self,
        credentials: &JoinCredentials,
        max_retries: u32,
        led: &mut dyn StatusLed,
        delay: &mut dyn Delay,
    ) -> Result<(), JoinError> {
        info!("configuring channel plan ({} channels)", EU868_CHANNELS.len());
        for channel in &EU868_CHANNELS {
            if let Err(e) = self.radio.configure_channel(channel) {
                warn!("channel {}: {}", channel.index, e);
            }
        }
        if let Err(e) = self.radio.set_data_rate(DATA_RATE) {
            warn!("data rate: {}", e);
        }

        info!("starting OTAA join");
        if let Err(e) = self.radio.start_join(credentials) {
            warn!("join request: {}", e);
        }

        let mut retries = 0u32;
        loop {
            match self.radio.has_joined() {
                Ok(true) => break,
                Ok(false) => {}
                Err(e) => warn!("join status: {}", e),
            }
            led.set(LedColor::Amber);
            delay.delay(JOIN_RETRY_INTERVAL);
            retries += 1;
            info!("not joined yet (attempt {})", retries);
            if retries > max_retries {
                return Err(JoinError::RetriesExhausted { attempts: retries });
            }
        }

        info!("joined the network");
        led.set(LedColor::Green);
        Ok(())
    }

    /// Transmit one encoded reading.
    pub fn send(&mut self, frame: &EncodedReading) -> Result<(), LinkError> {
        self.radio.send(&frame.0)
    }

    /// Poll for one downlink frame.
    pub fn receive(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>, LinkError> {
        self.radio.receive(timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::testutil::{test_credentials, FakeDelay, FakeRadio, RecordingLed};

    #[test]
    fn test_join_succeeds_after_a_few_polls() {
        let radio = FakeRadio::joins_after(3);
        let state = radio.state();
        let mut link = LinkManager::new(radio);
        let led = RecordingLed::default();
        let mut delay = FakeDelay::default();

        link.join(&test_credentials(), 100, &mut led.clone(), &mut delay)
            .unwrap();

        // Three unjoined polls, each with the pending indicator and the
        // 5 second backoff, then green.
        assert_eq!(state.borrow().polls, 4);
        assert_eq!(delay.elapsed(), JOIN_RETRY_INTERVAL * 3);
        let colors = led.0.borrow().clone();
        assert_eq!(colors.last(), Some(&LedColor::Green));
        assert_eq!(
            colors.iter().filter(|c| **c == LedColor::Amber).count(),
            3
        );
    }

    #[test]
    fn test_join_immediately_joined_needs_no_backoff() {
        let mut link = LinkManager::new(FakeRadio::joins_after(0));
        let led = RecordingLed::default();
        let mut delay = FakeDelay::default();

        link.join(&test_credentials(), 100, &mut led.clone(), &mut delay)
            .unwrap();
        assert_eq!(delay.durations().len(), 0);
    }

    #[test]
    fn test_join_retry_ceiling_is_fatal_at_attempt_101() {
        let radio = FakeRadio::never_joins();
        let state = radio.state();
        let mut link = LinkManager::new(radio);
        let led = RecordingLed::default();
        let mut delay = FakeDelay::default();

        let err = link
            .join(&test_credentials(), 100, &mut led.clone(), &mut delay)
            .unwrap_err();

        assert!(matches!(err, JoinError::RetriesExhausted { attempts: 101 }));
        assert_eq!(state.borrow().polls, 101);
    }

    #[test]
    fn test_join_on_the_last_allowed_attempt_is_not_fatal() {
        // 100 unjoined polls followed by a successful one: still fine.
        let mut link = LinkManager::new(FakeRadio::joins_after(100));
        let led = RecordingLed::default();
        let mut delay = FakeDelay::default();

        link.join(&test_credentials(), 100, &mut led.clone(), &mut delay)
            .unwrap();
        assert_eq!(delay.durations().len(), 100);
    }

    #[test]
    fn test_channel_plan_matches_eu868() {
        assert_eq!(EU868_CHANNELS[0].frequency_hz, 868_100_000);
        assert_eq!(EU868_CHANNELS[7].frequency_hz, 867_900_000);
        assert!(EU868_CHANNELS.iter().all(|c| c.dr_min == 0 && c.dr_max == 5));
    }
}
