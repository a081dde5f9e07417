//! Downlink command frames.
//!
//! A downlink is a variable-length byte sequence: one command tag followed
//! by a tag-specific payload. Decoding is total: anything that does not
//! parse is ignored, since the absence of a valid command is a normal
//! outcome, not an error.

/// Command tags understood by the node.
mod tags {
    /// Set the sleep interval. Payload: u16 LE seconds.
    pub const SET_SLEEP_INTERVAL: u8 = 1;
}

/// A decoded downlink command.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DownlinkCommand {
    /// Replace the inter-cycle sleep interval (seconds).
    SetSleepInterval(u16),
}

/// Decode a downlink frame.
///
/// Frames of length ≤ 2 and frames with an unknown tag yield `None`.
pub fn decode(frame: &[u8]) -> Option<DownlinkCommand> {
    if frame.len() <= 2 {
        return None;
    }
    match frame[0] {
        tags::SET_SLEEP_INTERVAL => {
            let seconds = u16::from_le_bytes([frame[1], frame[2]]);
            Some(DownlinkCommand::SetSleepInterval(seconds))
        }
        _ => None,
    }
}
