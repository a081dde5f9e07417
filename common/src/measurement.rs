//! The fixed-shape reading vector and its uplink wire encoding.

use thiserror::Error;

/// Marker for "reading unavailable" in the float fields.
pub const SENTINEL: f32 = -1.0;

/// Size of an encoded reading: 7 × f32 followed by 2 × i16.
pub const WIRE_FRAME_LEN: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    /// The frame is shorter than the fixed wire layout.
    #[error("frame too short: {0} bytes")]
    TooShort(usize),
}

/// One full set of sensor readings, in wire order.
///
/// The field order is fixed on every cycle: ADC channel 0, the six
/// calibrated spectral intensities, the sensor temperature, and the scaled
/// battery value. Fields that could not be read carry the sentinel.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ReadingVector {
    pub adc_ch0: f32,
    pub spectral: [f32; 6],
    pub temperature: f32,
    pub battery_scaled: i16,
}

impl Default for ReadingVector {
    fn default() -> Self {
        Self {
            adc_ch0: SENTINEL,
            spectral: [SENTINEL; 6],
            temperature: SENTINEL,
            battery_scaled: -1,
        }
    }
}

/// A reading encoded into the fixed uplink frame (no header, no CRC).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EncodedReading(pub [u8; WIRE_FRAME_LEN]);

impl ReadingVector {
    /// Encode into the little-endian wire layout.
    ///
    /// Fields 0–6 are packed as 32-bit floats, fields 7–8 as signed 16-bit
    /// integers. The temperature is truncated towards zero, not rounded.
    pub fn encode(&self) -> EncodedReading {
        let mut buf = [0u8; WIRE_FRAME_LEN];
        let mut offset = 0;
        for value in core::iter::once(self.adc_ch0).chain(self.spectral) {
            buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
            offset += 4;
        }
        buf[offset..offset + 2].copy_from_slice(&(self.temperature as i16).to_le_bytes());
        buf[offset + 2..offset + 4].copy_from_slice(&self.battery_scaled.to_le_bytes());
        EncodedReading(buf)
    }

    /// Decode a wire frame.
    ///
    /// Frames shorter than [`WIRE_FRAME_LEN`] are rejected; extra trailing
    /// bytes are ignored. The temperature comes back as a whole-degree
    /// float since the wire format only carries the truncated integer.
    pub fn decode(data: &[u8]) -> Result<Self, FrameError> {
        if data.len() < WIRE_FRAME_LEN {
            return Err(FrameError::TooShort(data.len()));
        }

        let f32_at = |offset: usize| {
            f32::from_le_bytes(
                data[offset..offset + 4]
                    .try_into()
                    .expect("frame length checked"),
            )
        };
        let i16_at = |offset: usize| {
            i16::from_le_bytes(
                data[offset..offset + 2]
                    .try_into()
                    .expect("frame length checked"),
            )
        };

        let mut spectral = [0.0f32; 6];
        for (i, slot) in spectral.iter_mut().enumerate() {
            *slot = f32_at(4 + i * 4);
        }

        Ok(Self {
            adc_ch0: f32_at(0),
            spectral,
            temperature: i16_at(28) as f32,
            battery_scaled: i16_at(30),
        })
    }
}
