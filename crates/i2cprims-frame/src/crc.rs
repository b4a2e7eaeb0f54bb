//! Table-free, bit-by-bit CRC engine.
//!
//! The register is processed MSB first. Each input byte is XORed into the
//! top byte of the register, followed by eight shift/XOR steps. Reflected
//! variants are not supported.

use crate::error::{FrameError, Result};

/// Immutable CRC parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "CrcParams", into = "CrcParams")
)]
pub struct CrcConfig {
    width: u8,
    polynomial: u32,
    initial_value: u32,
    final_xor: u32,
}

/// CRC-8/SENSIRION, the per-word checksum used by Sensirion sensors.
pub const CRC8_SENSIRION: CrcConfig = CrcConfig {
    width: 8,
    polynomial: 0x31,
    initial_value: 0xFF,
    final_xor: 0x00,
};

/// CRC-16/GENIBUS.
pub const CRC16_GENIBUS: CrcConfig = CrcConfig {
    width: 16,
    polynomial: 0x1021,
    initial_value: 0xFFFF,
    final_xor: 0xFFFF,
};

/// CRC-32/POSIX (cksum).
pub const CRC32_POSIX: CrcConfig = CrcConfig {
    width: 32,
    polynomial: 0x04C1_1DB7,
    initial_value: 0x0,
    final_xor: 0xFFFF_FFFF,
};

impl CrcConfig {
    /// Create a CRC configuration.
    ///
    /// `polynomial`, `initial_value` and `final_xor` are masked to `width`
    /// bits. Fails with [`FrameError::UnsupportedWidth`] unless `width` is 8,
    /// 16 or 32.
    pub fn new(width: u8, polynomial: u32, initial_value: u32, final_xor: u32) -> Result<Self> {
        if !matches!(width, 8 | 16 | 32) {
            return Err(FrameError::UnsupportedWidth(width));
        }
        let mask = mask_for(width);
        Ok(Self {
            width,
            polynomial: polynomial & mask,
            initial_value: initial_value & mask,
            final_xor: final_xor & mask,
        })
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn polynomial(&self) -> u32 {
        self.polynomial
    }

    pub fn initial_value(&self) -> u32 {
        self.initial_value
    }

    pub fn final_xor(&self) -> u32 {
        self.final_xor
    }

    /// Compute the CRC of `data`. The result is always below `2^width`.
    pub fn compute(&self, data: &[u8]) -> u32 {
        let mask = mask_for(self.width);
        let top_bit = 1u32 << (self.width - 1);
        let byte_shift = self.width - 8;

        let mut crc = self.initial_value & mask;
        for &byte in data {
            crc ^= u32::from(byte) << byte_shift;
            for _ in 0..8 {
                crc = if crc & top_bit != 0 {
                    (crc << 1) ^ self.polynomial
                } else {
                    crc << 1
                };
                crc &= mask;
            }
        }
        (crc ^ self.final_xor) & mask
    }
}

fn mask_for(width: u8) -> u32 {
    if width >= 32 {
        u32::MAX
    } else {
        (1u32 << width) - 1
    }
}

/// Serialized form of [`CrcConfig`], validated on the way in.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct CrcParams {
    width: u8,
    polynomial: u32,
    initial_value: u32,
    #[serde(default)]
    final_xor: u32,
}

#[cfg(feature = "serde")]
impl TryFrom<CrcParams> for CrcConfig {
    type Error = FrameError;

    fn try_from(params: CrcParams) -> Result<Self> {
        CrcConfig::new(
            params.width,
            params.polynomial,
            params.initial_value,
            params.final_xor,
        )
    }
}

#[cfg(feature = "serde")]
impl From<CrcConfig> for CrcParams {
    fn from(config: CrcConfig) -> Self {
        Self {
            width: config.width,
            polynomial: config.polynomial,
            initial_value: config.initial_value,
            final_xor: config.final_xor,
        }
    }
}
