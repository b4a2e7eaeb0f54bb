use bytes::Bytes;

/// Errors that can occur during command encoding/decoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// A received word's checksum byte does not match the recomputed one.
    #[error("I2C error: Received wrong checksum 0x{received:02X} (expected 0x{expected:02X}).")]
    Checksum {
        /// Checksum byte as received.
        received: u8,
        /// Checksum computed over `data`.
        expected: u8,
        /// Data bytes of the failing group.
        data: Bytes,
    },

    /// A checksummed response is not made of whole checksum groups.
    #[error("misaligned response ({len} bytes is not a whole number of {group}-byte groups)")]
    Misaligned { len: usize, group: usize },

    /// The CRC engine only supports 8, 16 and 32 bit registers.
    #[error("unsupported CRC width {0} (expected 8, 16 or 32)")]
    UnsupportedWidth(u8),

    /// Per-word checksums are a single byte, so they need an 8-bit CRC.
    #[error("per-word checksums need an 8-bit CRC, got {0}-bit")]
    ChecksumWidth(u8),
}

impl FrameError {
    /// Raw bytes carried by the error, empty when there are none.
    pub fn received_data(&self) -> &[u8] {
        match self {
            FrameError::Checksum { data, .. } => data,
            _ => &[],
        }
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
