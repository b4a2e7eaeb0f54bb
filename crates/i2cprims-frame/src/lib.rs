//! I2C command framing with per-word CRC checksums.
//!
//! This is the core value-add layer of i2cprims. On checksummed commands
//! every 2-byte word on the wire is followed by one CRC byte:
//! - the transmit path interleaves a checksum after the command word and
//!   after every payload word
//! - the receive path validates each word's checksum, strips it, and fails
//!   on the first corrupt word
//!
//! Raw commands use the same layout without checksums.

pub mod codec;
pub mod command;
pub mod crc;
pub mod error;

pub use codec::{
    decode_response, encode_command, physical_length, CHECKSUM_SIZE, GROUP_SIZE, WORD_SIZE,
};
pub use command::{CommandWord, Framing, I2cCommand, Payload, Response};
pub use crc::{CrcConfig, CRC16_GENIBUS, CRC32_POSIX, CRC8_SENSIRION};
pub use error::{FrameError, Result};
