use bytes::{BufMut, Bytes, BytesMut};
use tracing::{trace, warn};

use crate::command::{Framing, I2cCommand, Payload, Response};
use crate::crc::CrcConfig;
use crate::error::{FrameError, Result};

/// Data bytes per checksum group.
pub const WORD_SIZE: usize = 2;

/// Checksum bytes per checksum group.
pub const CHECKSUM_SIZE: usize = 1;

/// Wire size of a full checksum group.
pub const GROUP_SIZE: usize = WORD_SIZE + CHECKSUM_SIZE;

/// Physical byte count of `logical` data bytes once checksums are interleaved.
///
/// Only full words get a checksum; a trailing odd byte is sent as is.
pub fn physical_length(logical: usize) -> usize {
    logical + logical / WORD_SIZE
}

/// Checksum byte of one group.
///
/// Commands only accept 8-bit CRCs, so the value always fits.
pub fn checksum_byte(crc: &CrcConfig, group: &[u8]) -> u8 {
    (crc.compute(group) & 0xFF) as u8
}

/// Append one group, followed by its checksum when `crc` is set.
pub fn encode_group(group: &[u8], crc: Option<&CrcConfig>, dst: &mut BytesMut) {
    dst.reserve(group.len() + CHECKSUM_SIZE);
    dst.put_slice(group);
    if let Some(crc) = crc {
        dst.put_u8(checksum_byte(crc, group));
    }
}

/// Encode a command into the bytes to transmit.
///
/// Wire format (checksummed framing):
/// ```text
/// ┌──────────────┬─────┬────────────┬─────┬────────────┬─────┬───
/// │ Command (2B) │ CRC │ Word 0     │ CRC │ Word 1     │ CRC │ ...
/// │ big-endian   │ 1B  │ big-endian │ 1B  │ big-endian │ 1B  │
/// └──────────────┴─────┴────────────┴─────┴────────────┴─────┴───
/// ```
/// A byte payload of odd length ends in a single byte without CRC.
/// Raw framing emits the same layout without the CRC bytes.
pub fn encode_command(command: &I2cCommand) -> Bytes {
    let crc = command.framing().crc();
    let mut dst = BytesMut::new();

    if let Some(word) = command.command_word() {
        let (bytes, len) = word.to_bytes();
        let word_crc = crc.filter(|_| command.checksum_command_word());
        encode_group(&bytes[..len], word_crc, &mut dst);
    }

    match command.payload() {
        Some(Payload::Bytes(bytes)) => {
            for group in bytes.chunks(WORD_SIZE) {
                let group_crc = crc.filter(|_| group.len() == WORD_SIZE);
                encode_group(group, group_crc, &mut dst);
            }
        }
        Some(Payload::Words(words)) => {
            for word in words {
                encode_group(&word.to_be_bytes(), crc, &mut dst);
            }
        }
        None => {}
    }

    trace!(tx = ?dst.as_ref(), "encoded command");
    dst.freeze()
}

/// Validate and remove the checksum of every group in `raw`.
///
/// Groups are checked left to right and decoding stops at the first
/// mismatch; nothing after it is returned. A trailing single byte carries no
/// checksum and is returned unchecked.
pub fn strip_checksums(raw: &[u8], crc: &CrcConfig) -> Result<BytesMut> {
    if raw.len() % GROUP_SIZE == WORD_SIZE {
        return Err(FrameError::Misaligned {
            len: raw.len(),
            group: GROUP_SIZE,
        });
    }

    let mut data = BytesMut::with_capacity(raw.len() - raw.len() / GROUP_SIZE);
    for (index, group) in raw.chunks(GROUP_SIZE).enumerate() {
        if group.len() < GROUP_SIZE {
            data.put_slice(group);
            break;
        }
        let (word, checksum) = group.split_at(group.len() - CHECKSUM_SIZE);
        let received = checksum[0];
        let expected = checksum_byte(crc, word);
        if received != expected {
            warn!(
                group = index,
                received, expected, "checksum mismatch in received data"
            );
            return Err(FrameError::Checksum {
                received,
                expected,
                data: Bytes::copy_from_slice(word),
            });
        }
        data.put_slice(word);
    }
    Ok(data)
}

/// Interpret the bytes received for `command`.
///
/// - no response requested: `Ok(None)`
/// - raw framing: the received bytes as they are
/// - checksummed framing: the validated data bytes, or big-endian words
///
/// A requested response of zero bytes decodes to an empty response.
pub fn decode_response(command: &I2cCommand, raw: &[u8]) -> Result<Option<Response>> {
    let Some(rx_length) = command.rx_length() else {
        return Ok(None);
    };

    let response = match command.framing() {
        Framing::Raw => Response::Bytes(Bytes::copy_from_slice(raw)),
        Framing::Checksummed(_) if rx_length == 0 => Response::Bytes(Bytes::new()),
        Framing::ChecksummedWords(_) if rx_length == 0 => Response::Words(Vec::new()),
        Framing::Checksummed(crc) => Response::Bytes(strip_checksums(raw, crc)?.freeze()),
        Framing::ChecksummedWords(crc) => {
            if raw.len() % GROUP_SIZE != 0 {
                return Err(FrameError::Misaligned {
                    len: raw.len(),
                    group: GROUP_SIZE,
                });
            }
            let data = strip_checksums(raw, crc)?;
            Response::Words(
                data.chunks_exact(WORD_SIZE)
                    .map(|w| u16::from_be_bytes([w[0], w[1]]))
                    .collect(),
            )
        }
    };
    Ok(Some(response))
}
