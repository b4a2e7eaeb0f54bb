use std::time::Duration;

use bytes::Bytes;

use crate::codec;
use crate::crc::CrcConfig;
use crate::error::{FrameError, Result};

/// Command identifier written ahead of the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandWord {
    /// Single-byte command.
    U8(u8),
    /// Two-byte command, sent big-endian.
    U16(u16),
}

impl CommandWord {
    /// Number of bytes on the wire, without checksum.
    pub fn wire_size(&self) -> usize {
        match self {
            CommandWord::U8(_) => 1,
            CommandWord::U16(_) => 2,
        }
    }

    pub(crate) fn to_bytes(self) -> ([u8; 2], usize) {
        match self {
            CommandWord::U8(value) => ([value, 0], 1),
            CommandWord::U16(value) => (value.to_be_bytes(), 2),
        }
    }
}

impl From<u16> for CommandWord {
    fn from(value: u16) -> Self {
        CommandWord::U16(value)
    }
}

impl From<u8> for CommandWord {
    fn from(value: u8) -> Self {
        CommandWord::U8(value)
    }
}

/// Data written after the command word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Bytes, grouped pairwise for checksumming.
    Bytes(Bytes),
    /// 16-bit words, each sent big-endian as its own group.
    Words(Vec<u16>),
}

/// How a command frames its data on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// No checksums. The response is returned as raw bytes.
    Raw,
    /// One CRC byte after every word. The response is returned as bytes.
    Checksummed(CrcConfig),
    /// One CRC byte after every word. The response is returned as words.
    ChecksummedWords(CrcConfig),
}

impl Framing {
    /// CRC used for per-word checksums, `None` for raw framing.
    pub fn crc(&self) -> Option<&CrcConfig> {
        match self {
            Framing::Raw => None,
            Framing::Checksummed(crc) | Framing::ChecksummedWords(crc) => Some(crc),
        }
    }
}

/// Interpreted response data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Bytes(Bytes),
    Words(Vec<u16>),
}

impl Response {
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Response::Bytes(bytes) => Some(bytes),
            Response::Words(_) => None,
        }
    }

    pub fn as_words(&self) -> Option<&[u16]> {
        match self {
            Response::Bytes(_) => None,
            Response::Words(words) => Some(words),
        }
    }

    /// Number of bytes or words.
    pub fn len(&self) -> usize {
        match self {
            Response::Bytes(bytes) => bytes.len(),
            Response::Words(words) => words.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An I2C command: what to write, how much to read back, and how to
/// interpret it.
///
/// Built once with the consuming `with_*` methods and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct I2cCommand {
    framing: Framing,
    command_word: Option<CommandWord>,
    checksum_command_word: bool,
    payload: Option<Payload>,
    rx_length: Option<usize>,
    read_delay: Duration,
    timeout: Duration,
    post_processing_time: Duration,
}

impl I2cCommand {
    /// A command without checksums.
    pub fn raw() -> Self {
        Self::with_framing(Framing::Raw)
    }

    /// A command with per-word checksums whose response is returned as bytes.
    pub fn checksummed(crc: CrcConfig) -> Result<Self> {
        check_crc_width(&crc)?;
        Ok(Self::with_framing(Framing::Checksummed(crc)))
    }

    /// A command with per-word checksums whose response is returned as words.
    pub fn checksummed_words(crc: CrcConfig) -> Result<Self> {
        check_crc_width(&crc)?;
        Ok(Self::with_framing(Framing::ChecksummedWords(crc)))
    }

    fn with_framing(framing: Framing) -> Self {
        Self {
            framing,
            command_word: None,
            checksum_command_word: true,
            payload: None,
            rx_length: None,
            read_delay: Duration::ZERO,
            timeout: Duration::ZERO,
            post_processing_time: Duration::ZERO,
        }
    }

    /// Prefix the payload with a command identifier.
    pub fn with_command(mut self, command_word: impl Into<CommandWord>) -> Self {
        self.command_word = Some(command_word.into());
        self
    }

    /// Send the command word without a trailing checksum byte.
    pub fn with_raw_command_word(mut self) -> Self {
        self.checksum_command_word = false;
        self
    }

    /// Byte payload.
    pub fn with_payload(mut self, payload: impl Into<Bytes>) -> Self {
        self.payload = Some(Payload::Bytes(payload.into()));
        self
    }

    /// Word payload.
    pub fn with_words(mut self, words: impl Into<Vec<u16>>) -> Self {
        self.payload = Some(Payload::Words(words.into()));
        self
    }

    /// Expected number of data bytes in the response, checksums excluded.
    pub fn with_rx_length(mut self, rx_length: usize) -> Self {
        self.rx_length = Some(rx_length);
        self
    }

    pub fn with_read_delay(mut self, read_delay: Duration) -> Self {
        self.read_delay = read_delay;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Time the device needs after this command before it accepts the next.
    pub fn with_post_processing_time(mut self, post_processing_time: Duration) -> Self {
        self.post_processing_time = post_processing_time;
        self
    }

    pub fn framing(&self) -> &Framing {
        &self.framing
    }

    pub fn command_word(&self) -> Option<CommandWord> {
        self.command_word
    }

    pub fn checksum_command_word(&self) -> bool {
        self.checksum_command_word
    }

    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    /// Logical response length: data bytes only.
    pub fn rx_length(&self) -> Option<usize> {
        self.rx_length
    }

    /// Number of bytes the transceiver has to read, checksums included.
    pub fn physical_rx_length(&self) -> Option<usize> {
        self.rx_length.map(|len| match self.framing {
            Framing::Raw => len,
            Framing::Checksummed(_) | Framing::ChecksummedWords(_) => {
                codec::physical_length(len)
            }
        })
    }

    pub fn read_delay(&self) -> Duration {
        self.read_delay
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn post_processing_time(&self) -> Duration {
        self.post_processing_time
    }

    /// Bytes to transmit. Empty when there is neither command word nor payload.
    pub fn encode(&self) -> Bytes {
        codec::encode_command(self)
    }

    /// Bytes to transmit, or `None` when the write phase can be skipped.
    pub fn tx_data(&self) -> Option<Bytes> {
        if self.command_word.is_none() && self.payload.is_none() {
            None
        } else {
            Some(self.encode())
        }
    }

    /// Interpret raw received bytes. See [`codec::decode_response`].
    pub fn decode(&self, raw: &[u8]) -> Result<Option<Response>> {
        codec::decode_response(self, raw)
    }
}

fn check_crc_width(crc: &CrcConfig) -> Result<()> {
    if crc.width() != 8 {
        return Err(FrameError::ChecksumWidth(crc.width()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crc::{CRC16_GENIBUS, CRC8_SENSIRION};

    #[test]
    fn raw_defaults() {
        let cmd = I2cCommand::raw();
        assert_eq!(cmd.framing(), &Framing::Raw);
        assert!(cmd.command_word().is_none());
        assert!(cmd.payload().is_none());
        assert!(cmd.rx_length().is_none());
        assert!(cmd.tx_data().is_none());
        assert_eq!(cmd.read_delay(), Duration::ZERO);
        assert_eq!(cmd.timeout(), Duration::ZERO);
        assert_eq!(cmd.post_processing_time(), Duration::ZERO);
    }

    #[test]
    fn builder_sets_timing() {
        let cmd = I2cCommand::raw()
            .with_payload(&b"\x11"[..])
            .with_rx_length(42)
            .with_read_delay(Duration::from_millis(100))
            .with_timeout(Duration::from_millis(200))
            .with_post_processing_time(Duration::from_secs(5));
        assert_eq!(cmd.rx_length(), Some(42));
        assert_eq!(cmd.physical_rx_length(), Some(42));
        assert_eq!(cmd.read_delay(), Duration::from_millis(100));
        assert_eq!(cmd.timeout(), Duration::from_millis(200));
        assert_eq!(cmd.post_processing_time(), Duration::from_secs(5));
    }

    #[test]
    fn rx_length_zero_is_kept() {
        let cmd = I2cCommand::raw().with_rx_length(0);
        assert_eq!(cmd.rx_length(), Some(0));
    }

    #[test]
    fn checksummed_physical_length_adds_one_byte_per_word() {
        let cmd = I2cCommand::checksummed(CRC8_SENSIRION).unwrap();
        assert_eq!(cmd.physical_rx_length(), None);
        let cases = [(0, 0), (1, 1), (2, 3), (3, 4), (4, 6), (5, 7), (6, 9)];
        for (logical, physical) in cases {
            let cmd = cmd.clone().with_rx_length(logical);
            assert_eq!(cmd.rx_length(), Some(logical));
            assert_eq!(cmd.physical_rx_length(), Some(physical));
        }
    }

    #[test]
    fn checksummed_requires_8_bit_crc() {
        assert_eq!(
            I2cCommand::checksummed(CRC16_GENIBUS).unwrap_err(),
            FrameError::ChecksumWidth(16)
        );
        assert_eq!(
            I2cCommand::checksummed_words(CRC16_GENIBUS).unwrap_err(),
            FrameError::ChecksumWidth(16)
        );
    }

    #[test]
    fn command_word_conversions() {
        assert_eq!(CommandWord::from(0x1337u16), CommandWord::U16(0x1337));
        assert_eq!(CommandWord::from(0x42u8), CommandWord::U8(0x42));
        assert_eq!(CommandWord::U8(0x42).wire_size(), 1);
        assert_eq!(CommandWord::U16(0x42).wire_size(), 2);
    }

    #[test]
    fn response_accessors() {
        let bytes = Response::Bytes(Bytes::from_static(b"\xDE\xAD"));
        assert_eq!(bytes.as_bytes(), Some(&b"\xDE\xAD"[..]));
        assert!(bytes.as_words().is_none());
        assert_eq!(bytes.len(), 2);

        let words = Response::Words(vec![0xDEAD]);
        assert_eq!(words.as_words(), Some(&[0xDEAD][..]));
        assert!(words.as_bytes().is_none());
        assert!(!words.is_empty());
        assert!(Response::Words(Vec::new()).is_empty());
    }
}
