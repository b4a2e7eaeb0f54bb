use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand, ValueEnum};
use i2cprims_frame::{
    CommandWord, CrcConfig, I2cCommand, CRC16_GENIBUS, CRC32_POSIX, CRC8_SENSIRION,
};

use crate::exit::{frame_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod crc;
pub mod decode;
pub mod encode;
pub mod parse;
pub mod transceive;
pub mod version;

use parse::{parse_address, parse_duration, parse_hex, parse_u16, HexBytes};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute a CRC over hex encoded bytes.
    Crc(CrcArgs),
    /// Print the bytes written on the bus for a command.
    Encode(EncodeArgs),
    /// Verify and strip the checksums of received bytes.
    Decode(DecodeArgs),
    /// Execute a command on a Linux i2c-dev bus.
    Transceive(TransceiveArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Crc(args) => crc::run(args, format),
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Transceive(args) => transceive::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum CrcPreset {
    /// CRC-8/SENSIRION, used for per-word checksums.
    Sensirion,
    /// CRC-16/GENIBUS.
    Genibus,
    /// CRC-32/POSIX.
    Posix,
}

impl From<CrcPreset> for CrcConfig {
    fn from(preset: CrcPreset) -> Self {
        match preset {
            CrcPreset::Sensirion => CRC8_SENSIRION,
            CrcPreset::Genibus => CRC16_GENIBUS,
            CrcPreset::Posix => CRC32_POSIX,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FramingArg {
    /// No checksums, response as bytes.
    Raw,
    /// Per-word checksums, response as bytes.
    Bytes,
    /// Per-word checksums, response as 16-bit words.
    Words,
}

/// Options describing one I2C command.
#[derive(Args, Debug)]
pub struct CommandArgs {
    /// Command framing.
    #[arg(long, value_enum, default_value = "words")]
    pub framing: FramingArg,
    /// CRC used for per-word checksums.
    #[arg(long, value_enum, default_value = "sensirion")]
    pub crc: CrcPreset,
    /// Command word (e.g. 0x2400).
    #[arg(long, value_parser = parse_u16)]
    pub command: Option<u16>,
    /// Send the command as a single byte.
    #[arg(long, requires = "command")]
    pub byte_command: bool,
    /// Send the command word without checksum.
    #[arg(long, requires = "command")]
    pub raw_command_word: bool,
    /// Byte payload in hex.
    #[arg(long, value_parser = parse_hex, conflicts_with = "words")]
    pub data: Option<HexBytes>,
    /// Word payload, comma separated (e.g. 0x0064,0x0BB8).
    #[arg(long, value_delimiter = ',', value_parser = parse_u16, conflicts_with = "data")]
    pub words: Option<Vec<u16>>,
    /// Response length in data bytes, checksums excluded.
    #[arg(long)]
    pub rx_length: Option<usize>,
    /// Delay between write and read (e.g. 15ms).
    #[arg(long, default_value = "0ms", value_parser = parse_duration)]
    pub read_delay: Duration,
    /// Transfer timeout (e.g. 100ms).
    #[arg(long, default_value = "0ms", value_parser = parse_duration)]
    pub timeout: Duration,
}

impl CommandArgs {
    pub fn build(&self) -> CliResult<I2cCommand> {
        let crc = CrcConfig::from(self.crc);
        let mut command = match self.framing {
            FramingArg::Raw => Ok(I2cCommand::raw()),
            FramingArg::Bytes => I2cCommand::checksummed(crc),
            FramingArg::Words => I2cCommand::checksummed_words(crc),
        }
        .map_err(|err| frame_error("invalid command", err))?;

        if let Some(value) = self.command {
            let word = if self.byte_command {
                let byte = u8::try_from(value).map_err(|_| {
                    CliError::new(
                        USAGE,
                        format!("--byte-command needs a value up to 0xFF, got 0x{value:04X}"),
                    )
                })?;
                CommandWord::U8(byte)
            } else {
                CommandWord::U16(value)
            };
            command = command.with_command(word);
            if self.raw_command_word {
                command = command.with_raw_command_word();
            }
        }
        if let Some(HexBytes(data)) = &self.data {
            command = command.with_payload(data.clone());
        }
        if let Some(words) = &self.words {
            command = command.with_words(words.clone());
        }
        if let Some(rx_length) = self.rx_length {
            command = command.with_rx_length(rx_length);
        }
        Ok(command
            .with_read_delay(self.read_delay)
            .with_timeout(self.timeout))
    }
}

#[derive(Args, Debug)]
pub struct CrcArgs {
    /// Input bytes in hex.
    #[arg(value_parser = parse_hex)]
    pub data: HexBytes,
    /// CRC algorithm.
    #[arg(long, value_enum, default_value = "sensirion")]
    pub preset: CrcPreset,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    #[command(flatten)]
    pub command: CommandArgs,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Received bytes in hex, checksums included.
    #[arg(value_parser = parse_hex)]
    pub received: HexBytes,
    #[command(flatten)]
    pub command: CommandArgs,
}

#[derive(Args, Debug)]
pub struct TransceiveArgs {
    /// Bus device (e.g. /dev/i2c-1).
    pub device: PathBuf,
    /// 7-bit slave address (e.g. 0x44).
    #[arg(long, short = 'a', value_parser = parse_address)]
    pub address: u8,
    /// Report the result as a per-channel list.
    #[arg(long)]
    pub always_multi_channel: bool,
    /// Do not wait for the command's post-processing time.
    #[arg(long)]
    pub no_wait: bool,
    /// Post-processing time of the command (e.g. 1ms).
    #[arg(long, default_value = "0ms", value_parser = parse_duration)]
    pub post_processing_time: Duration,
    #[command(flatten)]
    pub command: CommandArgs,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
