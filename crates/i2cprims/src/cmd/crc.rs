use i2cprims_frame::CrcConfig;
use tracing::debug;

use crate::cmd::parse::HexBytes;
use crate::cmd::{CrcArgs, CrcPreset};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_crc, OutputFormat};

pub fn run(args: CrcArgs, format: OutputFormat) -> CliResult<i32> {
    let HexBytes(data) = &args.data;
    let crc = CrcConfig::from(args.preset);
    let value = crc.compute(data);
    debug!(len = data.len(), width = crc.width(), value, "crc computed");
    print_crc(algorithm_name(args.preset), crc.width(), value, format);
    Ok(SUCCESS)
}

fn algorithm_name(preset: CrcPreset) -> &'static str {
    match preset {
        CrcPreset::Sensirion => "CRC-8/SENSIRION",
        CrcPreset::Genibus => "CRC-16/GENIBUS",
        CrcPreset::Posix => "CRC-32/POSIX",
    }
}
