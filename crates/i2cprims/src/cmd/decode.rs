use i2cprims_connection::ExecuteOutput;
use i2cprims_frame::{Framing, GROUP_SIZE};

use crate::cmd::parse::HexBytes;
use crate::cmd::DecodeArgs;
use crate::exit::{frame_error, CliResult};
use crate::output::{print_execute_output, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let HexBytes(received) = &args.received;
    let mut command = args.command.build()?;
    if command.rx_length().is_none() {
        let rx_length = logical_length(command.framing(), received.len());
        command = command.with_rx_length(rx_length);
    }
    let response = command
        .decode(received)
        .map_err(|err| frame_error("decode failed", err))?;
    Ok(print_execute_output(ExecuteOutput::Single(response), format))
}

/// Data bytes carried by `physical` received bytes when no response length
/// was given.
fn logical_length(framing: &Framing, physical: usize) -> usize {
    match framing {
        Framing::Raw => physical,
        Framing::Checksummed(_) | Framing::ChecksummedWords(_) => {
            physical - physical / GROUP_SIZE
        }
    }
}
