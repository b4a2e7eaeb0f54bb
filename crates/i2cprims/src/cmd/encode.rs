use crate::cmd::EncodeArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_encoded, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let command = args.command.build()?;
    print_encoded(&command.encode(), command.physical_rx_length(), format);
    Ok(SUCCESS)
}
