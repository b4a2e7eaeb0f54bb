use crate::cmd::TransceiveArgs;
use crate::exit::CliResult;
use crate::output::OutputFormat;

#[cfg(target_os = "linux")]
pub fn run(args: TransceiveArgs, format: OutputFormat) -> CliResult<i32> {
    use i2cprims_connection::{ConnectionConfig, I2cConnection};
    use i2cprims_transport::LinuxI2cTransceiver;
    use tracing::info;

    use crate::exit::{i2c_error, transport_error};
    use crate::output::print_execute_output;

    let command = args
        .command
        .build()?
        .with_post_processing_time(args.post_processing_time);
    let transceiver = LinuxI2cTransceiver::open(&args.device)
        .map_err(|err| transport_error("open failed", err))?;
    let config = ConnectionConfig {
        always_multi_channel_response: args.always_multi_channel,
        wait_post_process: !args.no_wait,
    };
    let mut connection = I2cConnection::with_config(transceiver, config)
        .map_err(|err| i2c_error("connection failed", err))?;

    info!(
        device = %args.device.display(),
        address = args.address,
        "executing command"
    );
    let output = connection
        .execute(args.address, &command)
        .map_err(|err| i2c_error("transceive failed", err))?;
    Ok(print_execute_output(output, format))
}

#[cfg(not(target_os = "linux"))]
pub fn run(args: TransceiveArgs, _format: OutputFormat) -> CliResult<i32> {
    Err(crate::exit::CliError::new(
        crate::exit::USAGE,
        format!(
            "{}: transceive needs the Linux i2c-dev interface",
            args.device.display()
        ),
    ))
}
