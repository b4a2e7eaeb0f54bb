//! Channel response interpretation.
//!
//! Turns raw transceiver output into interpreted data. Every channel is
//! classified and decoded on its own, so a failure on one channel never hides
//! the data of another. Only afterwards is the output shape decided:
//! multi-channel output is a list of per-channel results, single-channel
//! output returns the data or the error directly.

use bytes::Bytes;
use i2cprims_frame::Response;
use i2cprims_transport::{status, ChannelResult, TransceiveOutput};
use tracing::debug;

use crate::error::{I2cError, Result};

/// Interpreted result of one channel.
pub type ChannelResponse = Result<Option<Response>>;

/// Interpreted output of one command execution.
#[derive(Debug)]
pub enum ExecuteOutput {
    /// Single-channel mode: the interpreted data of the only channel.
    Single(Option<Response>),
    /// Multi-channel mode: one entry per channel, errors kept as values.
    Multi(Vec<ChannelResponse>),
}

impl ExecuteOutput {
    /// The single-channel data, `None` in multi-channel mode.
    pub fn into_single(self) -> Option<Option<Response>> {
        match self {
            ExecuteOutput::Single(response) => Some(response),
            ExecuteOutput::Multi(_) => None,
        }
    }

    /// Per-channel results. Single-channel output becomes a one-element list.
    pub fn into_channels(self) -> Vec<ChannelResponse> {
        match self {
            ExecuteOutput::Single(response) => vec![Ok(response)],
            ExecuteOutput::Multi(responses) => responses,
        }
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, ExecuteOutput::Multi(_))
    }
}

/// Map a transceiver status onto received data or a typed error.
///
/// Unknown status codes become [`I2cError::Transceive`].
pub fn classify(result: ChannelResult) -> Result<Bytes> {
    let ChannelResult {
        status: code,
        error: transceiver_error,
        rx_data: received_data,
    } = result;
    match code {
        status::OK => Ok(received_data),
        status::CHANNEL_DISABLED => Err(I2cError::ChannelDisabled {
            transceiver_error,
            received_data,
        }),
        status::NACK => Err(I2cError::Nack {
            transceiver_error,
            received_data,
        }),
        status::TIMEOUT => Err(I2cError::Timeout {
            transceiver_error,
            received_data,
        }),
        other => Err(I2cError::Transceive {
            status: other,
            transceiver_error,
            received_data,
        }),
    }
}

/// Classify and decode the result of one channel.
pub fn interpret_channel<F>(result: ChannelResult, decode: &F) -> ChannelResponse
where
    F: Fn(&[u8]) -> i2cprims_frame::Result<Option<Response>>,
{
    let data = classify(result)?;
    Ok(decode(&data)?)
}

/// Interpret the whole transceiver output.
///
/// With `always_multi_channel` set, single-channel output is reported like
/// multi-channel output and its error is returned instead of raised.
pub fn interpret<F>(
    output: TransceiveOutput,
    always_multi_channel: bool,
    decode: F,
) -> Result<ExecuteOutput>
where
    F: Fn(&[u8]) -> i2cprims_frame::Result<Option<Response>>,
{
    match output {
        TransceiveOutput::Multi(results) => {
            let responses: Vec<ChannelResponse> = results
                .into_iter()
                .map(|result| interpret_channel(result, &decode))
                .collect();
            for (channel, response) in responses.iter().enumerate() {
                if let Err(err) = response {
                    debug!(channel, error = %err, "channel failed");
                }
            }
            Ok(ExecuteOutput::Multi(responses))
        }
        TransceiveOutput::Single(result) => {
            let response = interpret_channel(result, &decode);
            if always_multi_channel {
                if let Err(err) = &response {
                    debug!(channel = 0, error = %err, "channel failed");
                }
                Ok(ExecuteOutput::Multi(vec![response]))
            } else {
                response.map(ExecuteOutput::Single)
            }
        }
    }
}
