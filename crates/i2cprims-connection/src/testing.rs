use std::collections::VecDeque;
use std::time::Duration;

use i2cprims_transport::{
    status, ChannelResult, I2cTransceiver, TransceiveOutput, TransceiveRequest, API_VERSION_1,
};

/// One recorded `transceive` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecordedCall {
    pub slave_address: u8,
    pub tx_data: Option<Vec<u8>>,
    pub rx_length: Option<usize>,
    pub read_delay: Duration,
    pub timeout: Duration,
}

/// Transceiver returning queued outputs and recording every request.
pub(crate) struct ScriptedTransceiver {
    api_version: u32,
    channel_count: Option<usize>,
    outputs: VecDeque<TransceiveOutput>,
    pub calls: Vec<RecordedCall>,
}

impl ScriptedTransceiver {
    pub fn single() -> Self {
        Self {
            api_version: API_VERSION_1,
            channel_count: None,
            outputs: VecDeque::new(),
            calls: Vec::new(),
        }
    }

    pub fn multi(channel_count: usize) -> Self {
        Self {
            channel_count: Some(channel_count),
            ..Self::single()
        }
    }

    pub fn with_api_version(mut self, api_version: u32) -> Self {
        self.api_version = api_version;
        self
    }

    pub fn push(&mut self, output: TransceiveOutput) {
        self.outputs.push_back(output);
    }

    pub fn push_single(&mut self, result: ChannelResult) {
        self.push(TransceiveOutput::Single(result));
    }
}

impl I2cTransceiver for ScriptedTransceiver {
    fn api_version(&self) -> u32 {
        self.api_version
    }

    fn description(&self) -> &str {
        "scripted"
    }

    fn channel_count(&self) -> Option<usize> {
        self.channel_count
    }

    fn transceive(&mut self, request: &TransceiveRequest<'_>) -> TransceiveOutput {
        self.calls.push(RecordedCall {
            slave_address: request.slave_address,
            tx_data: request.tx_data.map(<[u8]>::to_vec),
            rx_length: request.rx_length,
            read_delay: request.read_delay,
            timeout: request.timeout,
        });
        self.outputs.pop_front().unwrap_or_else(|| {
            TransceiveOutput::Single(ChannelResult::failed(
                status::UNSPECIFIED_ERROR,
                Some("no scripted output left".into()),
                Vec::new(),
            ))
        })
    }
}
