use std::thread;
use std::time::Duration;

use i2cprims_frame::I2cCommand;
use i2cprims_transport::{I2cTransceiver, TransceiveOutput, TransceiveRequest, API_VERSION_1};
use tracing::{debug, trace};

use crate::error::{I2cError, Result};
use crate::interpret::{interpret, ExecuteOutput};

/// Runtime options of an [`I2cConnection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Report single-channel results like multi-channel ones: as a list,
    /// with errors returned instead of raised.
    pub always_multi_channel_response: bool,
    /// Sleep for the command's post-processing time after `execute`.
    pub wait_post_process: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            always_multi_channel_response: false,
            wait_post_process: true,
        }
    }
}

/// Transceiver protocol selected from the reported API version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Protocol {
    V1,
}

impl Protocol {
    fn for_api_version(version: u32) -> Result<Self> {
        match version {
            API_VERSION_1 => Ok(Protocol::V1),
            other => Err(I2cError::UnsupportedApiVersion(other)),
        }
    }
}

/// Executes I2C commands on a transceiver.
///
/// A connection is not bound to a slave address; see
/// [`I2cDevice`](crate::I2cDevice) for that.
pub struct I2cConnection<T: I2cTransceiver> {
    transceiver: T,
    protocol: Protocol,
    config: ConnectionConfig,
}

impl<T: I2cTransceiver> I2cConnection<T> {
    /// Wrap a transceiver with the default configuration.
    ///
    /// Fails with [`I2cError::UnsupportedApiVersion`] for transceivers not
    /// speaking API version 1.
    pub fn new(transceiver: T) -> Result<Self> {
        Self::with_config(transceiver, ConnectionConfig::default())
    }

    pub fn with_config(transceiver: T, config: ConnectionConfig) -> Result<Self> {
        let protocol = Protocol::for_api_version(transceiver.api_version())?;
        debug!(
            transceiver = transceiver.description(),
            api_version = transceiver.api_version(),
            channels = ?transceiver.channel_count(),
            "I2C connection opened"
        );
        Ok(Self {
            transceiver,
            protocol,
            config,
        })
    }

    pub fn transceiver(&self) -> &T {
        &self.transceiver
    }

    pub fn transceiver_mut(&mut self) -> &mut T {
        &mut self.transceiver
    }

    pub fn into_inner(self) -> T {
        self.transceiver
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn always_multi_channel_response(&self) -> bool {
        self.config.always_multi_channel_response
    }

    pub fn set_always_multi_channel_response(&mut self, value: bool) {
        self.config.always_multi_channel_response = value;
    }

    /// True if responses are reported per channel.
    pub fn is_multi_channel(&self) -> bool {
        self.transceiver.channel_count().is_some() || self.config.always_multi_channel_response
    }

    /// Write the command, read its response and interpret it.
    ///
    /// In single-channel mode a failed transfer or a wrong checksum is
    /// returned as `Err`. In multi-channel mode errors are reported per
    /// channel and only a connection level failure is `Err`.
    pub fn execute(&mut self, slave_address: u8, command: &I2cCommand) -> Result<ExecuteOutput> {
        let wait = self.config.wait_post_process;
        self.execute_with(slave_address, command, wait)
    }

    /// Like [`execute`](Self::execute) with an explicit post-processing wait.
    pub fn execute_with(
        &mut self,
        slave_address: u8,
        command: &I2cCommand,
        wait_post_process: bool,
    ) -> Result<ExecuteOutput> {
        let tx_data = command.tx_data();
        let request = TransceiveRequest {
            slave_address,
            tx_data: tx_data.as_deref(),
            rx_length: command.physical_rx_length(),
            read_delay: command.read_delay(),
            timeout: command.timeout(),
        };
        let result = self.transceive(&request, |raw| command.decode(raw));
        if wait_post_process && !command.post_processing_time().is_zero() {
            trace!(
                wait_ms = command.post_processing_time().as_millis() as u64,
                "waiting for post processing"
            );
            thread::sleep(command.post_processing_time());
        }
        result
    }

    /// Perform only the write phase of a command.
    pub fn write(&mut self, slave_address: u8, command: &I2cCommand) -> Result<ExecuteOutput> {
        let tx_data = command.tx_data();
        let request = TransceiveRequest {
            slave_address,
            tx_data: tx_data.as_deref(),
            rx_length: None,
            read_delay: Duration::ZERO,
            timeout: command.timeout(),
        };
        self.transceive(&request, |_| Ok(None))
    }

    /// Perform only the read phase of a command and interpret the response
    /// with it.
    pub fn read(&mut self, slave_address: u8, command: &I2cCommand) -> Result<ExecuteOutput> {
        let request = TransceiveRequest {
            slave_address,
            tx_data: None,
            rx_length: command.physical_rx_length(),
            read_delay: Duration::ZERO,
            timeout: command.timeout(),
        };
        self.transceive(&request, |raw| command.decode(raw))
    }

    fn transceive<F>(&mut self, request: &TransceiveRequest<'_>, decode: F) -> Result<ExecuteOutput>
    where
        F: Fn(&[u8]) -> i2cprims_frame::Result<Option<i2cprims_frame::Response>>,
    {
        let output = match self.protocol {
            Protocol::V1 => self.transceive_v1(request),
        };
        interpret(output, self.config.always_multi_channel_response, decode)
    }

    fn transceive_v1(&mut self, request: &TransceiveRequest<'_>) -> TransceiveOutput {
        debug!(
            slave_address = request.slave_address,
            tx_len = request.tx_data.map_or(0, <[u8]>::len),
            rx_len = ?request.rx_length,
            "transceive"
        );
        if let Some(tx) = request.tx_data {
            trace!(tx = ?tx, "tx bytes");
        }
        let output = self.transceiver.transceive(request);
        // Multi-channel transceivers report per-channel even for one channel.
        match (output, self.transceiver.channel_count()) {
            (TransceiveOutput::Single(result), Some(_)) => TransceiveOutput::Multi(vec![result]),
            (output, _) => output,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use bytes::Bytes;
    use i2cprims_frame::{FrameError, Response, CRC8_SENSIRION};
    use i2cprims_transport::{status, ChannelResult};

    use super::*;
    use crate::testing::{RecordedCall, ScriptedTransceiver};

    fn words_cmd() -> I2cCommand {
        I2cCommand::checksummed_words(CRC8_SENSIRION)
            .expect("8-bit CRC should be accepted")
            .with_command(0x1337u16)
            .with_rx_length(4)
            .with_read_delay(Duration::from_millis(1))
            .with_timeout(Duration::from_millis(50))
    }

    #[test]
    fn rejects_unsupported_api_version() {
        let transceiver = ScriptedTransceiver::single().with_api_version(2);
        assert!(matches!(
            I2cConnection::new(transceiver),
            Err(I2cError::UnsupportedApiVersion(2))
        ));
    }

    #[test]
    fn default_config() {
        let config = ConnectionConfig::default();
        assert!(!config.always_multi_channel_response);
        assert!(config.wait_post_process);
    }

    #[test]
    fn execute_passes_command_to_transceiver() {
        let mut transceiver = ScriptedTransceiver::single();
        transceiver.push_single(ChannelResult::ok(Bytes::from_static(
            b"\xDE\xAD\x98\xBE\xEF\x92",
        )));
        let mut connection = I2cConnection::new(transceiver).expect("v1 should be supported");

        let output = connection
            .execute(0x42, &words_cmd())
            .expect("execute should succeed");
        assert_eq!(
            output.into_single(),
            Some(Some(Response::Words(vec![0xDEAD, 0xBEEF])))
        );
        assert_eq!(
            connection.transceiver().calls,
            vec![RecordedCall {
                slave_address: 0x42,
                tx_data: Some(vec![0x13, 0x37, 0x90]),
                rx_length: Some(6),
                read_delay: Duration::from_millis(1),
                timeout: Duration::from_millis(50),
            }]
        );
    }

    #[test]
    fn execute_without_tx_data_skips_write_phase() {
        let mut transceiver = ScriptedTransceiver::single();
        transceiver.push_single(ChannelResult::ok(Bytes::from_static(b"\x01\x02")));
        let mut connection = I2cConnection::new(transceiver).expect("v1 should be supported");

        let command = I2cCommand::raw().with_rx_length(2);
        let output = connection
            .execute(0x10, &command)
            .expect("execute should succeed");
        assert_eq!(
            output.into_single(),
            Some(Some(Response::Bytes(Bytes::from_static(b"\x01\x02"))))
        );
        assert_eq!(connection.transceiver().calls[0].tx_data, None);
        assert_eq!(connection.transceiver().calls[0].rx_length, Some(2));
    }

    #[test]
    fn single_channel_error_is_raised() {
        let mut transceiver = ScriptedTransceiver::single();
        transceiver.push_single(ChannelResult::failed(
            status::NACK,
            Some("not acknowledged".into()),
            Bytes::new(),
        ));
        let mut connection = I2cConnection::new(transceiver).expect("v1 should be supported");
        assert!(!connection.is_multi_channel());

        let err = connection.execute(0x42, &words_cmd()).unwrap_err();
        assert!(matches!(err, I2cError::Nack { .. }));
    }

    #[test]
    fn single_channel_checksum_error_is_raised() {
        let mut transceiver = ScriptedTransceiver::single();
        transceiver.push_single(ChannelResult::ok(Bytes::from_static(
            b"\xDE\xAD\x98\xBE\xEF\x93",
        )));
        let mut connection = I2cConnection::new(transceiver).expect("v1 should be supported");

        let err = connection.execute(0x42, &words_cmd()).unwrap_err();
        assert!(matches!(
            err,
            I2cError::Frame(FrameError::Checksum {
                received: 0x93,
                expected: 0x92,
                ..
            })
        ));
        assert_eq!(err.received_data(), b"\xBE\xEF");
    }

    #[test]
    fn always_multi_channel_returns_list() {
        let mut transceiver = ScriptedTransceiver::single();
        transceiver.push_single(ChannelResult::failed(status::TIMEOUT, None, Bytes::new()));
        let mut connection = I2cConnection::with_config(
            transceiver,
            ConnectionConfig {
                always_multi_channel_response: true,
                ..ConnectionConfig::default()
            },
        )
        .expect("v1 should be supported");
        assert!(connection.is_multi_channel());

        let responses = connection
            .execute(0x42, &words_cmd())
            .expect("errors should be returned as values")
            .into_channels();
        assert_eq!(responses.len(), 1);
        assert!(matches!(responses[0], Err(I2cError::Timeout { .. })));
    }

    #[test]
    fn mode_switch_can_be_toggled() {
        let mut connection =
            I2cConnection::new(ScriptedTransceiver::single()).expect("v1 should be supported");
        assert!(!connection.always_multi_channel_response());
        connection.set_always_multi_channel_response(true);
        assert!(connection.always_multi_channel_response());
        assert!(connection.config().always_multi_channel_response);
        assert!(connection.is_multi_channel());
    }

    #[test]
    fn multi_channel_transceiver_reports_per_channel() {
        let mut transceiver = ScriptedTransceiver::multi(2);
        transceiver.push(TransceiveOutput::Multi(vec![
            ChannelResult::ok(Bytes::from_static(b"\xDE\xAD\x98\xBE\xEF\x92")),
            ChannelResult::failed(status::NACK, Some("NACK".into()), Bytes::new()),
        ]));
        let mut connection = I2cConnection::new(transceiver).expect("v1 should be supported");
        assert!(connection.is_multi_channel());

        let responses = connection
            .execute(0x42, &words_cmd())
            .expect("errors should be returned as values")
            .into_channels();
        assert_eq!(responses.len(), 2);
        assert_eq!(
            responses[0].as_ref().expect("channel 0 should succeed"),
            &Some(Response::Words(vec![0xDEAD, 0xBEEF]))
        );
        assert!(matches!(responses[1], Err(I2cError::Nack { .. })));
    }

    #[test]
    fn multi_channel_transceiver_single_output_becomes_list() {
        let mut transceiver = ScriptedTransceiver::multi(1);
        transceiver.push_single(ChannelResult::ok(Bytes::from_static(
            b"\xDE\xAD\x98\xBE\xEF\x92",
        )));
        let mut connection = I2cConnection::new(transceiver).expect("v1 should be supported");

        let output = connection
            .execute(0x42, &words_cmd())
            .expect("execute should succeed");
        assert!(output.is_multi());
        assert_eq!(output.into_channels().len(), 1);
    }

    #[test]
    fn write_skips_read_phase() {
        let mut transceiver = ScriptedTransceiver::single();
        transceiver.push_single(ChannelResult::ok(Bytes::new()));
        let mut connection = I2cConnection::new(transceiver).expect("v1 should be supported");

        let output = connection
            .write(0x42, &words_cmd())
            .expect("write should succeed");
        assert_eq!(output.into_single(), Some(None));

        let call = &connection.transceiver().calls[0];
        assert_eq!(call.tx_data.as_deref(), Some(&[0x13, 0x37, 0x90][..]));
        assert_eq!(call.rx_length, None);
        assert_eq!(call.read_delay, Duration::ZERO);
        assert_eq!(call.timeout, Duration::from_millis(50));
    }

    #[test]
    fn read_skips_write_phase() {
        let mut transceiver = ScriptedTransceiver::single();
        transceiver.push_single(ChannelResult::ok(Bytes::from_static(
            b"\xBE\xEF\x92\xDE\xAD\x98",
        )));
        let mut connection = I2cConnection::new(transceiver).expect("v1 should be supported");

        let output = connection
            .read(0x42, &words_cmd())
            .expect("read should succeed");
        assert_eq!(
            output.into_single(),
            Some(Some(Response::Words(vec![0xBEEF, 0xDEAD])))
        );

        let call = &connection.transceiver().calls[0];
        assert_eq!(call.tx_data, None);
        assert_eq!(call.rx_length, Some(6));
        assert_eq!(call.read_delay, Duration::ZERO);
    }

    #[test]
    fn execute_waits_for_post_processing() {
        let mut transceiver = ScriptedTransceiver::single();
        transceiver.push_single(ChannelResult::ok(Bytes::new()));
        let mut connection = I2cConnection::new(transceiver).expect("v1 should be supported");

        let command = I2cCommand::raw()
            .with_command(0x3608u16)
            .with_post_processing_time(Duration::from_millis(20));
        let start = Instant::now();
        connection
            .execute(0x42, &command)
            .expect("execute should succeed");
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn execute_with_can_skip_post_processing_wait() {
        let mut transceiver = ScriptedTransceiver::single();
        transceiver.push_single(ChannelResult::ok(Bytes::new()));
        let mut connection = I2cConnection::new(transceiver).expect("v1 should be supported");

        let command = I2cCommand::raw()
            .with_command(0x3608u16)
            .with_post_processing_time(Duration::from_secs(10));
        let start = Instant::now();
        connection
            .execute_with(0x42, &command, false)
            .expect("execute should succeed");
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn into_inner_returns_transceiver() {
        let connection =
            I2cConnection::new(ScriptedTransceiver::multi(4)).expect("v1 should be supported");
        assert_eq!(connection.into_inner().channel_count(), Some(4));
    }
}
