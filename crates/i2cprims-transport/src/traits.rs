use std::fmt;
use std::time::Duration;

use bytes::Bytes;

/// The only transceiver API version this crate family understands.
pub const API_VERSION_1: u32 = 1;

/// Status codes returned by version 1 transceivers.
///
/// Codes not listed here are valid too; they are reported upward as a
/// generic transceive failure.
pub mod status {
    /// Transfer completed.
    pub const OK: u8 = 0;
    /// The physical channel is disabled.
    pub const CHANNEL_DISABLED: u8 = 1;
    /// A byte was not acknowledged by the slave.
    pub const NACK: u8 = 2;
    /// The transfer did not complete within the allotted time.
    pub const TIMEOUT: u8 = 3;
    /// Any other failure.
    pub const UNSPECIFIED_ERROR: u8 = 4;
}

/// Raw error detail a transceiver attaches to a failed transfer.
pub type TransceiverErrorDetail = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Parameters of one write/read cycle.
#[derive(Debug, Clone, Copy)]
pub struct TransceiveRequest<'a> {
    /// 7-bit slave address.
    pub slave_address: u8,
    /// Bytes to write, or `None` to skip the write phase.
    pub tx_data: Option<&'a [u8]>,
    /// Bytes to read (physical count), or `None` to skip the read phase.
    pub rx_length: Option<usize>,
    /// Delay between the write and the read phase.
    pub read_delay: Duration,
    /// Upper bound for the whole transfer.
    pub timeout: Duration,
}

/// Outcome of a transfer on one channel.
pub struct ChannelResult {
    /// One of the [`status`] codes, or a transceiver specific code.
    pub status: u8,
    /// Error detail from the hardware layer, if any.
    pub error: Option<TransceiverErrorDetail>,
    /// Bytes received, possibly partial on failure.
    pub rx_data: Bytes,
}

impl ChannelResult {
    /// A successful transfer.
    pub fn ok(rx_data: impl Into<Bytes>) -> Self {
        Self {
            status: status::OK,
            error: None,
            rx_data: rx_data.into(),
        }
    }

    /// A failed transfer.
    pub fn failed(
        status: u8,
        error: Option<TransceiverErrorDetail>,
        rx_data: impl Into<Bytes>,
    ) -> Self {
        Self {
            status,
            error,
            rx_data: rx_data.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == status::OK
    }
}

impl fmt::Debug for ChannelResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelResult")
            .field("status", &self.status)
            .field("error", &self.error.as_ref().map(|e| e.to_string()))
            .field("rx_data", &self.rx_data)
            .finish()
    }
}

/// What a transceiver returns: one result, or one per channel.
#[derive(Debug)]
pub enum TransceiveOutput {
    Single(ChannelResult),
    Multi(Vec<ChannelResult>),
}

impl TransceiveOutput {
    /// Number of channel results carried.
    pub fn len(&self) -> usize {
        match self {
            TransceiveOutput::Single(_) => 1,
            TransceiveOutput::Multi(results) => results.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A hardware adapter able to run I2C write/read cycles.
///
/// Implementations report the API version they follow; connections reject
/// versions they do not support when they are constructed.
pub trait I2cTransceiver {
    /// Transceiver API version, see [`API_VERSION_1`].
    fn api_version(&self) -> u32;

    /// Human readable description of the adapter (device path, serial, ...).
    fn description(&self) -> &str;

    /// `None` for single-channel adapters, otherwise the channel count.
    fn channel_count(&self) -> Option<usize>;

    /// Run one write/read cycle. Never blocks longer than the request's
    /// timeout plus read delay, as far as the hardware allows.
    fn transceive(&mut self, request: &TransceiveRequest<'_>) -> TransceiveOutput;
}

impl<T: I2cTransceiver + ?Sized> I2cTransceiver for Box<T> {
    fn api_version(&self) -> u32 {
        (**self).api_version()
    }

    fn description(&self) -> &str {
        (**self).description()
    }

    fn channel_count(&self) -> Option<usize> {
        (**self).channel_count()
    }

    fn transceive(&mut self, request: &TransceiveRequest<'_>) -> TransceiveOutput {
        (**self).transceive(request)
    }
}

impl<T: I2cTransceiver + ?Sized> I2cTransceiver for &mut T {
    fn api_version(&self) -> u32 {
        (**self).api_version()
    }

    fn description(&self) -> &str {
        (**self).description()
    }

    fn channel_count(&self) -> Option<usize> {
        (**self).channel_count()
    }

    fn transceive(&mut self, request: &TransceiveRequest<'_>) -> TransceiveOutput {
        (**self).transceive(request)
    }
}
