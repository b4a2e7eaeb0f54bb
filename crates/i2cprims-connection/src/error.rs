use bytes::Bytes;
use i2cprims_frame::FrameError;
use i2cprims_transport::TransceiverErrorDetail;

/// Errors that can occur while executing I2C commands.
#[derive(Debug, thiserror::Error)]
pub enum I2cError {
    /// Encoding or decoding failed, e.g. a received checksum is wrong.
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// The transceiver reported a status code without a dedicated variant.
    #[error("I2C transceive failed: {}", detail_text(.transceiver_error))]
    Transceive {
        status: u8,
        transceiver_error: Option<TransceiverErrorDetail>,
        received_data: Bytes,
    },

    /// The physical channel is disabled.
    #[error("I2C transceive failed: Channel is disabled ({}).", detail_text(.transceiver_error))]
    ChannelDisabled {
        transceiver_error: Option<TransceiverErrorDetail>,
        received_data: Bytes,
    },

    /// A byte was not acknowledged on the bus.
    #[error("I2C transceive failed: NACK (byte not acknowledged).")]
    Nack {
        transceiver_error: Option<TransceiverErrorDetail>,
        received_data: Bytes,
    },

    /// The transfer did not complete in time.
    #[error("I2C transceive failed: Timeout.")]
    Timeout {
        transceiver_error: Option<TransceiverErrorDetail>,
        received_data: Bytes,
    },

    /// The transceiver speaks an API version this crate does not support.
    #[error(
        "The I2C transceiver API version {0} is not supported. \
         You might need to update the i2cprims crates."
    )]
    UnsupportedApiVersion(u32),

    /// A device read was requested before any command was executed on it.
    #[error("no command has been executed on this device yet")]
    NoPreviousCommand,
}

impl I2cError {
    /// Bytes received before the error occurred, empty when there are none.
    pub fn received_data(&self) -> &[u8] {
        match self {
            I2cError::Frame(err) => err.received_data(),
            I2cError::Transceive { received_data, .. }
            | I2cError::ChannelDisabled { received_data, .. }
            | I2cError::Nack { received_data, .. }
            | I2cError::Timeout { received_data, .. } => received_data,
            I2cError::UnsupportedApiVersion(_) | I2cError::NoPreviousCommand => &[],
        }
    }

    /// Error detail supplied by the transceiver, if any.
    pub fn transceiver_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            I2cError::Transceive {
                transceiver_error, ..
            }
            | I2cError::ChannelDisabled {
                transceiver_error, ..
            }
            | I2cError::Nack {
                transceiver_error, ..
            }
            | I2cError::Timeout {
                transceiver_error, ..
            } => transceiver_error.as_deref(),
            _ => None,
        }
    }

    /// True for a wrong checksum in received data.
    pub fn is_checksum(&self) -> bool {
        matches!(self, I2cError::Frame(FrameError::Checksum { .. }))
    }
}

fn detail_text(detail: &Option<TransceiverErrorDetail>) -> String {
    match detail {
        Some(err) => err.to_string(),
        None => "unknown error".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, I2cError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(msg: &str) -> Option<TransceiverErrorDetail> {
        Some(msg.into())
    }

    #[test]
    fn checksum_error() {
        let err = I2cError::from(FrameError::Checksum {
            received: 0x11,
            expected: 0x22,
            data: Bytes::from_static(b"\x55"),
        });
        assert!(err.is_checksum());
        assert_eq!(err.received_data(), b"\x55");
        assert!(err.transceiver_error().is_none());
        assert_eq!(
            err.to_string(),
            "I2C error: Received wrong checksum 0x11 (expected 0x22)."
        );
    }

    #[test]
    fn transceive_error() {
        let err = I2cError::Transceive {
            status: 42,
            transceiver_error: detail("Hello world"),
            received_data: Bytes::from_static(b"\x55"),
        };
        assert_eq!(err.received_data(), b"\x55");
        assert_eq!(
            err.transceiver_error().map(|e| e.to_string()).as_deref(),
            Some("Hello world")
        );
        assert_eq!(err.to_string(), "I2C transceive failed: Hello world");
    }

    #[test]
    fn channel_disabled_error() {
        let err = I2cError::ChannelDisabled {
            transceiver_error: detail("42"),
            received_data: Bytes::from_static(b"\x55"),
        };
        assert_eq!(err.received_data(), b"\x55");
        assert_eq!(
            err.to_string(),
            "I2C transceive failed: Channel is disabled (42)."
        );
    }

    #[test]
    fn nack_error() {
        let err = I2cError::Nack {
            transceiver_error: detail("42"),
            received_data: Bytes::from_static(b"\x55"),
        };
        assert_eq!(err.received_data(), b"\x55");
        assert!(!err.is_checksum());
        assert_eq!(
            err.to_string(),
            "I2C transceive failed: NACK (byte not acknowledged)."
        );
    }

    #[test]
    fn timeout_error() {
        let err = I2cError::Timeout {
            transceiver_error: None,
            received_data: Bytes::new(),
        };
        assert!(err.received_data().is_empty());
        assert!(err.transceiver_error().is_none());
        assert_eq!(err.to_string(), "I2C transceive failed: Timeout.");
    }

    #[test]
    fn unsupported_api_version_error() {
        let err = I2cError::UnsupportedApiVersion(99);
        assert!(err.to_string().contains("99 is not supported"));
    }
}
