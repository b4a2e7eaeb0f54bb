use std::fmt;
use std::io;

use i2cprims_connection::I2cError;
use i2cprims_frame::FrameError;
use i2cprims_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut => TIMEOUT,
        io::ErrorKind::NotFound => FAILURE,
        _ => TRANSPORT_ERROR,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    let TransportError::Open { path, source } = err;
    io_error(&format!("{context}: {}", path.display()), source)
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    let code = match err {
        FrameError::Checksum { .. } | FrameError::Misaligned { .. } => DATA_INVALID,
        FrameError::UnsupportedWidth(_) | FrameError::ChecksumWidth(_) => USAGE,
    };
    CliError::new(code, format!("{context}: {err}"))
}

/// Exit code for an I2C error, shared by raised errors and per-channel ones.
pub fn i2c_error_code(err: &I2cError) -> i32 {
    match err {
        I2cError::Frame(FrameError::Checksum { .. } | FrameError::Misaligned { .. }) => {
            DATA_INVALID
        }
        I2cError::Frame(_) | I2cError::NoPreviousCommand => USAGE,
        I2cError::Timeout { .. } => TIMEOUT,
        I2cError::Transceive { .. } | I2cError::ChannelDisabled { .. } | I2cError::Nack { .. } => {
            TRANSPORT_ERROR
        }
        I2cError::UnsupportedApiVersion(_) => INTERNAL,
    }
}

pub fn i2c_error(context: &str, err: I2cError) -> CliError {
    CliError::new(i2c_error_code(&err), format!("{context}: {err}"))
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    #[test]
    fn checksum_errors_are_invalid_data() {
        let err = FrameError::Checksum {
            received: 0x93,
            expected: 0x92,
            data: Bytes::from_static(b"\xBE\xEF"),
        };
        assert_eq!(frame_error("decode failed", err.clone()).code, DATA_INVALID);
        assert_eq!(i2c_error("execute failed", err.into()).code, DATA_INVALID);
    }

    #[test]
    fn bus_failures_map_to_transport_and_timeout() {
        let nack = I2cError::Nack {
            transceiver_error: None,
            received_data: Bytes::new(),
        };
        let timeout = I2cError::Timeout {
            transceiver_error: None,
            received_data: Bytes::new(),
        };
        assert_eq!(i2c_error_code(&nack), TRANSPORT_ERROR);
        assert_eq!(i2c_error_code(&timeout), TIMEOUT);
    }

    #[test]
    fn open_permission_denied() {
        let err = TransportError::Open {
            path: "/dev/i2c-1".into(),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        let cli = transport_error("open failed", err);
        assert_eq!(cli.code, PERMISSION_DENIED);
        assert!(cli.message.starts_with("open failed: /dev/i2c-1"));
    }

    #[test]
    fn open_missing_device_keeps_path_and_cause() {
        let err = TransportError::Open {
            path: "/dev/i2c-9".into(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        let cli = transport_error("open failed", err);
        assert_eq!(cli.code, FAILURE);
        assert!(cli.message.starts_with("open failed: /dev/i2c-9: "));
        assert!(cli.message.contains("not found"));
    }
}
