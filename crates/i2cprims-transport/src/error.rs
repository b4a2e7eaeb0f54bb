use std::path::PathBuf;

/// Errors that can occur while setting up an I2C transceiver.
///
/// Failures of an individual transfer are not reported through this type;
/// they come back as a status code inside [`crate::ChannelResult`].
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to open the bus device.
    #[error("failed to open I2C device {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, TransportError>;
