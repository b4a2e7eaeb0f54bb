//! I2C transceiver abstraction.
//!
//! A transceiver performs one write/read cycle on the bus and hands back the
//! raw outcome per channel:
//! - a status code from the version 1 transceiver API
//! - an optional error detail supplied by the hardware layer
//! - whatever bytes were received
//!
//! This is the lowest layer of i2cprims. It knows nothing about checksums or
//! command framing; that lives in `i2cprims-frame`.

pub mod error;
pub mod traits;

#[cfg(target_os = "linux")]
pub mod linux;

pub use error::{Result, TransportError};
pub use traits::{
    status, ChannelResult, I2cTransceiver, TransceiveOutput, TransceiveRequest,
    TransceiverErrorDetail, API_VERSION_1,
};

#[cfg(target_os = "linux")]
pub use linux::LinuxI2cTransceiver;
