//! I2C command execution on single- and multi-channel transceivers.
//!
//! [`I2cConnection`] writes encoded commands through an
//! [`I2cTransceiver`](i2cprims_transport::I2cTransceiver), maps transceiver
//! status codes to [`I2cError`] and decodes the received data. Transceivers
//! driving several buses at once report one result per channel; a failure on
//! one channel is returned next to the data of the others instead of being
//! raised.

pub mod connection;
pub mod device;
pub mod error;
pub mod interpret;

#[cfg(test)]
mod testing;

pub use connection::{ConnectionConfig, I2cConnection};
pub use device::I2cDevice;
pub use error::{I2cError, Result};
pub use interpret::{classify, interpret, interpret_channel, ChannelResponse, ExecuteOutput};
