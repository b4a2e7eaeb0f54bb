//! Checksummed I2C command framing and multi-channel response handling.
//!
//! i2cprims turns logical sensor commands into the exact bytes written on an
//! I2C bus, verifies the per-word CRC of every received word, and reports the
//! results of transceivers driving several buses at once per channel.
//!
//! # Crate Structure
//!
//! - [`transport`]: transceiver trait, status codes, Linux i2c-dev transceiver
//! - [`frame`]: CRC engine, commands, encoding and decoding
//! - [`connection`]: command execution and response interpretation
//!
//! # Example
//!
//! ```
//! use i2cprims::frame::{I2cCommand, Response, CRC8_SENSIRION};
//!
//! let command = I2cCommand::checksummed_words(CRC8_SENSIRION)?
//!     .with_command(0x1337u16)
//!     .with_rx_length(4);
//! assert_eq!(command.encode().as_ref(), b"\x13\x37\x90");
//!
//! let response = command.decode(b"\xDE\xAD\x98\xBE\xEF\x92")?;
//! assert_eq!(response, Some(Response::Words(vec![0xDEAD, 0xBEEF])));
//! # Ok::<(), i2cprims::frame::FrameError>(())
//! ```

/// Re-export transport types.
pub mod transport {
    pub use i2cprims_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use i2cprims_frame::*;
}

/// Re-export connection types.
pub mod connection {
    pub use i2cprims_connection::*;
}
