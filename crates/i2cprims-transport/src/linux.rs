use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::os::fd::AsRawFd;
use std::path::{Path, PathBuf};
use std::time::Duration;

use bytes::Bytes;
use tracing::{debug, trace};

use crate::error::{Result, TransportError};
use crate::traits::{
    status, ChannelResult, I2cTransceiver, TransceiveOutput, TransceiveRequest, API_VERSION_1,
};

/// `ioctl` request selecting the slave address for subsequent transfers.
const I2C_SLAVE: libc::c_ulong = 0x0703;
/// `ioctl` request setting the adapter timeout, in units of 10 ms.
const I2C_TIMEOUT: libc::c_ulong = 0x0702;

/// Single-channel transceiver on top of the Linux `i2c-dev` interface.
///
/// Opens a bus device such as `/dev/i2c-1` and performs plain `write`/`read`
/// calls after selecting the slave address with `ioctl(I2C_SLAVE)`.
pub struct LinuxI2cTransceiver {
    file: File,
    path: PathBuf,
    description: String,
}

impl LinuxI2cTransceiver {
    /// Open a bus device for reading and writing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|e| TransportError::Open {
                path: path.clone(),
                source: e,
            })?;
        debug!(?path, "opened I2C bus device");
        Ok(Self {
            file,
            description: path.display().to_string(),
            path,
        })
    }

    /// The device path this transceiver was opened on.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ioctl(&self, request: libc::c_ulong, arg: libc::c_ulong) -> io::Result<()> {
        // SAFETY: `I2C_SLAVE` and `I2C_TIMEOUT` take an integer argument by
        // value, and the descriptor is owned by `self.file` for the whole call.
        let rc = unsafe { libc::ioctl(self.file.as_raw_fd(), request as _, arg) };
        if rc < 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(())
        }
    }

    fn transfer(&mut self, request: &TransceiveRequest<'_>) -> io::Result<Bytes> {
        if !request.timeout.is_zero() {
            self.ioctl(I2C_TIMEOUT, timeout_ticks(request.timeout))?;
        }
        self.ioctl(I2C_SLAVE, libc::c_ulong::from(request.slave_address))?;

        if let Some(tx) = request.tx_data.filter(|tx| !tx.is_empty()) {
            trace!(address = request.slave_address, tx = ?tx, "i2c write");
            // i2c-dev issues one bus transaction per write call
            let written = self.file.write(tx)?;
            if written != tx.len() {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    format!("short write ({written} of {} bytes)", tx.len()),
                ));
            }
        }

        let Some(rx_length) = request.rx_length else {
            return Ok(Bytes::new());
        };
        if !request.read_delay.is_zero() {
            std::thread::sleep(request.read_delay);
        }
        let mut rx = vec![0u8; rx_length];
        let read = self.file.read(&mut rx)?;
        rx.truncate(read);
        trace!(address = request.slave_address, rx = ?rx, "i2c read");
        Ok(Bytes::from(rx))
    }
}

/// Adapter timeout in 10 ms ticks, at least one tick, saturating.
fn timeout_ticks(timeout: Duration) -> libc::c_ulong {
    let ticks = (timeout.as_millis() / 10).max(1);
    libc::c_ulong::try_from(ticks).unwrap_or(libc::c_ulong::MAX)
}

/// Map an `i2c-dev` error onto a version 1 status code.
fn status_for_io_error(err: &io::Error) -> u8 {
    match err.raw_os_error() {
        Some(libc::EREMOTEIO) | Some(libc::ENXIO) => status::NACK,
        Some(libc::ETIMEDOUT) => status::TIMEOUT,
        _ => status::UNSPECIFIED_ERROR,
    }
}

impl I2cTransceiver for LinuxI2cTransceiver {
    fn api_version(&self) -> u32 {
        API_VERSION_1
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn channel_count(&self) -> Option<usize> {
        None
    }

    fn transceive(&mut self, request: &TransceiveRequest<'_>) -> TransceiveOutput {
        let result = match self.transfer(request) {
            Ok(rx) => ChannelResult::ok(rx),
            Err(err) => {
                let code = status_for_io_error(&err);
                debug!(
                    path = ?self.path,
                    address = request.slave_address,
                    status = code,
                    error = %err,
                    "i2c transfer failed"
                );
                ChannelResult::failed(code, Some(Box::new(err)), Bytes::new())
            }
        };
        TransceiveOutput::Single(result)
    }
}

impl std::fmt::Debug for LinuxI2cTransceiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinuxI2cTransceiver")
            .field("path", &self.path)
            .finish()
    }
}
