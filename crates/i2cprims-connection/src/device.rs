use i2cprims_frame::I2cCommand;
use i2cprims_transport::I2cTransceiver;

use crate::connection::I2cConnection;
use crate::error::{I2cError, Result};
use crate::interpret::ExecuteOutput;

/// A connection bound to one slave address.
///
/// Remembers the last executed command so its response can be read again
/// later, e.g. after starting a measurement with
/// [`execute_async`](Self::execute_async).
pub struct I2cDevice<T: I2cTransceiver> {
    connection: I2cConnection<T>,
    slave_address: u8,
    last_command: Option<I2cCommand>,
}

impl<T: I2cTransceiver> I2cDevice<T> {
    pub fn new(connection: I2cConnection<T>, slave_address: u8) -> Self {
        Self {
            connection,
            slave_address,
            last_command: None,
        }
    }

    pub fn connection(&self) -> &I2cConnection<T> {
        &self.connection
    }

    pub fn connection_mut(&mut self) -> &mut I2cConnection<T> {
        &mut self.connection
    }

    pub fn slave_address(&self) -> u8 {
        self.slave_address
    }

    pub fn into_connection(self) -> I2cConnection<T> {
        self.connection
    }

    /// Execute a command and return its interpreted response.
    pub fn execute(&mut self, command: I2cCommand) -> Result<ExecuteOutput> {
        let command = self.last_command.insert(command);
        self.connection.execute(self.slave_address, command)
    }

    /// Send a command without reading its response.
    ///
    /// Use [`read`](Self::read) afterwards to fetch the response.
    pub fn execute_async(&mut self, command: I2cCommand) -> Result<ExecuteOutput> {
        let command = self.last_command.insert(command);
        self.connection.write(self.slave_address, command)
    }

    /// Read the response of the last executed command.
    pub fn read(&mut self) -> Result<ExecuteOutput> {
        let command = self
            .last_command
            .as_ref()
            .ok_or(I2cError::NoPreviousCommand)?;
        self.connection.read(self.slave_address, command)
    }
}
